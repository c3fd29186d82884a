use std::collections::HashMap;

use indexmap::IndexMap;
use url::form_urlencoded;

use super::types::{RawJob, RawPipeline, SummaryRecord, PENDING_STATUS};
use crate::error::FetchError;

const UNGROUPED: &str = "";

/// Folds the pipelines and jobs of one fetch cycle into one record per
/// `(pipeline, group)` pair.
///
/// Jobs without groups count towards the ungrouped record. A job listed
/// under several groups counts once in each of them.
///
/// Records are returned in first-seen order; callers sort them with
/// [`super::sort_records`].
///
/// # Errors
///
/// Returns [`FetchError::MissingJobs`] if `jobs_by_pipeline` has no entry
/// for one of `pipelines`.
pub fn aggregate(
    pipelines: &[RawPipeline],
    jobs_by_pipeline: &HashMap<String, Vec<RawJob>>,
) -> Result<Vec<SummaryRecord>, FetchError> {
    let mut records: IndexMap<(String, String), SummaryRecord> = IndexMap::new();

    for pipeline in pipelines {
        let jobs = jobs_by_pipeline
            .get(&pipeline.name)
            .ok_or_else(|| FetchError::MissingJobs(pipeline.name.clone()))?;

        for job in jobs {
            for group in job_groups(job) {
                let record = records
                    .entry((pipeline.name.clone(), group.to_string()))
                    .or_insert_with(|| {
                        SummaryRecord::new(pipeline, group, group_url(&pipeline.url, group))
                    });

                record.running |= job.has_next_build;

                let status = job
                    .finished_build_status
                    .as_deref()
                    .unwrap_or(PENDING_STATUS);
                *record.statuses.entry(status.to_string()).or_insert(0) += 1;
            }
        }
    }

    Ok(records.into_values().collect())
}

fn job_groups(job: &RawJob) -> Vec<&str> {
    if job.groups.is_empty() {
        vec![UNGROUPED]
    } else {
        job.groups.iter().map(String::as_str).collect()
    }
}

fn group_url(pipeline_url: &str, group: &str) -> String {
    if group == UNGROUPED {
        return pipeline_url.to_string();
    }

    let encoded: String = form_urlencoded::byte_serialize(group.as_bytes()).collect();
    format!("{pipeline_url}?groups={encoded}")
}
