use std::collections::HashMap;

use chrono::Utc;
use futures::future::join_all;
use log::{debug, info, warn};

use super::aggregator::aggregate;
use super::filter::filter_records;
use super::sorter::sort_records;
use super::types::HostSummary;
use crate::config::SummaryGroup;
use crate::error::{FetchError, Result, SummaryError};
use crate::providers::PipelineSource;

/// Builds host and group summaries from a pipeline source.
///
/// Every call runs a fresh fetch cycle; nothing is cached between calls.
pub struct SummaryService<S> {
    source: S,
    team: String,
    groups: Vec<SummaryGroup>,
}

impl<S: PipelineSource> SummaryService<S> {
    pub fn new(source: S, team: impl Into<String>, groups: Vec<SummaryGroup>) -> Self {
        Self {
            source,
            team: team.into(),
            groups,
        }
    }

    /// Fetches, aggregates and sorts every pipeline of `host`.
    ///
    /// # Errors
    ///
    /// Returns [`SummaryError::Aggregation`] naming `host` if any request
    /// to the source fails.
    pub async fn host_summary(&self, host: &str) -> Result<HostSummary> {
        self.fetch_cycle(host)
            .await
            .map_err(|source| SummaryError::Aggregation {
                host: host.to_string(),
                source,
            })
    }

    /// Summarises each host configured under `group`, filtered by that
    /// host's membership rules.
    ///
    /// Hosts are fetched concurrently; results keep the configured host
    /// order. An unknown group yields no summaries.
    ///
    /// # Errors
    ///
    /// Returns the error of the first failing host in configured order.
    pub async fn group_summary(&self, group: &str) -> Result<Vec<HostSummary>> {
        let Some(summary_group) = self.groups.iter().find(|g| g.group == group) else {
            warn!("No summary group named: {group}");
            return Ok(vec![]);
        };

        info!(
            "Collecting group {group} across {} hosts",
            summary_group.hosts.len()
        );

        let futures = summary_group.hosts.iter().map(|host| async move {
            let mut summary = self.host_summary(&host.fqdn).await?;
            summary.records = filter_records(summary.records, &host.pipelines);
            Ok::<_, SummaryError>(summary)
        });

        join_all(futures).await.into_iter().collect()
    }

    async fn fetch_cycle(&self, host: &str) -> std::result::Result<HostSummary, FetchError> {
        info!("Fetching pipelines from {host} (team: {})", self.team);

        let pipelines = self.source.list_pipelines(host, &self.team).await?;

        let mut jobs_by_pipeline = HashMap::with_capacity(pipelines.len());
        for pipeline in &pipelines {
            let jobs = self
                .source
                .list_jobs(host, &self.team, &pipeline.name)
                .await?;
            debug!("Fetched {} jobs for pipeline {}", jobs.len(), pipeline.name);
            jobs_by_pipeline.insert(pipeline.name.clone(), jobs);
        }

        let records = sort_records(aggregate(&pipelines, &jobs_by_pipeline)?);

        info!(
            "Summarised {} pipelines from {host} into {} records",
            pipelines.len(),
            records.len()
        );

        Ok(HostSummary {
            host: host.to_string(),
            collected_at: Utc::now(),
            records,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::config::GroupHost;
    use crate::summary::{MembershipRule, RawJob, RawPipeline};

    #[derive(Default)]
    struct FakeSource {
        pipelines: HashMap<String, Vec<RawPipeline>>,
        jobs: HashMap<(String, String), Vec<RawJob>>,
        failing_hosts: HashSet<String>,
    }

    impl FakeSource {
        fn with_pipeline(mut self, host: &str, name: &str, jobs: Vec<RawJob>) -> Self {
            self.pipelines
                .entry(host.to_string())
                .or_default()
                .push(RawPipeline {
                    name: name.to_string(),
                    url: format!("https://{host}/teams/main/pipelines/{name}"),
                    paused: false,
                });
            self.jobs.insert((host.to_string(), name.to_string()), jobs);
            self
        }

        fn with_failing_host(mut self, host: &str) -> Self {
            self.failing_hosts.insert(host.to_string());
            self
        }
    }

    impl PipelineSource for FakeSource {
        async fn list_pipelines(
            &self,
            host: &str,
            _team: &str,
        ) -> std::result::Result<Vec<RawPipeline>, FetchError> {
            if self.failing_hosts.contains(host) {
                return Err(FetchError::ApiError {
                    status: 401,
                    message: "not authorized".to_string(),
                });
            }
            Ok(self.pipelines.get(host).cloned().unwrap_or_default())
        }

        async fn list_jobs(
            &self,
            host: &str,
            _team: &str,
            pipeline: &str,
        ) -> std::result::Result<Vec<RawJob>, FetchError> {
            self.jobs
                .get(&(host.to_string(), pipeline.to_string()))
                .cloned()
                .ok_or_else(|| FetchError::MissingJobs(pipeline.to_string()))
        }
    }

    fn job(groups: &[&str], status: Option<&str>) -> RawJob {
        RawJob {
            name: "job".to_string(),
            groups: groups.iter().map(ToString::to_string).collect(),
            has_next_build: false,
            finished_build_status: status.map(ToString::to_string),
        }
    }

    fn group(name: &str, hosts: Vec<GroupHost>) -> SummaryGroup {
        SummaryGroup {
            group: name.to_string(),
            hosts,
        }
    }

    fn group_host(fqdn: &str, rules: Vec<MembershipRule>) -> GroupHost {
        GroupHost {
            fqdn: fqdn.to_string(),
            pipelines: rules,
        }
    }

    fn rule(pipeline: &str, groups: &[&str]) -> MembershipRule {
        MembershipRule {
            pipeline: pipeline.to_string(),
            groups: groups.iter().map(ToString::to_string).collect(),
        }
    }

    #[test]
    fn test_host_summary_is_sorted() {
        let source = FakeSource::default()
            .with_pipeline("ci", "zeta", vec![job(&[], Some("succeeded"))])
            .with_pipeline("ci", "alpha", vec![job(&["b", "a"], Some("failed"))]);
        let service = SummaryService::new(source, "main", vec![]);

        let summary = tokio_test::block_on(service.host_summary("ci")).unwrap();

        assert_eq!(summary.host, "ci");
        let keys: Vec<_> = summary
            .records
            .iter()
            .map(|r| (r.pipeline.as_str(), r.group.as_str()))
            .collect();
        assert_eq!(keys, vec![("alpha", "a"), ("alpha", "b"), ("zeta", "")]);
    }

    #[test]
    fn test_repeated_cycles_are_identical() {
        let source = FakeSource::default()
            .with_pipeline("ci", "ab", vec![job(&[], Some("succeeded"))])
            .with_pipeline("ci", "a", vec![job(&["b"], None)]);
        let service = SummaryService::new(source, "main", vec![]);

        let first = tokio_test::block_on(service.host_summary("ci")).unwrap();
        let second = tokio_test::block_on(service.host_summary("ci")).unwrap();

        assert_eq!(first.records, second.records);
    }

    #[test]
    fn test_host_failure_names_host() {
        let source = FakeSource::default().with_failing_host("broken");
        let service = SummaryService::new(source, "main", vec![]);

        let err = tokio_test::block_on(service.host_summary("broken")).unwrap_err();

        assert_eq!(err.host(), Some("broken"));
        assert!(matches!(
            err,
            SummaryError::Aggregation {
                source: FetchError::ApiError { status: 401, .. },
                ..
            }
        ));
    }

    #[test]
    fn test_group_summary_filters_per_host() {
        let source = FakeSource::default()
            .with_pipeline("one", "deploy", vec![job(&["prod", "staging"], Some("succeeded"))])
            .with_pipeline("one", "other", vec![job(&[], Some("failed"))])
            .with_pipeline("two", "build", vec![job(&[], Some("errored"))]);
        let groups = vec![group(
            "team",
            vec![
                group_host("one", vec![rule("deploy", &["prod"])]),
                group_host("two", vec![]),
            ],
        )];
        let service = SummaryService::new(source, "main", groups);

        let summaries = tokio_test::block_on(service.group_summary("team")).unwrap();

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].host, "one");
        assert_eq!(summaries[0].records.len(), 1);
        assert_eq!(summaries[0].records[0].group, "prod");
        assert_eq!(summaries[1].host, "two");
        assert_eq!(summaries[1].records.len(), 1);
        assert_eq!(summaries[1].records[0].pipeline, "build");
    }

    #[test]
    fn test_group_summary_unknown_group_is_empty() {
        let service = SummaryService::new(FakeSource::default(), "main", vec![]);

        let summaries = tokio_test::block_on(service.group_summary("missing")).unwrap();

        assert!(summaries.is_empty());
    }

    #[test]
    fn test_group_summary_fails_when_any_host_fails() {
        let source = FakeSource::default()
            .with_pipeline("ok", "build", vec![job(&[], Some("succeeded"))])
            .with_failing_host("down");
        let groups = vec![group(
            "team",
            vec![group_host("ok", vec![]), group_host("down", vec![])],
        )];
        let service = SummaryService::new(source, "main", groups);

        let err = tokio_test::block_on(service.group_summary("team")).unwrap_err();

        assert_eq!(err.host(), Some("down"));
    }
}
