use serde::Deserialize;

use crate::summary::RawJob;

/// A pipeline as returned by `GET /api/v1/teams/{team}/pipelines`.
#[derive(Debug, Deserialize)]
pub(super) struct ConcoursePipeline {
    pub name: String,
    #[serde(default)]
    pub paused: bool,
}

/// A job as returned by `GET /api/v1/teams/{team}/pipelines/{pipeline}/jobs`.
#[derive(Debug, Deserialize)]
pub(super) struct ConcourseJob {
    pub name: String,
    #[serde(default)]
    pub groups: Option<Vec<String>>,
    #[serde(default)]
    pub next_build: Option<ConcourseBuild>,
    #[serde(default)]
    pub finished_build: Option<ConcourseBuild>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ConcourseBuild {
    pub status: String,
}

impl From<ConcourseJob> for RawJob {
    fn from(job: ConcourseJob) -> Self {
        Self {
            name: job.name,
            groups: job.groups.unwrap_or_default(),
            has_next_build: job.next_build.is_some(),
            finished_build_status: job.finished_build.map(|build| build.status),
        }
    }
}
