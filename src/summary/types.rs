use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Synthetic status counted for jobs that have never finished a build.
pub const PENDING_STATUS: &str = "pending";

/// A pipeline as reported by a Concourse host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPipeline {
    pub name: String,
    /// Web page of the pipeline (e.g., <https://ci.example.com/teams/main/pipelines/demo>)
    pub url: String,
    pub paused: bool,
}

/// A job of a pipeline with the state of its latest builds.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawJob {
    pub name: String,
    /// Dashboard groups the job is listed under; empty means ungrouped
    pub groups: Vec<String>,
    /// A build is pending or in progress
    pub has_next_build: bool,
    /// Outcome of the most recent finished build, if any
    pub finished_build_status: Option<String>,
}

/// Status summary for one `(pipeline, group)` pair.
///
/// An empty `group` is the ungrouped record of the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRecord {
    pub pipeline: String,
    pub group: String,
    pub url: String,
    pub running: bool,
    pub paused: bool,
    pub statuses: BTreeMap<String, usize>,
}

impl SummaryRecord {
    pub(super) fn new(pipeline: &RawPipeline, group: &str, url: String) -> Self {
        Self {
            pipeline: pipeline.name.clone(),
            group: group.to_string(),
            url,
            running: false,
            paused: pipeline.paused,
            statuses: BTreeMap::new(),
        }
    }

    /// Number of jobs counted under `status`.
    pub fn count(&self, status: &str) -> usize {
        self.statuses.get(status).copied().unwrap_or(0)
    }

    /// Number of job contributions across all statuses.
    pub fn total(&self) -> usize {
        self.statuses.values().sum()
    }
}

/// Which groups of a pipeline a host view should show.
///
/// An empty `groups` list selects every group of the pipeline. The literal
/// group `"all"` selects the ungrouped record only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipRule {
    #[serde(rename = "name")]
    pub pipeline: String,
    #[serde(default)]
    pub groups: Vec<String>,
}

/// All summary records produced by one fetch cycle against one host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostSummary {
    pub host: String,
    pub collected_at: DateTime<Utc>,
    pub records: Vec<SummaryRecord>,
}
