pub mod concourse;

use crate::error::FetchError;
use crate::summary::{RawJob, RawPipeline};

pub use concourse::ConcourseProvider;

/// Source of raw pipeline and job state for a CI host.
///
/// Implementations own transport concerns such as timeouts and retries;
/// any error they return ends the current fetch cycle.
#[allow(async_fn_in_trait)]
pub trait PipelineSource {
    /// Lists every pipeline of `team` on `host`.
    async fn list_pipelines(&self, host: &str, team: &str)
        -> Result<Vec<RawPipeline>, FetchError>;

    /// Lists the jobs of `pipeline` with their latest build state.
    async fn list_jobs(
        &self,
        host: &str,
        team: &str,
        pipeline: &str,
    ) -> Result<Vec<RawJob>, FetchError>;
}
