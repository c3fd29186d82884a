use log::debug;

use super::client::ConcourseClient;
use super::links::{jobs_url, pipeline_page_url, pipelines_url};
use super::types::{ConcourseJob, ConcoursePipeline};
use crate::error::FetchError;
use crate::providers::PipelineSource;
use crate::summary::{RawJob, RawPipeline};

/// Fetches pipeline and job state from Concourse hosts over the REST API.
pub struct ConcourseProvider {
    client: ConcourseClient,
}

impl ConcourseProvider {
    pub fn new(client: ConcourseClient) -> Self {
        Self { client }
    }
}

impl PipelineSource for ConcourseProvider {
    async fn list_pipelines(&self, host: &str, team: &str) -> Result<Vec<RawPipeline>, FetchError> {
        let base = self.client.host_url(host)?;
        let pipelines: Option<Vec<ConcoursePipeline>> =
            self.client.get_json(pipelines_url(&base, team)?).await?;
        let pipelines = pipelines.unwrap_or_default();

        debug!("Host {host} reported {} pipelines", pipelines.len());

        pipelines
            .into_iter()
            .map(|pipeline| {
                Ok::<_, FetchError>(RawPipeline {
                    url: pipeline_page_url(&base, team, &pipeline.name)?.into(),
                    name: pipeline.name,
                    paused: pipeline.paused,
                })
            })
            .collect()
    }

    async fn list_jobs(
        &self,
        host: &str,
        team: &str,
        pipeline: &str,
    ) -> Result<Vec<RawJob>, FetchError> {
        let base = self.client.host_url(host)?;
        let jobs: Option<Vec<ConcourseJob>> =
            self.client.get_json(jobs_url(&base, team, pipeline)?).await?;

        Ok(jobs
            .unwrap_or_default()
            .into_iter()
            .map(RawJob::from)
            .collect())
    }
}
