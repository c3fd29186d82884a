use url::Url;

use crate::error::FetchError;

/// Appends `segments` to the path of `base`, percent-encoding each one so
/// that names containing `/`, `?` or `#` stay a single segment.
fn join_segments(base: &Url, segments: &[&str]) -> Result<Url, FetchError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| FetchError::InvalidUrl(base.to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Web page of a pipeline on a Concourse host.
///
/// # Returns
///
/// Clickable URL (e.g., <https://ci.example.com/teams/main/pipelines/deploy>)
pub(super) fn pipeline_page_url(base: &Url, team: &str, pipeline: &str) -> Result<Url, FetchError> {
    join_segments(base, &["teams", team, "pipelines", pipeline])
}

/// API endpoint listing the pipelines of a team.
pub(super) fn pipelines_url(base: &Url, team: &str) -> Result<Url, FetchError> {
    join_segments(base, &["api", "v1", "teams", team, "pipelines"])
}

/// API endpoint listing the jobs of a pipeline.
pub(super) fn jobs_url(base: &Url, team: &str, pipeline: &str) -> Result<Url, FetchError> {
    join_segments(base, &["api", "v1", "teams", team, "pipelines", pipeline, "jobs"])
}
