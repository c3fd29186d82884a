use thiserror::Error;

/// Failure to retrieve or decode pipeline/job data from a Concourse host.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Concourse API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Concourse API error (status {status}) after {retries} retries")]
    ApiErrorAfterRetries { status: u16, retries: u32 },

    #[error("Malformed payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("Invalid host URL: {0}")]
    InvalidUrl(String),

    #[error("No jobs returned for pipeline: {0}")]
    MissingJobs(String),
}

#[derive(Error, Debug)]
pub enum SummaryError {
    #[error("Error collecting data from concourse ({host}): {source}")]
    Aggregation {
        host: String,
        #[source]
        source: FetchError,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl SummaryError {
    /// Host whose fetch cycle failed, if the error came from one.
    pub fn host(&self) -> Option<&str> {
        match self {
            Self::Aggregation { host, .. } => Some(host),
            Self::Config(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, SummaryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregation_error_names_host() {
        let err = SummaryError::Aggregation {
            host: "ci.example.com".to_string(),
            source: FetchError::MissingJobs("demo".to_string()),
        };

        assert_eq!(err.host(), Some("ci.example.com"));
        assert_eq!(
            err.to_string(),
            "Error collecting data from concourse (ci.example.com): No jobs returned for pipeline: demo"
        );
    }

    #[test]
    fn test_config_error_has_no_host() {
        let err = SummaryError::Config("bad".to_string());
        assert!(err.host().is_none());
    }
}
