use apify_client::ApifyError;
use thiserror::Error;

/// Failure classes of the ingestion and classification passes.
///
/// Which of these abort a pass and which only skip an item is decided by the
/// pass, not by the error.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Caller supplied an empty or malformed parameter. Never retried.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Classifier error: {0}")]
    Classifier(String),
}

impl From<ApifyError> for PipelineError {
    fn from(err: ApifyError) -> Self {
        match err {
            ApifyError::InvalidArgument(msg) => PipelineError::InvalidArgument(msg),
            other => PipelineError::Upstream(other.to_string()),
        }
    }
}

impl From<sqlx::Error> for PipelineError {
    fn from(err: sqlx::Error) -> Self {
        PipelineError::Store(err.to_string())
    }
}

impl From<serde_json::Error> for PipelineError {
    fn from(err: serde_json::Error) -> Self {
        PipelineError::Decode(err.to_string())
    }
}
