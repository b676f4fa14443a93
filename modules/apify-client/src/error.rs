use thiserror::Error;

pub type Result<T> = std::result::Result<T, ApifyError>;

#[derive(Debug, Error)]
pub enum ApifyError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Run failed with status: {0}")]
    RunFailed(String),
}

impl ApifyError {
    /// True for caller mistakes that will fail the same way on every attempt.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, ApifyError::InvalidArgument(_))
    }
}

impl From<reqwest::Error> for ApifyError {
    fn from(err: reqwest::Error) -> Self {
        ApifyError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for ApifyError {
    fn from(err: serde_json::Error) -> Self {
        ApifyError::Parse(err.to_string())
    }
}

impl From<url::ParseError> for ApifyError {
    fn from(err: url::ParseError) -> Self {
        ApifyError::InvalidArgument(format!("unparseable URL: {err}"))
    }
}
