#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    #[error("no content provided")]
    NoContent,
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("OpenAI API key not configured")]
    MissingApiKey,
    #[error("no content generated from the AI provider")]
    EmptyCompletion,
    #[error("AI provider returned {status}: {message}")]
    Upstream { status: u16, message: String },
    #[error("HTTP request to the AI provider failed: {0}")]
    Http(String),

    #[error("invalid document package: {0}")]
    InvalidPackage(String),
    #[error("failed to write document package: {0}")]
    Package(#[from] zip::result::ZipError),
    #[error("failed to write package part: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to (de)serialise JSON: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DiscoveryError {
    /// True for failures caused by the caller's input rather than by this service or the AI
    /// provider.
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::NoContent | Self::InvalidInput(_))
    }

    /// True for failures of the upstream AI call (as opposed to configuration problems).
    pub fn is_upstream_error(&self) -> bool {
        matches!(
            self,
            Self::EmptyCompletion | Self::Upstream { .. } | Self::Http(_)
        )
    }
}

impl From<reqwest::Error> for DiscoveryError {
    fn from(err: reqwest::Error) -> Self {
        DiscoveryError::Http(err.to_string())
    }
}

impl From<discovery_types::TextError> for DiscoveryError {
    fn from(err: discovery_types::TextError) -> Self {
        DiscoveryError::InvalidInput(err.to_string())
    }
}

pub type DiscoveryResult<T> = std::result::Result<T, DiscoveryError>;
