use thiserror::Error;

/// Errors that can occur when calling the Azure Resource Manager API.
#[derive(Error, Debug)]
pub enum ArmError {
    /// The request failed with a non-success HTTP status.
    #[error("HTTP error: {status} - {message}")]
    Http { status: u16, message: String },

    /// The service returned a structured ARM error body.
    #[error("ARM error ({code}): {message}")]
    Api { code: String, message: String },

    /// A long-running operation finished in a non-success state.
    #[error("operation {status} ({code}): {message}")]
    Operation {
        status: String,
        code: String,
        message: String,
    },

    /// A long-running operation did not reach a terminal state within the
    /// configured polling timeout.
    #[error("operation did not complete within {timeout:?}")]
    OperationTimedOut { timeout: std::time::Duration },

    /// Authentication failed.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The request payload or a response body could not be (de)serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The HTTP request failed at the transport level.
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),

    /// The resource-manager endpoint or a returned URL is invalid.
    #[error("invalid endpoint URL: {message}")]
    InvalidEndpoint {
        message: String,
        #[source]
        source: Option<url::ParseError>,
    },

    /// A required configuration value is missing.
    #[error("missing configuration: {0}")]
    MissingConfig(String),
}

impl ArmError {
    pub(crate) fn invalid_endpoint(message: impl Into<String>) -> Self {
        Self::InvalidEndpoint {
            message: message.into(),
            source: None,
        }
    }

    pub(crate) fn invalid_endpoint_with_source(
        message: impl Into<String>,
        source: url::ParseError,
    ) -> Self {
        Self::InvalidEndpoint {
            message: message.into(),
            source: Some(source),
        }
    }
}

/// Result type alias for ARM operations.
pub type ArmResult<T> = std::result::Result<T, ArmError>;
