/// Errors raised while talking to the Listmonk API
#[derive(thiserror::Error, Debug)]
pub enum ListmonkError {
    /// The server answered with a non-success status
    #[error("Error {operation}: {status_text}: {status}")]
    Status {
        /// What the client was doing, e.g. "fetching campaign"
        operation: &'static str,
        /// HTTP status code
        status: u16,
        /// Canonical reason phrase for the status
        status_text: String,
    },

    /// The request never produced a response
    #[error("Network error while {operation}: {source}")]
    Network {
        /// What the client was doing
        operation: &'static str,
        /// Underlying transport error
        #[source]
        source: reqwest::Error,
    },

    /// The response body did not have the expected shape
    #[error("Invalid response structure from {0} API")]
    MalformedResponse(&'static str),

    /// Client settings are unusable
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl ListmonkError {
    /// Builds a status error from a failed response
    pub fn status(operation: &'static str, status: reqwest::StatusCode) -> Self {
        ListmonkError::Status {
            operation,
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("Unknown").to_string(),
        }
    }
}
