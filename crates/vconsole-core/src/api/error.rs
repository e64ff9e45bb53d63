//! Backend error taxonomy.

/// Failure of a backend interaction. Every variant is recoverable: pages turn
/// it into an error notice and keep their previous state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// No bearer token, or the token has expired.
    NotAuthenticated,
    /// Request could not be sent or the response could not be read.
    Transport(String),
    /// Backend answered with a non-2xx status.
    Status { status: u16, message: String },
    /// Response body does not have the expected shape.
    Malformed(String),
}

impl ApiError {
    /// Human-readable message suitable for a notice.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::NotAuthenticated => "You are not authenticated".to_string(),
            ApiError::Transport(msg) => format!("Network error: {msg}"),
            ApiError::Status { message, .. } => message.clone(),
            ApiError::Malformed(_) => "Invalid data format received from the server".to_string(),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::NotAuthenticated => write!(f, "not authenticated"),
            ApiError::Transport(msg) => write!(f, "transport error: {}", msg),
            ApiError::Status { status, message } => write!(f, "HTTP {}: {}", status, message),
            ApiError::Malformed(msg) => write!(f, "malformed response: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::Transport(e.to_string())
    }
}
