use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("request to {url} failed: {message}")]
    Request {
        url: String,
        message: String,
        connect: bool,
    },

    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("could not decode response from {url}: {message}")]
    Decode { url: String, message: String },

    #[error("no route for {method} {url}")]
    NoRoute { method: String, url: String },

    #[error("invalid transport configuration: {0}")]
    Config(String),
}

impl TransportError {
    /// Failures worth another attempt: timeouts, connection failures,
    /// throttling and server errors.
    pub fn is_transient(&self) -> bool {
        match self {
            TransportError::Timeout { .. } => true,
            TransportError::Request { connect, .. } => *connect,
            TransportError::Status { status, .. } => is_transient_status(*status),
            _ => false,
        }
    }
}

/// HTTP 429 and every 5xx status.
pub fn is_transient_status(status: u16) -> bool {
    status == 429 || (500..600).contains(&status)
}

pub type TransportResult<T> = Result<T, TransportError>;
