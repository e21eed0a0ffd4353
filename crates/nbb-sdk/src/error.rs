use nbb_entity::EntityError;
use nbb_transport::TransportError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("{url} is not a NodeBB forum (X-Powered-By: {})", .powered_by.as_deref().unwrap_or("<missing>"))]
    NotANodeBBForum {
        url: String,
        powered_by: Option<String>,
    },

    #[error("malformed {document}: {reason}")]
    MalformedResponse { document: String, reason: String },

    #[error("invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("entity error: {0}")]
    Entity(#[from] EntityError),

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}

impl SdkError {
    pub(crate) fn malformed(document: &str, reason: impl Into<String>) -> Self {
        SdkError::MalformedResponse {
            document: document.to_string(),
            reason: reason.into(),
        }
    }
}

pub type SdkResult<T> = Result<T, SdkError>;
