use thiserror::Error;

#[derive(Debug, Error)]
pub enum EntityError {
    #[error("attribute not found: {0}")]
    AttributeNotFound(String),

    #[error("alias chain starting at {alias} did not terminate within {hops} hops")]
    AliasCycle { alias: String, hops: usize },

    #[error("attribute {key} is {found}, expected {expected}")]
    TypeMismatch {
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type EntityResult<T> = Result<T, EntityError>;
