use thiserror::Error;

#[derive(Debug, Error)]
pub enum PostboxError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("message store error: {0}")]
    Store(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

pub type PostboxResult<T> = Result<T, PostboxError>;
