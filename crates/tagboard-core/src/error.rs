use thiserror::Error;

pub type Result<T> = std::result::Result<T, BoardError>;

#[derive(Debug, Error)]
pub enum BoardError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("invalid request: {0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("board responded with status {0}")]
    Backend(u16),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}
