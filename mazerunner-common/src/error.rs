use thiserror::Error;

pub type MazerunnerResult<T> = Result<T, MazerunnerError>;

#[derive(Debug, Error)]
pub enum MazerunnerError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("compute context error: {0}")]
    Context(String),

    #[error("unsupported: {0}")]
    Unsupported(String),

    #[error("internal error: {0}")]
    Internal(String),
}
