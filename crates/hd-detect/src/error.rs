use thiserror::Error;

#[derive(Debug, Error)]
pub enum DetectError {
    #[error("detector configuration error: {0}")]
    Config(String),

    #[error("frame buffer holds {got} bytes, expected {expected}")]
    FrameSize { expected: usize, got: usize },

    #[error("inference backend error: {0}")]
    Backend(String),
}

pub type DetectResult<T> = Result<T, DetectError>;
