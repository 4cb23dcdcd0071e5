use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DedupError {
    #[error("invalid similarity threshold: {0} (expected 0..=100)")]
    InvalidThreshold(u32),
}

pub type Result<T> = std::result::Result<T, DedupError>;
