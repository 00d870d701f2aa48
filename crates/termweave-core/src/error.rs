//! Error types for Termweave.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Markup error: {0}")]
    Markup(String),

    #[error("Block cannot be split into sentences: {0}")]
    Unsplittable(String),

    #[error("Invalid term: {0}")]
    InvalidTerm(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
