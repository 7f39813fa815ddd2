//! Error types for cart repair

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CartError {
    #[error("cart data is not valid JSON: {0}")]
    Format(#[from] serde_json::Error),

    #[error("cart data has wrong shape: expected array, found {found}")]
    Shape { found: &'static str },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Failure class reported back to callers of `sanitize()`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Format,
    Shape,
    Unclassified,
}

impl CartError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CartError::Format(_) => ErrorKind::Format,
            CartError::Shape { .. } => ErrorKind::Shape,
            CartError::Storage(_) | CartError::Io(_) | CartError::Config(_) => {
                ErrorKind::Unclassified
            }
        }
    }
}

impl From<serde_yaml::Error> for CartError {
    fn from(err: serde_yaml::Error) -> Self {
        CartError::Config(err.to_string())
    }
}

pub type CartResult<T> = Result<T, CartError>;
