//! Document errors.

use crate::storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("XML error: {0}")]
    Xml(String),
    #[error("Root element is <{0}>, expected <controls>")]
    WrongRoot(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Unknown widget type: {0}")]
    UnknownWidgetType(i64),
    #[error("Text is not a controls fragment")]
    NotAFragment,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Result type for document operations.
pub type DocumentResult<T> = Result<T, DocumentError>;

pub(crate) fn xml_error(e: impl std::fmt::Display) -> DocumentError {
    DocumentError::Xml(e.to_string())
}
