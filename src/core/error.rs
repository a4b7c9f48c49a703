//! Library Error Types

use thiserror::Error;

use super::api::ApiError;

/// Failures of a single library operation. None of them is retried.
#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("Failed to load documents: {0}")]
    Load(#[source] ApiError),

    #[error("Failed to delete {name}: {source}")]
    Delete {
        name: String,
        #[source]
        source: ApiError,
    },

    #[error("Failed to upload {file}: {source}")]
    Upload {
        file: String,
        #[source]
        source: ApiError,
    },

    #[error("Failed to fetch keywords for {id}: {source}")]
    KeywordStats {
        id: String,
        #[source]
        source: ApiError,
    },

    #[error("Document not found: {0}")]
    DocumentNotFound(String),
}

/// Result type alias for library operations
pub type Result<T> = std::result::Result<T, LibraryError>;
