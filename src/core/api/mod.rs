//! Documents Backend Interface
//!
//! The library core talks to the remote store only through [`DocumentApi`].
//! [`HttpDocumentApi`] is the reqwest implementation used by the binary;
//! tests substitute mocks.

pub mod error;
pub mod http;

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;

use super::models::{Document, FileSelection, Keyword};

pub use error::{ApiError, Result};
pub use http::HttpDocumentApi;

/// Bytes handed to the transport so far. `total` is unknown for some events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadProgress {
    pub transferred: u64,
    pub total: Option<u64>,
}

impl UploadProgress {
    pub fn new(transferred: u64, total: Option<u64>) -> Self {
        Self { transferred, total }
    }

    /// `round(100 * transferred / total)` clamped to `0..=100`, or `None`
    /// when the total is unknown or zero.
    pub fn percent(&self) -> Option<u8> {
        let total = self.total.filter(|t| *t > 0)?;
        let pct = (self.transferred as f64 * 100.0 / total as f64).round();
        Some(pct.clamp(0.0, 100.0) as u8)
    }
}

/// One event of an upload. Exactly one `Finished` ends the stream.
#[derive(Debug)]
pub enum UploadEvent {
    Progress(UploadProgress),
    Finished(Result<Document>),
}

pub type UploadStream = Pin<Box<dyn Stream<Item = UploadEvent> + Send>>;

/// Request/response contract of the documents backend.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentApi: Send + Sync {
    /// Raw list payload; may be a bare array or a paginated envelope.
    async fn fetch_document_list(&self) -> Result<serde_json::Value>;

    /// Keyword statistics for one document, already normalized.
    async fn fetch_keyword_stats(&self, id: &str) -> Result<Vec<Keyword>>;

    async fn delete_document(&self, id: &str) -> Result<()>;

    /// Start an upload and report its progress as a stream.
    fn upload_document(&self, file: FileSelection) -> UploadStream;

    /// Where the browser should go to download the original file. No I/O.
    fn download_url(&self, id: &str) -> String;
}
