//! HTTP Documents Backend
//!
//! reqwest client for the `/api/documents/` REST endpoints:
//!
//! | Operation      | Request                                      |
//! |----------------|----------------------------------------------|
//! | list           | `GET    {base}documents/`                    |
//! | keyword stats  | `GET    {base}documents/{id}/keyword-stats/` |
//! | delete         | `DELETE {base}documents/{id}/`               |
//! | upload         | `POST   {base}documents/` (multipart)        |
//! | download link  | `{base}documents/{id}/download/`             |

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures::channel::mpsc::{self, UnboundedSender};
use futures::{stream, StreamExt};
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client, Response};
use url::Url;

use super::error::{ApiError, Result};
use super::{DocumentApi, UploadEvent, UploadProgress, UploadStream};
use crate::config::ApiConfig;
use crate::core::models::{Document, FileSelection, Keyword};
use crate::core::normalize::{normalize_document, normalize_keyword_response};

/// Upload body chunk size used when none is configured.
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// reqwest-backed [`DocumentApi`].
#[derive(Debug, Clone)]
pub struct HttpDocumentApi {
    base_url: Url,
    client: Client,
    chunk_size: usize,
}

impl HttpDocumentApi {
    /// `base_url` is the API root, e.g. `http://localhost:8000/api/`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let mut base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase));
        }
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url,
            client,
            chunk_size: DEFAULT_CHUNK_SIZE,
        })
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        Ok(Self::new(&config.base_url, Duration::from_secs(config.timeout_secs))?
            .with_chunk_size(config.upload_chunk_bytes))
    }

    /// Granularity of upload progress reporting.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `{base}seg1/seg2/.../` with every segment percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(segments)
            .push("");
        Ok(url)
    }
}

#[async_trait]
impl DocumentApi for HttpDocumentApi {
    async fn fetch_document_list(&self) -> Result<serde_json::Value> {
        let url = self.endpoint(&["documents"])?;
        tracing::debug!(%url, "fetching document list");
        let resp = check_status(self.client.get(url).send().await?).await?;
        Ok(resp.json().await?)
    }

    async fn fetch_keyword_stats(&self, id: &str) -> Result<Vec<Keyword>> {
        let url = self.endpoint(&["documents", id, "keyword-stats"])?;
        tracing::debug!(%url, "fetching keyword statistics");
        let resp = check_status(self.client.get(url).send().await?).await?;
        let raw: serde_json::Value = resp.json().await?;
        Ok(normalize_keyword_response(&raw))
    }

    async fn delete_document(&self, id: &str) -> Result<()> {
        let url = self.endpoint(&["documents", id])?;
        tracing::debug!(%url, "deleting document");
        check_status(self.client.delete(url).send().await?).await?;
        Ok(())
    }

    /// Must be called from within a Tokio runtime; the request runs on a
    /// spawned task and reports through the returned stream.
    fn upload_document(&self, file: FileSelection) -> UploadStream {
        let (tx, rx) = mpsc::unbounded();

        let url = match self.endpoint(&["documents"]) {
            Ok(url) => url,
            Err(e) => {
                let _ = tx.unbounded_send(UploadEvent::Finished(Err(e)));
                return Box::pin(rx);
            }
        };

        let client = self.client.clone();
        let chunk_size = self.chunk_size;
        tokio::spawn(async move {
            let result = send_upload(client, url, file, chunk_size, tx.clone()).await;
            if let Err(e) = &result {
                tracing::warn!(error = %e, "upload request failed");
            }
            let _ = tx.unbounded_send(UploadEvent::Finished(result));
        });

        Box::pin(rx)
    }

    fn download_url(&self, id: &str) -> String {
        match self.endpoint(&["documents", id, "download"]) {
            Ok(url) => url.to_string(),
            Err(_) => format!("{}documents/{}/download/", self.base_url, id),
        }
    }
}

async fn send_upload(
    client: Client,
    url: Url,
    file: FileSelection,
    chunk_size: usize,
    progress: UnboundedSender<UploadEvent>,
) -> Result<Document> {
    let total = file.len();
    tracing::info!(file = %file.name, bytes = total, "uploading document");

    let mut sent = 0u64;
    let body = stream::iter(split_chunks(&file.bytes, chunk_size)).map(move |chunk| {
        sent += chunk.len() as u64;
        let _ = progress.unbounded_send(UploadEvent::Progress(UploadProgress::new(sent, Some(total))));
        Ok::<Bytes, std::io::Error>(chunk)
    });

    let mut part = Part::stream_with_length(Body::wrap_stream(body), total).file_name(file.name.clone());
    if let Some(content_type) = &file.content_type {
        part = part.mime_str(content_type)?;
    }
    let form = Form::new().part("file", part);

    let resp = check_status(client.post(url).multipart(form).send().await?).await?;
    let raw: serde_json::Value = resp.json().await?;
    normalize_document(&raw)
        .ok_or_else(|| ApiError::UnexpectedResponse("created document has no id".to_string()))
}

fn split_chunks(bytes: &Bytes, chunk_size: usize) -> Vec<Bytes> {
    let chunk_size = chunk_size.max(1);
    (0..bytes.len())
        .step_by(chunk_size)
        .map(|start| bytes.slice(start..(start + chunk_size).min(bytes.len())))
        .collect()
}

async fn check_status(resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(ApiError::Status {
        status: status.as_u16(),
        body,
    })
}
