//! Document Library Controller
//!
//! Owns the collection store, the current filters and page, and the delete
//! and upload workflows, and drives them against a [`DocumentApi`].
//!
//! # Architecture
//! - Every mutating entry point recomputes the derived view (filtered list
//!   and pagination) before it returns; nothing is recomputed lazily.
//! - Failures are returned to the caller *and* announced as
//!   [`LibraryEvent::Notice`]s so the presentation layer can render them.
//! - Reloads after a delete or upload are awaited only after the backend
//!   confirmed the mutation.

use futures::StreamExt;
use tokio::sync::mpsc::UnboundedReceiver;

use super::api::{ApiError, DocumentApi, UploadEvent};
use super::delete::{DeleteState, DeleteWorkflow};
use super::error::{LibraryError, Result};
use super::events::{EventSink, LibraryEvent};
use super::filter::{apply_filters, FilterChange, FilterState, Pagination};
use super::models::{Document, FileSelection, FilterOptions, Keyword};
use super::normalize::format_keyword_list;
use super::store::CollectionStore;
use super::upload::{UploadState, UploadWorkflow};
use crate::config::LibraryConfig;

pub struct Library<A: DocumentApi> {
    api: A,
    store: CollectionStore,
    filter: FilterState,
    filtered: Vec<Document>,
    pagination: Pagination,
    delete: DeleteWorkflow,
    upload: UploadWorkflow,
    events: EventSink,
}

impl<A: DocumentApi> Library<A> {
    /// Create a controller and the receiving end of its event channel.
    pub fn new(api: A, config: &LibraryConfig) -> (Self, UnboundedReceiver<LibraryEvent>) {
        let (events, rx) = EventSink::channel();
        let library = Self {
            api,
            store: CollectionStore::new(),
            filter: FilterState::default(),
            filtered: Vec::new(),
            pagination: Pagination::new(config.page_size),
            delete: DeleteWorkflow::new(),
            upload: UploadWorkflow::new(),
            events,
        };
        (library, rx)
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    // ========================================================================
    // Loading
    // ========================================================================

    /// Full reload: fetch, normalize, reset filters and page.
    ///
    /// On failure the collection and its filter options are emptied, an error
    /// notice is emitted and the error returned.
    pub async fn load(&mut self) -> Result<usize> {
        let result = self.store.load(&self.api).await.map(|docs| docs.len());
        self.filter = FilterState::default();
        self.recompute();

        match result {
            Ok(count) => {
                tracing::info!(count, "document library reloaded");
                self.events.emit(LibraryEvent::Reloaded { count });
                Ok(count)
            }
            Err(e) => {
                self.events.error("Failed to load documents", Some(e.to_string()));
                Err(LibraryError::Load(e))
            }
        }
    }

    /// Reload trigger used after a successful upload.
    pub async fn on_uploaded(&mut self) -> Result<usize> {
        self.load().await
    }

    // ========================================================================
    // Search, Filters, Pages
    // ========================================================================

    pub fn on_search(&mut self, query: &str) {
        self.filter.query = query.trim().to_string();
        self.recompute();
    }

    pub fn on_filter_changed(&mut self, change: FilterChange) {
        self.filter.date = change.date.trim().to_string();
        self.filter.category = change.category();
        self.recompute();
    }

    pub fn clear_filters(&mut self) {
        self.filter = FilterState::default();
        self.recompute();
    }

    pub fn page_next(&mut self) -> bool {
        self.pagination.next()
    }

    pub fn page_prev(&mut self) -> bool {
        self.pagination.prev()
    }

    fn recompute(&mut self) {
        self.filtered = apply_filters(self.store.documents(), &self.filter);
        self.pagination.reset(self.filtered.len());
        tracing::trace!(
            matched = self.filtered.len(),
            total = self.store.len(),
            "filters applied"
        );
    }

    // ========================================================================
    // Delete
    // ========================================================================

    /// Ask for confirmation before deleting `id`.
    ///
    /// `on_delete_confirm` holds `&mut self` until the delete and its reload
    /// finish, so a request can never arrive while a deletion is in flight.
    /// The `Deleting` refusal in [`DeleteWorkflow`] only matters to callers
    /// driving the workflow directly.
    pub fn on_delete_request(&mut self, id: &str) {
        if self.delete.request(id, &self.store) {
            self.events.emit(LibraryEvent::DeleteConfirmation {
                message: self.delete.message(),
            });
        }
    }

    /// Delete the pending target, then reload on success.
    ///
    /// Without a pending target this only closes the confirmation. A failed
    /// delete closes the confirmation too and leaves the list untouched.
    pub async fn on_delete_confirm(&mut self) -> Result<()> {
        let Some(target) = self.delete.confirm() else {
            return Ok(());
        };

        let result = self.api.delete_document(&target.id).await;
        self.delete.finish();

        match result {
            Ok(()) => {
                tracing::info!(id = %target.id, "document deleted");
                self.events.emit(LibraryEvent::Deleted { id: target.id.clone() });
                self.events.success("File deleted.", Some(target.name.clone()).filter(|n| !n.is_empty()));
                self.load().await.map(|_| ())
            }
            Err(e) => {
                tracing::error!(id = %target.id, error = %e, "delete failed");
                self.events.error("Failed to delete the file.", Some(e.to_string()));
                let name = if target.name.is_empty() { target.id } else { target.name };
                Err(LibraryError::Delete { name, source: e })
            }
        }
    }

    pub fn on_delete_cancel(&mut self) {
        self.delete.cancel();
    }

    // ========================================================================
    // Upload
    // ========================================================================

    /// Replace the selected file; `None` clears the selection.
    pub fn on_file_picked(&mut self, file: Option<FileSelection>) -> bool {
        self.upload.pick(file)
    }

    /// Upload the selected file, following its progress to the terminal
    /// event, and reload once on success.
    ///
    /// Returns `Ok(None)` when there was nothing to submit.
    pub async fn on_upload_submit(&mut self) -> Result<Option<Document>> {
        let Some(file) = self.upload.submit() else {
            return Ok(None);
        };
        self.events.emit(LibraryEvent::UploadProgress { percent: 0 });

        let mut stream = self.api.upload_document(file.clone());
        let mut outcome = None;
        while let Some(event) = stream.next().await {
            match event {
                UploadEvent::Progress(progress) => {
                    if let Some(percent) = self.upload.on_progress(progress) {
                        self.events.emit(LibraryEvent::UploadProgress { percent });
                    }
                }
                UploadEvent::Finished(result) => {
                    outcome = Some(result);
                    break;
                }
            }
        }

        match outcome.unwrap_or(Err(ApiError::UploadIncomplete)) {
            Ok(document) => {
                self.upload.finish(true);
                tracing::info!(file = %file.name, id = %document.id, "upload complete");
                self.events.emit(LibraryEvent::Uploaded {
                    file_name: file.name.clone(),
                });
                self.on_uploaded().await?;
                Ok(Some(document))
            }
            Err(e) => {
                self.upload.finish(false);
                tracing::error!(file = %file.name, error = %e, "upload failed");
                self.events.error("Upload failed", Some(e.to_string()));
                Err(LibraryError::Upload {
                    file: file.name,
                    source: e,
                })
            }
        }
    }

    // ========================================================================
    // Keywords & Downloads
    // ========================================================================

    /// Server-computed keyword statistics for one document.
    pub async fn keyword_stats(&self, id: &str) -> Result<Vec<Keyword>> {
        self.api.fetch_keyword_stats(id).await.map_err(|e| {
            self.events.error("Failed to load keywords", Some(e.to_string()));
            LibraryError::KeywordStats {
                id: id.to_string(),
                source: e,
            }
        })
    }

    /// Keywords from the payload already held for `id`.
    pub fn document_keywords(&self, id: &str) -> Result<Vec<Keyword>> {
        self.store
            .find(id)
            .map(Document::keywords)
            .ok_or_else(|| LibraryError::DocumentNotFound(id.to_string()))
    }

    /// Copyable `word (percent%)` listing, or `None` (with a notice) when the
    /// document has no keywords.
    pub fn keyword_listing(&self, id: &str) -> Option<String> {
        let keywords = self.document_keywords(id).unwrap_or_default();
        if keywords.is_empty() {
            self.events.warning("No keywords to copy.", None);
            return None;
        }
        Some(format_keyword_list(&keywords))
    }

    pub fn download_url(&self, id: &str) -> String {
        self.api.download_url(id)
    }

    // ========================================================================
    // Read Accessors
    // ========================================================================

    /// Full, unfiltered collection.
    pub fn documents(&self) -> &[Document] {
        self.store.documents()
    }

    pub fn find(&self, id: &str) -> Option<&Document> {
        self.store.find(id)
    }

    pub fn filtered(&self) -> &[Document] {
        &self.filtered
    }

    /// The documents on the current page.
    pub fn page_documents(&self) -> &[Document] {
        &self.filtered[self.pagination.range()]
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn filter_options(&self) -> &FilterOptions {
        self.store.options()
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    pub fn page_index(&self) -> usize {
        self.pagination.page_index()
    }

    pub fn total_pages(&self) -> usize {
        self.pagination.total_pages()
    }

    pub fn delete_state(&self) -> &DeleteState {
        self.delete.state()
    }

    pub fn is_confirm_visible(&self) -> bool {
        self.delete.is_visible()
    }

    pub fn confirm_message(&self) -> String {
        self.delete.message()
    }

    pub fn upload_state(&self) -> &UploadState {
        self.upload.state()
    }

    pub fn upload_progress(&self) -> u8 {
        self.upload.progress()
    }

    pub fn selected_file(&self) -> Option<&FileSelection> {
        self.upload.selected()
    }
}
