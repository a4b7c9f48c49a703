//! Filter / Search Engine
//!
//! Stateless filtering over the full document list plus the pagination cursor
//! for the filtered result. Filters are never applied incrementally: every
//! change recomputes from the unfiltered source.

use std::ops::Range;

use super::models::{Document, TypeCategory};

/// Page size used when no configuration overrides it.
pub const DEFAULT_PAGE_SIZE: usize = 12;

// ============================================================================
// Filter State
// ============================================================================

/// Current search and filter selections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    /// Free-text query; empty means no text filter.
    pub query: String,
    /// Day prefix (`YYYY-MM-DD`); empty means no date filter.
    pub date: String,
    pub category: Option<TypeCategory>,
}

impl FilterState {
    pub fn is_active(&self) -> bool {
        !self.query.trim().is_empty() || !self.date.trim().is_empty() || self.category.is_some()
    }

    pub fn matches(&self, doc: &Document) -> bool {
        let query = self.query.trim().to_lowercase();
        if !query.is_empty() {
            let name = doc.file_name.to_lowercase();
            let text = doc.payload.search_text().to_lowercase();
            if !name.contains(&query) && !text.contains(&query) {
                return false;
            }
        }

        let date = self.date.trim();
        if !date.is_empty() && !doc.creation_date.starts_with(date) {
            return false;
        }

        if let Some(category) = self.category {
            if doc.category() != Some(category) {
                return false;
            }
        }

        true
    }
}

/// Filter change coming from the filter controls. The type is a label
/// (`"PDF"`, `"Image"`, ...); empty or unknown labels clear the type filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterChange {
    pub date: String,
    pub type_label: String,
}

impl FilterChange {
    pub fn new(date: impl Into<String>, type_label: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            type_label: type_label.into(),
        }
    }

    pub fn category(&self) -> Option<TypeCategory> {
        let label = self.type_label.trim();
        if label.is_empty() {
            return None;
        }
        match label.parse() {
            Ok(category) => Some(category),
            Err(e) => {
                tracing::warn!(label, error = %e, "ignoring unknown type filter");
                None
            }
        }
    }
}

/// Apply all active filters to `docs`, preserving their relative order.
pub fn apply_filters(docs: &[Document], filter: &FilterState) -> Vec<Document> {
    docs.iter().filter(|d| filter.matches(d)).cloned().collect()
}

// ============================================================================
// Pagination
// ============================================================================

/// Zero-based page cursor over a result of `total` items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page_index: usize,
    page_size: usize,
    total: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Pagination {
    /// A zero page size is treated as one item per page.
    pub fn new(page_size: usize) -> Self {
        Self {
            page_index: 0,
            page_size: page_size.max(1),
            total: 0,
        }
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// `max(1, ceil(total / page_size))`
    pub fn total_pages(&self) -> usize {
        self.total.div_ceil(self.page_size).max(1)
    }

    /// New result set: back to the first page.
    pub fn reset(&mut self, total: usize) {
        self.total = total;
        self.page_index = 0;
    }

    /// Keep the index inside `0..total_pages`.
    pub fn clamp(&mut self) {
        self.page_index = self.page_index.min(self.total_pages() - 1);
    }

    pub fn next(&mut self) -> bool {
        if self.page_index + 1 < self.total_pages() {
            self.page_index += 1;
            true
        } else {
            false
        }
    }

    pub fn prev(&mut self) -> bool {
        if self.page_index > 0 {
            self.page_index -= 1;
            true
        } else {
            false
        }
    }

    pub fn has_next(&self) -> bool {
        self.page_index + 1 < self.total_pages()
    }

    pub fn has_prev(&self) -> bool {
        self.page_index > 0
    }

    /// Index range of the visible page within the filtered result.
    pub fn range(&self) -> Range<usize> {
        let start = (self.page_index * self.page_size).min(self.total);
        let end = (start + self.page_size).min(self.total);
        start..end
    }
}
