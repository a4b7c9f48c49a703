//! Collection Store
//!
//! Holds the full document list exactly as last fetched, together with the
//! filter options derived from it. Both are replaced wholesale on every load.

use std::collections::BTreeSet;

use super::api::{DocumentApi, Result as ApiResult};
use super::models::{Document, FilterOptions, TypeCategory};
use super::normalize::normalize_list;

#[derive(Debug, Clone, Default)]
pub struct CollectionStore {
    documents: Vec<Document>,
    options: FilterOptions,
}

impl CollectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch and normalize the full list.
    ///
    /// On failure the store is emptied and the error handed back; nothing is
    /// retried.
    pub async fn load<A>(&mut self, api: &A) -> ApiResult<&[Document]>
    where
        A: DocumentApi + ?Sized,
    {
        match api.fetch_document_list().await {
            Ok(raw) => {
                self.replace(normalize_list(&raw));
                tracing::debug!(count = self.documents.len(), "document list loaded");
                Ok(&self.documents)
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to load document list");
                self.clear();
                Err(e)
            }
        }
    }

    /// Swap in a new list and re-derive the filter options from it.
    pub fn replace(&mut self, documents: Vec<Document>) {
        self.options = derive_filter_options(&documents);
        self.documents = documents;
    }

    pub fn clear(&mut self) {
        self.documents.clear();
        self.options = FilterOptions::default();
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn options(&self) -> &FilterOptions {
        &self.options
    }

    pub fn find(&self, id: &str) -> Option<&Document> {
        self.documents.iter().find(|d| d.id == id)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// Distinct day buckets (newest first) and type categories (by label).
pub fn derive_filter_options(documents: &[Document]) -> FilterOptions {
    let mut dates = BTreeSet::new();
    let mut types = BTreeSet::new();

    for doc in documents {
        if let Some(date) = doc.date_bucket() {
            dates.insert(date.to_string());
        }
        if let Some(category) = TypeCategory::classify(doc.content_type.as_deref()) {
            types.insert(category);
        }
    }

    let mut types: Vec<TypeCategory> = types.into_iter().collect();
    types.sort_by_key(|t| t.label());

    FilterOptions {
        dates: dates.into_iter().rev().collect(),
        types,
    }
}
