//! Document Library Models
//!
//! The fixed internal representation every server payload is normalized into.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use serde::{Deserialize, Serialize};

// ============================================================================
// Keywords
// ============================================================================

/// A single server-computed keyword statistic.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Keyword {
    pub word: String,
    /// Occurrence weight, never negative.
    pub count: f64,
    /// Share of the document in percent, clamped to `0..=100`.
    pub percent: f64,
}

impl Keyword {
    pub fn new(word: impl Into<String>, count: f64, percent: f64) -> Self {
        Self {
            word: word.into(),
            count: if count.is_finite() { count.max(0.0) } else { 0.0 },
            percent: if percent.is_finite() {
                percent.clamp(0.0, 100.0)
            } else {
                0.0
            },
        }
    }

    /// A keyword known only by its word (comma-split fallback).
    pub fn bare(word: impl Into<String>) -> Self {
        Self::new(word, 0.0, 0.0)
    }
}

// ============================================================================
// Document
// ============================================================================

/// The variant `data` field of a document, decoded once at the boundary.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DocumentPayload {
    /// Raw extracted text.
    Text(String),
    /// Keyword statistics, in server order.
    Keywords(Vec<Keyword>),
    #[default]
    Empty,
}

impl DocumentPayload {
    /// Plain-text projection used by the text search.
    pub fn search_text(&self) -> String {
        match self {
            DocumentPayload::Text(text) => text.clone(),
            DocumentPayload::Keywords(keywords) => keywords
                .iter()
                .map(|k| k.word.as_str())
                .filter(|w| !w.is_empty())
                .collect::<Vec<_>>()
                .join(" "),
            DocumentPayload::Empty => String::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            DocumentPayload::Text(text) => text.is_empty(),
            DocumentPayload::Keywords(keywords) => keywords.is_empty(),
            DocumentPayload::Empty => true,
        }
    }
}

/// A stored document as the client sees it.
///
/// Documents are replaced wholesale on every reload; nothing patches a
/// record in place.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub file_name: String,
    /// ISO-8601 timestamp exactly as the server sent it.
    pub creation_date: String,
    pub content_type: Option<String>,
    pub file_size: Option<u64>,
    pub file_url: String,
    /// Detected language code, when the server reports one.
    pub language: Option<String>,
    pub payload: DocumentPayload,
}

impl Document {
    pub fn new(id: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            file_name: file_name.into(),
            creation_date: String::new(),
            content_type: None,
            file_size: None,
            file_url: String::new(),
            language: None,
            payload: DocumentPayload::Empty,
        }
    }

    pub fn with_creation_date(mut self, creation_date: impl Into<String>) -> Self {
        self.creation_date = creation_date.into();
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn with_payload(mut self, payload: DocumentPayload) -> Self {
        self.payload = payload;
        self
    }

    /// Day portion of the creation timestamp (`2024-03-01T10:00:00Z` → `2024-03-01`).
    pub fn date_bucket(&self) -> Option<&str> {
        let date = self
            .creation_date
            .split(|c: char| c == 'T' || c == ' ')
            .next()
            .unwrap_or_default()
            .trim();
        if date.is_empty() {
            None
        } else {
            Some(date)
        }
    }

    /// Parsed creation timestamp, if the server sent a recognizable one.
    pub fn created_at(&self) -> Option<DateTime<FixedOffset>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(&self.creation_date) {
            return Some(dt);
        }
        NaiveDateTime::parse_from_str(&self.creation_date, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc().fixed_offset())
    }

    pub fn category(&self) -> Option<TypeCategory> {
        TypeCategory::classify(self.content_type.as_deref())
    }

    /// Short human label for the file type, falling back to the raw MIME type.
    pub fn mime_label(&self) -> String {
        match (self.category(), self.content_type.as_deref()) {
            (Some(TypeCategory::Other), Some(raw)) => raw.to_string(),
            (Some(category), _) => category.label().to_string(),
            (None, _) => "File".to_string(),
        }
    }

    /// Keyword view of the payload regardless of its wire shape.
    pub fn keywords(&self) -> Vec<Keyword> {
        match &self.payload {
            DocumentPayload::Keywords(keywords) => keywords.clone(),
            DocumentPayload::Text(text) => crate::core::normalize::normalize_keyword_payload(
                &serde_json::Value::String(text.clone()),
            ),
            DocumentPayload::Empty => Vec::new(),
        }
    }
}

// ============================================================================
// Type Categories
// ============================================================================

/// Coarse file category derived from a MIME type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TypeCategory {
    Document,
    Image,
    Other,
    #[serde(rename = "PDF")]
    Pdf,
}

impl TypeCategory {
    /// Case-insensitive substring classification of a content type.
    /// Empty or absent content types have no category.
    pub fn classify(content_type: Option<&str>) -> Option<Self> {
        let mime = content_type.unwrap_or_default().trim().to_lowercase();
        if mime.is_empty() {
            None
        } else if mime.contains("pdf") {
            Some(TypeCategory::Pdf)
        } else if mime.contains("image") {
            Some(TypeCategory::Image)
        } else if mime.contains("word") || mime.contains("officedocument") || mime.contains("msword") {
            Some(TypeCategory::Document)
        } else {
            Some(TypeCategory::Other)
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TypeCategory::Pdf => "PDF",
            TypeCategory::Image => "Image",
            TypeCategory::Document => "Document",
            TypeCategory::Other => "Other",
        }
    }

    pub fn all() -> Vec<Self> {
        vec![
            TypeCategory::Pdf,
            TypeCategory::Image,
            TypeCategory::Document,
            TypeCategory::Other,
        ]
    }
}

impl fmt::Display for TypeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TypeCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TypeCategory::all()
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown type category: {s}"))
    }
}

// ============================================================================
// Filter Options
// ============================================================================

/// Choices offered to the filter controls, derived from the full list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterOptions {
    /// Distinct day buckets, most recent first.
    pub dates: Vec<String>,
    /// Distinct categories, ascending by label.
    pub types: Vec<TypeCategory>,
}

impl FilterOptions {
    pub fn type_labels(&self) -> Vec<&'static str> {
        self.types.iter().map(|t| t.label()).collect()
    }
}

// ============================================================================
// Upload Input
// ============================================================================

/// A file chosen for upload.
#[derive(Debug, Clone, PartialEq)]
pub struct FileSelection {
    pub name: String,
    pub bytes: bytes::Bytes,
    pub content_type: Option<String>,
}

impl FileSelection {
    pub fn new(name: impl Into<String>, bytes: impl Into<bytes::Bytes>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
            content_type: None,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn len(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Read a file from disk, naming it after the final path component.
    pub async fn from_path(path: impl AsRef<std::path::Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self::new(name, bytes))
    }
}
