//! Payload Normalization
//!
//! Converts whatever shape the documents backend returns into the fixed
//! [`Document`] / [`Keyword`] model. Every function here is pure and total:
//! malformed input degrades to an empty result and a log line, never an error.

use serde_json::{Map, Value};

use super::models::{Document, DocumentPayload, Keyword};

// ============================================================================
// Document Lists
// ============================================================================

/// Normalize a list response.
///
/// Accepts a bare array or a paginated envelope (`{"results": [...]}`). Any
/// other shape yields an empty list.
pub fn normalize_list(raw: &Value) -> Vec<Document> {
    let items = match raw {
        Value::Array(items) => items,
        Value::Object(obj) => match obj.get("results") {
            Some(Value::Array(items)) => items,
            _ => {
                tracing::warn!("document list response is an object without a results array");
                return Vec::new();
            }
        },
        other => {
            tracing::warn!(kind = value_kind(other), "unexpected document list response shape");
            return Vec::new();
        }
    };

    let documents: Vec<Document> = items.iter().filter_map(normalize_document).collect();
    let dropped = items.len() - documents.len();
    if dropped > 0 {
        tracing::warn!(dropped, kept = documents.len(), "document list contained unusable records");
    }
    documents
}

/// Normalize one document record. Records without a usable id are dropped.
pub fn normalize_document(raw: &Value) -> Option<Document> {
    let Some(obj) = raw.as_object() else {
        tracing::warn!(kind = value_kind(raw), "skipping non-object document entry");
        return None;
    };

    let id = match field(obj, &["id"]) {
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => {
            tracing::warn!("skipping document entry without an id");
            return None;
        }
    };

    Some(Document {
        id,
        file_name: string_field(obj, &["fileName", "file_name"]).unwrap_or_default(),
        creation_date: string_field(obj, &["creationDate", "creation_date"]).unwrap_or_default(),
        content_type: string_field(obj, &["contentType", "content_type"]),
        file_size: field(obj, &["fileSize", "file_size"]).and_then(size_value),
        file_url: string_field(obj, &["fileUrl", "file_url"]).unwrap_or_default(),
        language: string_field(obj, &["language"]),
        payload: decode_payload(obj.get("data")),
    })
}

/// Decode the variant `data` field into a [`DocumentPayload`].
///
/// Arrays and JSON-encoded arrays become keyword lists; other text stays text.
pub fn decode_payload(raw: Option<&Value>) -> DocumentPayload {
    match raw {
        None | Some(Value::Null) => DocumentPayload::Empty,
        Some(Value::Array(items)) => {
            DocumentPayload::Keywords(items.iter().map(normalize_keyword).collect())
        }
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return DocumentPayload::Empty;
            }
            if trimmed.starts_with('[') {
                if let Ok(Value::Array(items)) = serde_json::from_str::<Value>(trimmed) {
                    return DocumentPayload::Keywords(items.iter().map(normalize_keyword).collect());
                }
            }
            DocumentPayload::Text(s.clone())
        }
        Some(Value::Number(n)) => DocumentPayload::Text(n.to_string()),
        Some(Value::Bool(b)) => DocumentPayload::Text(b.to_string()),
        Some(Value::Object(_)) => {
            tracing::debug!("ignoring object-shaped document data");
            DocumentPayload::Empty
        }
    }
}

// ============================================================================
// Keywords
// ============================================================================

/// Normalize a keyword payload of any accepted shape.
///
/// - array: every element through [`normalize_keyword`], cardinality kept
/// - string: a JSON-encoded array is decoded, any other JSON value is
///   empty, and text that is not JSON is split on commas
/// - null / anything else: empty
pub fn normalize_keyword_payload(raw: &Value) -> Vec<Keyword> {
    match raw {
        Value::Array(items) => items.iter().map(normalize_keyword).collect(),
        Value::String(s) => match serde_json::from_str::<Value>(s) {
            Ok(Value::Array(items)) => items.iter().map(normalize_keyword).collect(),
            Ok(other) => {
                tracing::debug!(kind = value_kind(&other), "keyword payload string decoded to a non-array");
                Vec::new()
            }
            Err(_) => split_words(s),
        },
        _ => Vec::new(),
    }
}

/// Normalize a `keyword-stats/` response.
///
/// The endpoint answers with an array of `{word, score, percent}` items. An
/// object is accepted only when its `data` field holds an array (or a
/// JSON-encoded one); free text under `data` is extracted prose, not
/// keywords, and yields nothing.
pub fn normalize_keyword_response(raw: &Value) -> Vec<Keyword> {
    match raw {
        Value::Array(items) => items.iter().map(normalize_keyword).collect(),
        Value::Object(obj) => match obj.get("data") {
            Some(Value::Array(items)) => items.iter().map(normalize_keyword).collect(),
            Some(Value::String(s)) => match serde_json::from_str::<Value>(s) {
                Ok(Value::Array(items)) => items.iter().map(normalize_keyword).collect(),
                _ => Vec::new(),
            },
            _ => {
                tracing::warn!("keyword statistics object carries no keyword array");
                Vec::new()
            }
        },
        other => {
            tracing::warn!(kind = value_kind(other), "unexpected keyword statistics shape");
            Vec::new()
        }
    }
}

/// Normalize a single keyword item.
///
/// Named keys win; the weight may arrive as `count`, `score` or `weight`.
/// Positional entries (`[word, count, percent]`) are the fallback. Missing
/// or unusable parts default to empty / zero.
pub fn normalize_keyword(item: &Value) -> Keyword {
    match item {
        Value::String(s) => Keyword::bare(s.trim()),
        Value::Object(obj) => Keyword::new(
            truthy(obj.get("word")).or_else(|| truthy(obj.get("0"))).map(word_value).unwrap_or_default(),
            truthy(obj.get("count"))
                .or_else(|| truthy(obj.get("score")))
                .or_else(|| truthy(obj.get("weight")))
                .or_else(|| truthy(obj.get("1")))
                .map(number_value)
                .unwrap_or_default(),
            truthy(obj.get("percent")).or_else(|| truthy(obj.get("2"))).map(number_value).unwrap_or_default(),
        ),
        Value::Array(parts) => Keyword::new(
            truthy(parts.first()).map(word_value).unwrap_or_default(),
            truthy(parts.get(1)).map(number_value).unwrap_or_default(),
            truthy(parts.get(2)).map(number_value).unwrap_or_default(),
        ),
        _ => Keyword::default(),
    }
}

/// Human-friendly listing, one `word (percent%)` per line.
pub fn format_keyword_list(keywords: &[Keyword]) -> String {
    keywords
        .iter()
        .map(|k| format!("{} ({}%)", k.word, k.percent))
        .collect::<Vec<_>>()
        .join("\n")
}

// ============================================================================
// Helpers
// ============================================================================

fn split_words(s: &str) -> Vec<Keyword> {
    s.split(',')
        .map(str::trim)
        .filter(|w| !w.is_empty())
        .map(Keyword::bare)
        .collect()
}

/// First present, non-null value among `keys`.
fn field<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| obj.get(*k))
        .find(|v| !v.is_null())
}

fn string_field(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    match field(obj, keys)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn size_value(v: &Value) -> Option<u64> {
    match v {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite() && *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// JavaScript-style truthiness: null, false, 0 and "" count as absent.
fn truthy(v: Option<&Value>) -> Option<&Value> {
    v.filter(|v| match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    })
}

fn word_value(v: &Value) -> String {
    match v {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

fn number_value(v: &Value) -> f64 {
    match v {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse().unwrap_or(0.0),
        Value::Bool(true) => 1.0,
        _ => 0.0,
    }
}

fn value_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
