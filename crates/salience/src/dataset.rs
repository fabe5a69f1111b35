//! Record-oriented JSON datasets.
//!
//! Documents come in as a JSON array of `{doc_id, text}` objects; every
//! pipeline stage writes its output as a JSON array of flat records.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read};
use std::path::Path;

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::error::{Result, SalienceError};

/// An input document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(deserialize_with = "string_or_number")]
    pub doc_id: String,
    pub text: String,
}

impl Document {
    pub fn new(doc_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            doc_id: doc_id.into(),
            text: text.into(),
        }
    }
}

/// A question with a stable key, as produced by question clustering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    #[serde(deserialize_with = "string_or_number")]
    pub cluster_id: String,
    #[serde(alias = "centroid")]
    pub question: String,
}

impl Question {
    pub fn new(cluster_id: impl Into<String>, question: impl Into<String>) -> Self {
        Self {
            cluster_id: cluster_id.into(),
            question: question.into(),
        }
    }
}

/// Column name for a summary of `length` words (`summary_50w`).
pub fn summary_column(length: usize) -> String {
    format!("summary_{}w", length)
}

/// One document with its summaries at several lengths.
///
/// Serializes flat: `{doc_id, text, summary_10w, summary_20w, ...}` with
/// columns in insertion order and `null` where no summary was produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRecord {
    #[serde(deserialize_with = "string_or_number")]
    pub doc_id: String,
    pub text: String,
    #[serde(flatten)]
    summaries: IndexMap<String, Value>,
}

impl SummaryRecord {
    /// Start a record for `document` with no summaries.
    pub fn new(document: &Document) -> Self {
        Self {
            doc_id: document.doc_id.clone(),
            text: document.text.clone(),
            summaries: IndexMap::new(),
        }
    }

    /// Set (or clear, with `None`) the summary of `length` words.
    pub fn set_summary(&mut self, length: usize, summary: Option<String>) {
        let value = summary.map(Value::String).unwrap_or(Value::Null);
        self.summaries.insert(summary_column(length), value);
    }

    /// The summary of `length` words, if present and non-null.
    pub fn summary(&self, length: usize) -> Option<&str> {
        self.summaries
            .get(&summary_column(length))
            .and_then(Value::as_str)
    }

    /// Lengths that have a summary column, in column order.
    pub fn lengths(&self) -> Vec<usize> {
        self.summaries
            .keys()
            .filter_map(|key| key.strip_prefix("summary_")?.strip_suffix('w')?.parse().ok())
            .collect()
    }

    /// Whether every column holds a summary.
    pub fn is_complete(&self) -> bool {
        self.summaries.values().all(|v| !v.is_null())
    }
}

/// Load input documents from a JSON array.
pub fn load_documents(path: impl AsRef<Path>) -> Result<Vec<Document>> {
    load_records(path)
}

/// Load any JSON array of records.
pub fn load_records<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<Vec<T>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| SalienceError::io(path, e))?;
    let records = serde_json::from_reader(BufReader::new(file))?;
    Ok(records)
}

/// Write records as a JSON array, creating parent directories if needed.
pub fn write_records<T: Serialize>(path: impl AsRef<Path>, records: &[T]) -> Result<()> {
    write_json(path, &records)
}

/// Write any serializable value as pretty JSON.
pub fn write_json<T: Serialize + ?Sized>(path: impl AsRef<Path>, value: &T) -> Result<()> {
    let path = path.as_ref();
    ensure_parent(path)?;
    let file = File::create(path).map_err(|e| SalienceError::io(path, e))?;
    serde_json::to_writer_pretty(BufWriter::new(file), value)?;
    Ok(())
}

/// Create the parent directory of `path` if it does not exist.
pub fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| SalienceError::io(parent, e))?;
        }
    }
    Ok(())
}

/// SHA-256 of a file's contents, formatted as `sha256:<hex>`.
pub fn file_sha256(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let mut file = File::open(path).map_err(|e| SalienceError::io(path, e))?;
    let mut contents = Vec::new();
    file.read_to_end(&mut contents)
        .map_err(|e| SalienceError::io(path, e))?;

    let mut hasher = Sha256::new();
    hasher.update(&contents);
    Ok(format!("sha256:{:x}", hasher.finalize()))
}

/// Accept ids written as JSON strings or numbers.
fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {}",
            other
        ))),
    }
}
