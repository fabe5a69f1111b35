//! Rating values and validation of one rating response.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::error::SalienceError;
use crate::llm::repair_json;

/// An importance rating on the 1-5 ordinal scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> Result<Self, SalienceError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(SalienceError::InvalidRating(format!(
                "{} is outside {}-{}",
                value,
                Self::MIN,
                Self::MAX
            )))
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    /// Parse a rating from a JSON number or a numeric string.
    pub fn from_json(value: &Value) -> Result<Self, SalienceError> {
        match value {
            Value::Number(n) => match n.as_u64() {
                Some(v) => Self::from_integer(v),
                None => n
                    .as_f64()
                    .filter(|f| f.fract() == 0.0 && *f >= 0.0)
                    .map(|f| Self::from_integer(f as u64))
                    .unwrap_or_else(|| {
                        Err(SalienceError::InvalidRating(format!("{} is not an integer", n)))
                    }),
            },
            Value::String(s) => s.parse(),
            other => Err(SalienceError::InvalidRating(format!(
                "expected number, got {}",
                other
            ))),
        }
    }

    fn from_integer(v: u64) -> Result<Self, SalienceError> {
        u8::try_from(v)
            .map_err(|_| SalienceError::InvalidRating(format!("{} is outside 1-5", v)))
            .and_then(Self::new)
    }
}

impl FromStr for Rating {
    type Err = SalienceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(v) = trimmed.parse::<u64>() {
            return Self::from_integer(v);
        }
        match trimmed.parse::<f64>() {
            Ok(f) if f.fract() == 0.0 && f >= 0.0 => Self::from_integer(f as u64),
            _ => Err(SalienceError::InvalidRating(format!(
                "'{}' is not a number",
                trimmed
            ))),
        }
    }
}

impl<'de> Deserialize<'de> for Rating {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Rating::from_json(&value).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One validated entry of a rating response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingRecord {
    /// 1-based position in the presented (shuffled) order.
    pub id: usize,
    pub question: String,
    pub rating: Rating,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,
}

/// Why a rating pass was discarded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RejectReason {
    #[error("generation failed: {0}")]
    Generation(String),

    #[error("unparsable response: {0}")]
    Parse(String),

    #[error("length mismatch: expected {expected}, generated {actual}")]
    CountMismatch { expected: usize, actual: usize },

    #[error("ids are not 1..={expected}: {ids:?}")]
    IdMismatch { expected: usize, ids: Vec<usize> },

    #[error("question {id} does not match the prompt: {returned:?}")]
    QuestionMismatch { id: usize, returned: String },

    #[error("invalid rating for question {id}: {message}")]
    InvalidRating { id: usize, message: String },
}

/// Validate a raw response against the questions in presented order.
///
/// On success the records are sorted by `id`, so `records[k]` rates
/// `presented[k]`.
pub fn validate_response(
    raw: &str,
    presented: &[&str],
) -> Result<Vec<RatingRecord>, RejectReason> {
    let entries = match repair_json(raw) {
        Ok(Value::Array(entries)) => entries,
        Ok(other) => {
            return Err(RejectReason::Parse(format!(
                "expected a list, got {}",
                json_kind(&other)
            )))
        }
        Err(e) => return Err(RejectReason::Parse(e.to_string())),
    };

    if entries.len() != presented.len() {
        return Err(RejectReason::CountMismatch {
            expected: presented.len(),
            actual: entries.len(),
        });
    }

    let mut keyed = entries
        .iter()
        .map(|entry| Ok((entry_id(entry)?, entry)))
        .collect::<Result<Vec<_>, RejectReason>>()?;
    // Some models list the most important question first.
    keyed.sort_by_key(|(id, _)| *id);

    let ids: Vec<usize> = keyed.iter().map(|(id, _)| *id).collect();
    if !ids.iter().enumerate().all(|(k, id)| *id == k + 1) {
        return Err(RejectReason::IdMismatch {
            expected: presented.len(),
            ids,
        });
    }

    keyed
        .into_iter()
        .zip(presented)
        .map(|((id, entry), expected)| {
            let returned = entry
                .get("question")
                .and_then(Value::as_str)
                .unwrap_or_default();
            if !echoes(returned, expected, id) {
                return Err(RejectReason::QuestionMismatch {
                    id,
                    returned: returned.to_string(),
                });
            }

            let rating = entry
                .get("rating")
                .ok_or_else(|| "missing rating".to_string())
                .and_then(|v| Rating::from_json(v).map_err(|e| e.to_string()))
                .map_err(|message| RejectReason::InvalidRating { id, message })?;

            let rationale = entry.get("rationale").and_then(|v| match v {
                Value::String(s) => Some(s.clone()),
                Value::Null => None,
                other => Some(other.to_string()),
            });

            Ok(RatingRecord {
                id,
                question: returned.to_string(),
                rating,
                rationale,
            })
        })
        .collect()
}

fn entry_id(entry: &Value) -> Result<usize, RejectReason> {
    let id = entry
        .get("id")
        .ok_or_else(|| RejectReason::Parse(format!("entry without id: {}", entry)))?;
    let parsed = match id {
        Value::Number(n) => n.as_u64().and_then(|v| usize::try_from(v).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| RejectReason::Parse(format!("invalid id: {}", id)))
}

/// Compare a returned question with the prompt question, ignoring case,
/// whitespace and an echoed list number.
fn echoes(returned: &str, expected: &str, id: usize) -> bool {
    let returned = returned.trim();
    let returned = returned
        .strip_prefix(&format!("{}.", id))
        .unwrap_or(returned);
    normalize(returned) == normalize(expected)
}

fn normalize(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
