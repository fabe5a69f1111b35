//! Tolerant parsing of near-JSON model output.
//!
//! Models wrap JSON in markdown fences, prefix it with prose, use single
//! quotes and `None`/`True` literals, leave trailing commas, forget to quote
//! keys, or stop mid-way when they hit the token limit. [`repair_json`]
//! fixes what can be fixed mechanically and fails with
//! [`SalienceError::Repair`] otherwise.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Result, SalienceError};

/// Parse `raw` as JSON, repairing common defects first if needed.
pub fn repair_json(raw: &str) -> Result<Value> {
    let candidate = strip_code_fence(raw);
    if let Ok(value) = serde_json::from_str::<Value>(candidate) {
        return Ok(value);
    }

    let repaired = repair_text(candidate);
    serde_json::from_str(&repaired).map_err(|e| SalienceError::Repair {
        message: e.to_string(),
        raw: raw.to_string(),
    })
}

/// Repair `raw` and deserialize it into `T`.
pub fn parse_repaired<T: DeserializeOwned>(raw: &str) -> Result<T> {
    let value = repair_json(raw)?;
    serde_json::from_value(value).map_err(|e| SalienceError::Repair {
        message: e.to_string(),
        raw: raw.to_string(),
    })
}

/// Extract the body of a markdown code block, if there is one.
fn strip_code_fence(response: &str) -> &str {
    if response.contains("```json") {
        response
            .split("```json")
            .nth(1)
            .and_then(|s| s.split("```").next())
            .map(|s| s.trim())
            .unwrap_or(response)
    } else if response.contains("```") {
        response
            .split("```")
            .nth(1)
            .map(|s| s.trim())
            .unwrap_or(response)
    } else {
        response.trim()
    }
}

/// Rewrite near-JSON into JSON, starting at the first bracket.
fn repair_text(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let Some(start) = chars.iter().position(|c| *c == '{' || *c == '[') else {
        return input.trim().to_string();
    };

    let mut out = String::with_capacity(input.len() + 8);
    let mut stack: Vec<char> = Vec::new();
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut i = start;

    while i < chars.len() {
        let c = chars[i];

        if let Some(q) = quote {
            if escaped {
                out.push(c);
                escaped = false;
            } else if c == '\\' {
                if q == '\'' && chars.get(i + 1) == Some(&'\'') {
                    out.push('\'');
                    i += 2;
                    continue;
                }
                out.push(c);
                escaped = true;
            } else if c == q {
                out.push('"');
                quote = None;
            } else if c == '"' {
                out.push_str("\\\"");
            } else if c == '\n' {
                out.push_str("\\n");
            } else if c == '\t' {
                out.push_str("\\t");
            } else if c != '\r' {
                out.push(c);
            }
            i += 1;
            continue;
        }

        match c {
            '"' | '\'' => {
                quote = Some(c);
                out.push('"');
            }
            '{' => {
                stack.push('}');
                out.push(c);
            }
            '[' => {
                stack.push(']');
                out.push(c);
            }
            '}' | ']' => {
                // Stray closers are dropped.
                if stack.last() == Some(&c) {
                    trim_trailing_comma(&mut out);
                    stack.pop();
                    out.push(c);
                    if stack.is_empty() {
                        break;
                    }
                }
            }
            c if c.is_alphabetic() || c == '_' => {
                let begin = i;
                while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                let word: String = chars[begin..i].iter().collect();
                let next = chars[i..].iter().find(|c| !c.is_whitespace());

                if stack.last() == Some(&'}') && next == Some(&':') {
                    out.push('"');
                    out.push_str(&word);
                    out.push('"');
                } else {
                    out.push_str(match word.as_str() {
                        "True" => "true",
                        "False" => "false",
                        "None" => "null",
                        other => other,
                    });
                }
                continue;
            }
            _ => out.push(c),
        }
        i += 1;
    }

    // Truncated output: close the open string, drop dangling separators and
    // close every open bracket.
    if quote.is_some() {
        if escaped {
            out.pop();
        }
        out.push('"');
    }
    trim_trailing_comma(&mut out);
    if out.ends_with(':') {
        out.push_str(" null");
    }
    while let Some(closer) = stack.pop() {
        trim_trailing_comma(&mut out);
        out.push(closer);
    }

    out
}

fn trim_trailing_comma(out: &mut String) {
    let len = out.trim_end().len();
    out.truncate(len);
    if out.ends_with(',') {
        out.pop();
        let len = out.trim_end().len();
        out.truncate(len);
    }
}
