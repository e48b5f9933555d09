//! JSON Recovery: pulls a JSON object out of noisy model completions.
//!
//! Model output routinely wraps the object in prose ("Here is the JSON:"),
//! markdown fences, or trailing sign-offs. Extraction is brace-based, so any
//! fence markers fall outside the `{…}` span and never block parsing.
//!
//! Strategy, in order:
//! 1. strip everything before the first `{` and after the last `}` and parse;
//! 2. parse the greedy `{…}` span of the untouched text;
//! 3. scan each top-level `{` left to right and accept the first prefix that
//!    parses as a complete object (multiple objects yield the first valid one).
//!    Braces nested inside an earlier candidate are never tried on their own,
//!    so truncated output fails instead of yielding an inner fragment.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

/// Hard failure of JSON recovery. The two variants let callers decide whether
/// re-running the generation call is worthwhile.
#[derive(Debug, Error, PartialEq)]
pub enum ParseFailure {
    #[error("no JSON object found in model output")]
    NoJsonFound,

    #[error("malformed JSON in model output: {0}")]
    MalformedJson(String),
}

/// Recovers the first parseable JSON object from raw model text.
pub fn parse_model_json(raw: &str) -> Result<Map<String, Value>, ParseFailure> {
    let (start, end) = match (raw.find('{'), raw.rfind('}')) {
        (Some(start), Some(end)) if start < end => (start, end),
        _ => return Err(ParseFailure::NoJsonFound),
    };

    // Step 1: strip-and-parse.
    let stripped = raw[start..=end].trim();
    let first_error = match serde_json::from_str::<Value>(stripped) {
        Ok(Value::Object(map)) => return Ok(map),
        Ok(other) => format!("expected an object, found {}", json_kind(&other)),
        Err(e) => e.to_string(),
    };
    debug!("strip-and-parse failed ({first_error}); scanning for embedded objects");

    // Step 2/3: the greedy span is the same byte range as step 1, so the only
    // remaining candidates are brace-started prefixes that close early.
    for offset in top_level_open_braces(&raw[start..]) {
        if let Some(map) = first_object_at(&raw[start + offset..]) {
            return Ok(map);
        }
    }

    Err(ParseFailure::MalformedJson(first_error))
}

/// Recovers a JSON object and deserializes it into `T`.
pub fn parse_model_json_as<T: DeserializeOwned>(raw: &str) -> Result<T, ParseFailure> {
    let map = parse_model_json(raw)?;
    serde_json::from_value(Value::Object(map)).map_err(|e| ParseFailure::MalformedJson(e.to_string()))
}

/// Byte offsets of every `{` at brace depth 0. String literals are tracked only
/// inside braces, so quotes in surrounding prose do not shift the depth.
fn top_level_open_braces(text: &str) -> Vec<usize> {
    let mut offsets = Vec::new();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text.char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '{' => {
                if depth == 0 {
                    offsets.push(offset);
                }
                depth += 1;
            }
            '}' => depth = depth.saturating_sub(1),
            '"' if depth > 0 => in_string = true,
            _ => {}
        }
    }
    offsets
}

/// Parses a single JSON value from the front of `text`, ignoring whatever follows it.
fn first_object_at(text: &str) -> Option<Map<String, Value>> {
    let mut stream = serde_json::Deserializer::from_str(text).into_iter::<Value>();
    match stream.next() {
        Some(Ok(Value::Object(map))) => Some(map),
        _ => None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
