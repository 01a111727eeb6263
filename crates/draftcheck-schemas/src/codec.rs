//! JSON text decoding and compact value previews for messages
//!
//! Copyright (c) 2025 Draftcheck Team
//! Licensed under the Apache-2.0 license

use serde_json::Value;
use thiserror::Error;

/// Failure to decode JSON text
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("invalid JSON at line {line}, column {column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("unexpected end of JSON input at line {line}, column {column}")]
    Eof { line: usize, column: usize },

    #[error("JSON value is not representable: {message}")]
    Data { message: String },
}

impl From<serde_json::Error> for CodecError {
    fn from(error: serde_json::Error) -> Self {
        use serde_json::error::Category;

        let (line, column) = (error.line(), error.column());
        match error.classify() {
            Category::Eof => Self::Eof { line, column },
            Category::Syntax | Category::Io => Self::Syntax {
                line,
                column,
                message: error.to_string(),
            },
            Category::Data => Self::Data {
                message: error.to_string(),
            },
        }
    }
}

/// Decode JSON text into a value with insertion-ordered objects
pub fn parse(text: &str) -> Result<Value, CodecError> {
    serde_json::from_str(text).map_err(CodecError::from)
}

/// Render `value` as compact JSON, cut to `max_chars` characters.
///
/// A cut preview has trailing whitespace removed and ends with `...`.
pub fn compact_preview(value: &Value, max_chars: usize) -> String {
    let compact = value.to_string();
    match compact.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", compact[..cut].trim_end()),
        None => compact,
    }
}
