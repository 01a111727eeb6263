//! Validation error types and the append-only error accumulator
//!
//! Copyright (c) 2025 Draftcheck Team
//! Licensed under the Apache-2.0 license

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Stable classification of a validation message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The value's JSON type disagrees with the schema `type`
    TypeMismatch,
    /// The value fails a specific keyword (range, length, pattern, ...)
    KeywordViolation,
    /// `enum`, `const`, `anyOf`, `allOf`, `oneOf`, `not` or `if` mismatch
    CombinatorViolation,
    /// The schema itself is malformed
    SchemaStructure,
    /// A `$ref` target could not be loaded or traversed
    ReferenceResolution,
    /// A `$ref` chain loops back on itself or nests too deeply
    ReferenceCycle,
    /// Schema or value text could not be decoded
    Decode,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::TypeMismatch => "type_mismatch",
            ErrorKind::KeywordViolation => "keyword_violation",
            ErrorKind::CombinatorViolation => "combinator_violation",
            ErrorKind::SchemaStructure => "schema_structure",
            ErrorKind::ReferenceResolution => "reference_resolution",
            ErrorKind::ReferenceCycle => "reference_cycle",
            ErrorKind::Decode => "decode",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One validation failure with its path label kept as a separate field
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub struct ValidationError {
    pub kind: ErrorKind,
    /// Path label of the offending value; `None` for document-level diagnostics
    pub path: Option<String>,
    /// Human-readable description of the problem
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "{} at context path: {}", self.message, path),
            None => f.write_str(&self.message),
        }
    }
}

impl ValidationError {
    pub fn new<M>(kind: ErrorKind, path: Option<&str>, message: M) -> Self
    where
        M: Into<String>,
    {
        Self {
            kind,
            path: path.map(str::to_string),
            message: message.into(),
        }
    }

    /// Document-level error with no path label
    pub fn document<M: Into<String>>(kind: ErrorKind, message: M) -> Self {
        Self::new(kind, None, message)
    }
}

/// Ordered, append-only list of validation errors
#[derive(Debug, Clone, Default, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", error)?;
        }
        Ok(())
    }
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Move every error of `other` onto the end of this list
    pub fn append(&mut self, other: &mut ValidationErrors) {
        self.errors.append(&mut other.errors);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.errors.iter()
    }

    pub fn first(&self) -> Option<&ValidationError> {
        self.errors.first()
    }

    /// Rendered `"<problem> at context path: <label>"` strings
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    pub fn count_of(&self, kind: ErrorKind) -> usize {
        self.errors.iter().filter(|e| e.kind == kind).count()
    }

    /// Convert to result - Ok if no errors, Err if any errors exist
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    pub fn into_vec(self) -> Vec<ValidationError> {
        self.errors
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        Self {
            errors: vec![error],
        }
    }
}

impl From<Vec<ValidationError>> for ValidationErrors {
    fn from(errors: Vec<ValidationError>) -> Self {
        Self { errors }
    }
}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}
