//! Draft detection, schema node classification and implicit typing
//!
//! Copyright (c) 2025 Draftcheck Team
//! Licensed under the Apache-2.0 license

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// JSON Schema revision governing keyword semantics
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum DraftVersion {
    Draft4,
    Draft6,
    Draft7,
}

/// `$schema` URIs and the draft each selects
pub const DRAFT_URIS: &[(&str, DraftVersion)] = &[
    ("http://json-schema.org/draft/2019-09/schema#", DraftVersion::Draft7),
    ("http://json-schema.org/draft-07/schema#", DraftVersion::Draft7),
    ("http://json-schema.org/draft-06/schema#", DraftVersion::Draft6),
    ("http://json-schema.org/draft-04/schema#", DraftVersion::Draft4),
    ("http://json-schema.org/schema#", DraftVersion::Draft7),
];

impl DraftVersion {
    pub const LATEST: DraftVersion = DraftVersion::Draft7;

    pub fn as_u8(&self) -> u8 {
        match self {
            DraftVersion::Draft4 => 4,
            DraftVersion::Draft6 => 6,
            DraftVersion::Draft7 => 7,
        }
    }

    /// Exact lookup of a `$schema` URI
    pub fn from_uri(uri: &str) -> Option<Self> {
        DRAFT_URIS
            .iter()
            .find(|(known, _)| *known == uri)
            .map(|(_, version)| *version)
    }

    /// Keyword naming the document base identifier
    pub fn id_keyword(&self) -> &'static str {
        match self {
            DraftVersion::Draft4 => "id",
            DraftVersion::Draft6 | DraftVersion::Draft7 => "$id",
        }
    }
}

impl TryFrom<u8> for DraftVersion {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            4 => Ok(DraftVersion::Draft4),
            6 => Ok(DraftVersion::Draft6),
            7 => Ok(DraftVersion::Draft7),
            other => Err(format!("unsupported draft version {} (expected 4, 6 or 7)", other)),
        }
    }
}

impl From<DraftVersion> for u8 {
    fn from(version: DraftVersion) -> Self {
        version.as_u8()
    }
}

impl fmt::Display for DraftVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "draft-{:02}", self.as_u8())
    }
}

/// Outcome of reading `$schema` from a root document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftDetection {
    /// `$schema` names a known draft
    Declared(DraftVersion),
    /// `$schema` is absent or not a string
    Defaulted(DraftVersion),
    /// `$schema` is a string matching no known draft
    Unknown(String),
}

impl DraftDetection {
    pub fn detect(schema: &Value, default: DraftVersion) -> Self {
        match schema.get("$schema") {
            Some(Value::String(uri)) => match DraftVersion::from_uri(uri) {
                Some(version) => DraftDetection::Declared(version),
                None => DraftDetection::Unknown(uri.clone()),
            },
            _ => DraftDetection::Defaulted(default),
        }
    }

    pub fn version(&self) -> Option<DraftVersion> {
        match self {
            DraftDetection::Declared(v) | DraftDetection::Defaulted(v) => Some(*v),
            DraftDetection::Unknown(_) => None,
        }
    }
}

/// Base identifier declared by a root document.
///
/// An undetermined draft accepts either `$id` or `id`. Fragment-only
/// identifiers name anchors, not documents, and are ignored.
pub fn base_identifier(schema: &Value, draft: Option<DraftVersion>) -> Option<&str> {
    let keywords: &[&str] = match draft {
        Some(version) => &[version.id_keyword()],
        None => &["$id", "id"],
    };
    keywords
        .iter()
        .find_map(|k| schema.get(*k).and_then(Value::as_str))
        .filter(|id| !id.is_empty() && !id.starts_with('#'))
}

/// A schema position classified by shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SchemaNode<'a> {
    Boolean(bool),
    Keywords(&'a Map<String, Value>),
}

impl<'a> SchemaNode<'a> {
    /// `None` for values that are neither a boolean nor a mapping
    pub fn classify(value: &'a Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(SchemaNode::Boolean(*b)),
            Value::Object(map) => Some(SchemaNode::Keywords(map)),
            _ => None,
        }
    }
}

/// Keywords that imply a type when `type` is absent, in priority order
pub const KEYWORD_TYPES: &[(&str, &str)] = &[
    // string
    ("minLength", "string"),
    ("maxLength", "string"),
    ("pattern", "string"),
    ("format", "string"),
    // number
    ("multipleOf", "number"),
    ("minimum", "number"),
    ("exclusiveMinimum", "number"),
    ("maximum", "number"),
    ("exclusiveMaximum", "number"),
    // object
    ("properties", "object"),
    ("additionalProperties", "object"),
    ("required", "object"),
    ("propertyNames", "object"),
    ("minProperties", "object"),
    ("maxProperties", "object"),
    ("dependencies", "object"),
    ("patternProperties", "object"),
    // array
    ("items", "array"),
    ("additionalItems", "array"),
    ("contains", "array"),
    ("minItems", "array"),
    ("maxItems", "array"),
    ("uniqueItems", "array"),
];

/// Type implied by the first table keyword present in `keywords`
pub fn implied_type(keywords: &Map<String, Value>) -> Option<&'static str> {
    KEYWORD_TYPES
        .iter()
        .find(|(keyword, _)| keywords.contains_key(*keyword))
        .map(|(_, ty)| *ty)
}
