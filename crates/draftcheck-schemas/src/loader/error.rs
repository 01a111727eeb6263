//! Error types for schema loading and reference resolution
//!
//! Copyright (c) 2025 Draftcheck Team
//! Licensed under the Apache-2.0 license

use thiserror::Error;

/// Result type for loader operations
pub type LoaderResult<T> = Result<T, LoaderError>;

/// Failures raised while fetching, decoding or dereferencing schema documents
#[derive(Error, Debug)]
pub enum LoaderError {
    /// Local file could not be read
    #[error("failed to read '{location}': {source}")]
    Io {
        location: String,
        source: std::io::Error,
    },

    /// Remote document could not be fetched
    #[error("failed to fetch '{location}': {reason}")]
    Http { location: String, reason: String },

    /// Locator uses a scheme the loader cannot serve
    #[error("unsupported scheme '{scheme}' in '{location}'")]
    UnsupportedScheme { location: String, scheme: String },

    /// Document is not valid JSON
    #[error("failed to decode JSON document '{location}': {source}")]
    JsonParse {
        location: String,
        source: serde_json::Error,
    },

    /// Document is not valid YAML
    #[error("failed to decode YAML document '{location}': {source}")]
    YamlParse {
        location: String,
        source: serde_yaml::Error,
    },

    /// Fragment could not be walked to a node
    #[error("cannot resolve pointer '{pointer}' in '{reference}': {reason}")]
    Pointer {
        reference: String,
        pointer: String,
        reason: String,
    },

    /// Reference string is malformed or cannot be canonicalized
    #[error("invalid reference '{reference}': {reason}")]
    InvalidReference { reference: String, reason: String },

    /// A chain of references loops back on itself
    #[error("circular reference detected: {chain}")]
    CircularReference { chain: String },
}

impl LoaderError {
    /// Create an I/O error with location context
    pub fn io_error(location: impl Into<String>, error: std::io::Error) -> Self {
        Self::Io {
            location: location.into(),
            source: error,
        }
    }

    pub fn http_error(location: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Http {
            location: location.into(),
            reason: reason.into(),
        }
    }

    pub fn unsupported_scheme(location: impl Into<String>, scheme: impl Into<String>) -> Self {
        Self::UnsupportedScheme {
            location: location.into(),
            scheme: scheme.into(),
        }
    }

    /// Create a JSON decoding error with location context
    pub fn json_parse_error(location: impl Into<String>, error: serde_json::Error) -> Self {
        Self::JsonParse {
            location: location.into(),
            source: error,
        }
    }

    /// Create a YAML decoding error with location context
    pub fn yaml_parse_error(location: impl Into<String>, error: serde_yaml::Error) -> Self {
        Self::YamlParse {
            location: location.into(),
            source: error,
        }
    }

    pub fn pointer_error(
        reference: impl Into<String>,
        pointer: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Pointer {
            reference: reference.into(),
            pointer: pointer.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_reference(reference: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidReference {
            reference: reference.into(),
            reason: reason.into(),
        }
    }

    /// Create a circular reference error from the chain of refs walked so far
    pub fn circular_reference<S: AsRef<str>>(chain: &[S]) -> Self {
        let chain = chain
            .iter()
            .map(|s| s.as_ref())
            .collect::<Vec<_>>()
            .join(" -> ");
        Self::CircularReference { chain }
    }

    /// Location of the document involved, if any
    pub fn location(&self) -> Option<&str> {
        match self {
            Self::Io { location, .. }
            | Self::Http { location, .. }
            | Self::UnsupportedScheme { location, .. }
            | Self::JsonParse { location, .. }
            | Self::YamlParse { location, .. } => Some(location),
            _ => None,
        }
    }

    /// Whether the failure came from reading or fetching rather than decoding
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Io { .. } | Self::Http { .. } | Self::UnsupportedScheme { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let io_err = LoaderError::io_error(
            "schemas/a.json",
            std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        );
        assert!(matches!(io_err, LoaderError::Io { .. }));
        assert_eq!(io_err.location(), Some("schemas/a.json"));
        assert!(io_err.is_transport());

        let circular = LoaderError::circular_reference(&["#/a", "#/b", "#/a"]);
        assert_eq!(
            circular.to_string(),
            "circular reference detected: #/a -> #/b -> #/a"
        );
        assert_eq!(circular.location(), None);
    }

    #[test]
    fn test_decode_errors_are_not_transport() {
        let err = LoaderError::json_parse_error(
            "doc.json",
            serde_json::from_str::<serde_json::Value>("{").unwrap_err(),
        );
        assert!(!err.is_transport());
        assert!(err.to_string().starts_with("failed to decode JSON document 'doc.json'"));
    }
}
