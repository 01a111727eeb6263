//! Draftcheck Schemas - JSON Schema validation for drafts 4, 6 and 7
//!
//! This crate validates JSON values against JSON Schema documents and
//! reports a verdict together with path-labeled messages:
//! - **Draft detection**: `$schema` selects draft-04, draft-06 or draft-07
//!   keyword semantics
//! - **Type inference**: schemas without `type` are typed by their keywords
//! - **References**: local and external `$ref`, JSON Pointer fragments,
//!   cached per engine, with a cycle guard
//! - **Formats**: dates, times, emails, hostnames, IP addresses, URIs,
//!   URI templates and JSON Pointers
//!
//! ## Quick Start
//!
//! ```rust
//! use draftcheck_schemas::SchemaEngine;
//! use serde_json::json;
//!
//! let mut engine = SchemaEngine::new();
//! engine.set_schema(r#"{"type": "object", "required": ["name"]}"#);
//!
//! let report = engine.validate(&json!({"age": 42}));
//! assert!(!report.valid);
//! assert_eq!(report.messages(), vec!["missing properties: name at context path: #/"]);
//! ```
//!
//! ## Messages
//!
//! Every message reads `"<problem> at context path: <label>"`. Labels start
//! at `#/`, add `/name` for object members and `[i]` for array elements.
//! Each [`ValidationError`] also carries an [`ErrorKind`] and the label as a
//! separate field.
//!
//! Copyright (c) 2025 Draftcheck Team
//! Licensed under the Apache-2.0 license

pub mod codec;
pub mod config;
pub mod draft;
pub mod engine;
pub mod loader;
pub mod validation;

// Re-export commonly used types for convenience
pub use codec::{compact_preview, parse, CodecError};
pub use config::EngineConfig;
pub use draft::{DraftDetection, DraftVersion};
pub use engine::{SchemaEngine, ValidationReport};
pub use loader::{CacheConfig, CacheStats, DefaultLoader, LoaderError, LoaderResult, ReferenceValidator, ResourceLoader};
pub use validation::{ErrorKind, ValidationError, ValidationErrors};
