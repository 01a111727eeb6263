//! Schema document loading and `$ref` resolution
//!
//! This module provides:
//! - JSON and YAML decoding of schema documents
//! - Pluggable byte sources for files and URLs
//! - Reference canonicalization, rewriting and JSON Pointer traversal
//! - Per-engine caching of documents and resolved references
//!
//! # Example Usage
//!
//! ```rust
//! use draftcheck_schemas::loader::RefResolver;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let root = Arc::new(json!({"definitions": {"id": {"type": "integer"}}}));
//! let resolver = RefResolver::new();
//! let node = resolver.resolve("#/definitions/id", &root)?;
//! assert_eq!(*node, json!({"type": "integer"}));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Copyright (c) 2025 Draftcheck Team
//! Licensed under the Apache-2.0 license

pub mod cache;
pub mod error;
pub mod parser;
pub mod resolver;
pub mod source;

pub use cache::{CacheConfig, CacheStats, DocumentCache, RefCache};
pub use error::{LoaderError, LoaderResult};
pub use parser::{Format, SchemaParser};
pub use resolver::{RefResolver, ReferenceValidator, ResolverContext};
pub use source::{DefaultLoader, ResourceLoader};
