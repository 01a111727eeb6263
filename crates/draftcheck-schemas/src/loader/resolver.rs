//! `$ref` resolution across the root document and external documents
//!
//! This module handles:
//! - Canonicalizing locators against the document base identifier
//! - Loading external documents and rewriting their nested references
//! - JSON Pointer fragment traversal
//! - Reference cycle detection during evaluation
//!
//! Copyright (c) 2025 Draftcheck Team
//! Licensed under the Apache-2.0 license

use crate::loader::cache::{CacheConfig, CacheStats, DocumentCache, RefCache};
use crate::loader::error::{LoaderError, LoaderResult};
use crate::loader::parser::SchemaParser;
use crate::loader::source::{parse_absolute_url, DefaultLoader, ResourceLoader};
use serde_json::Value;
use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use url::Url;

/// Tracks the references currently being evaluated in one validation call
#[derive(Debug, Clone)]
pub struct ResolverContext {
    /// Reference keys paired with the address of the value they were applied to
    resolution_stack: Vec<(String, usize)>,
    /// Maximum chain of references applied to one value
    pub max_depth: usize,
}

impl ResolverContext {
    pub fn new(max_depth: usize) -> Self {
        Self {
            resolution_stack: Vec::new(),
            max_depth,
        }
    }

    /// Enter a reference applied to the value at `value_addr`.
    ///
    /// Fails when the same reference is already being applied to the same
    /// value further up the stack, or when `max_depth` references are
    /// already chained on that value. References entered for deeper values
    /// do not count towards the limit.
    pub fn push_reference(&mut self, reference: &str, value_addr: usize) -> LoaderResult<()> {
        let revisited = self
            .resolution_stack
            .iter()
            .any(|(r, addr)| r == reference && *addr == value_addr);
        let chained = self
            .resolution_stack
            .iter()
            .rev()
            .take_while(|(_, addr)| *addr == value_addr)
            .count();

        if revisited || chained >= self.max_depth {
            let mut chain: Vec<&str> = self.resolution_stack.iter().map(|(r, _)| r.as_str()).collect();
            chain.push(reference);
            return Err(LoaderError::circular_reference(&chain));
        }

        self.resolution_stack.push((reference.to_string(), value_addr));
        Ok(())
    }

    pub fn pop_reference(&mut self) -> Option<String> {
        self.resolution_stack.pop().map(|(r, _)| r)
    }

    pub fn depth(&self) -> usize {
        self.resolution_stack.len()
    }
}

/// Resolves `$ref` strings to schema nodes for one root document
#[derive(Debug)]
pub struct RefResolver {
    base: Option<Url>,
    loader: Arc<dyn ResourceLoader>,
    parser: SchemaParser,
    documents: DocumentCache,
    refs: RefCache,
    cache_config: CacheConfig,
}

impl RefResolver {
    pub fn new() -> Self {
        Self::with_loader(Arc::new(DefaultLoader::new()), CacheConfig::default())
    }

    pub fn with_loader(loader: Arc<dyn ResourceLoader>, cache_config: CacheConfig) -> Self {
        Self {
            base: None,
            loader,
            parser: SchemaParser::new(),
            documents: DocumentCache::with_config(cache_config.clone()),
            refs: RefCache::new(cache_config.enabled),
            cache_config,
        }
    }

    /// Set the base identifier of the root document and drop cached state
    pub fn set_base(&mut self, base: Option<&str>) {
        self.base = base.and_then(|b| match canonicalize_locator(b, None) {
            Ok(url) => Some(url),
            Err(e) => {
                log::warn!("ignoring unusable base identifier '{}': {}", b, e);
                None
            }
        });
        self.clear_cache();
    }

    pub fn base(&self) -> Option<&Url> {
        self.base.as_ref()
    }

    pub fn loader(&self) -> &Arc<dyn ResourceLoader> {
        &self.loader
    }

    /// Resolve `reference` to a node, using `root` for same-document targets
    pub fn resolve(&self, reference: &str, root: &Arc<Value>) -> LoaderResult<Arc<Value>> {
        if let Some(hit) = self.refs.get(reference) {
            log::trace!("ref cache hit for '{}'", reference);
            return Ok(hit);
        }

        let (locator, fragment) = split_reference(reference);
        let document = if locator.is_empty() {
            Arc::clone(root)
        } else {
            let canonical = canonicalize_locator(locator, self.base.as_ref())
                .map_err(|e| LoaderError::invalid_reference(reference, e.to_string()))?;
            if self.is_root(&canonical) {
                Arc::clone(root)
            } else {
                self.load_document(&canonical)?
            }
        };

        let node = match fragment {
            None | Some("") => document,
            Some(pointer) => Arc::new(apply_json_pointer(&document, pointer, reference)?.clone()),
        };

        log::debug!("resolved reference '{}'", reference);
        Ok(self.refs.insert(reference, node))
    }

    /// Load, decode and rewrite an external document, caching the result
    pub fn load_document(&self, location: &Url) -> LoaderResult<Arc<Value>> {
        let key = location.as_str();
        if let Some(cached) = self.documents.get(key) {
            return Ok(cached);
        }

        let bytes = self.loader.load(key).map_err(|e| {
            log::warn!("failed to load external schema '{}': {}", key, e);
            e
        })?;
        let mut document = self.parser.parse_bytes(&bytes, key)?;
        rewrite_references(&mut document, location);
        log::debug!("loaded external schema '{}'", key);
        Ok(self.documents.insert(key, document))
    }

    pub fn clear_cache(&self) {
        self.documents.clear();
        self.refs.clear();
    }

    pub fn cache_stats(&self) -> CacheStats {
        CacheStats {
            documents: self.documents.len(),
            references: self.refs.len(),
            max_documents: self.cache_config.max_documents,
            enabled: self.cache_config.enabled,
        }
    }

    fn is_root(&self, canonical: &Url) -> bool {
        self.base.as_ref().is_some_and(|base| base == canonical)
    }
}

impl Default for RefResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Split a reference on its first `#` into locator and optional fragment
pub fn split_reference(reference: &str) -> (&str, Option<&str>) {
    match reference.split_once('#') {
        Some((locator, fragment)) => (locator, Some(fragment)),
        None => (reference, None),
    }
}

/// Turn a locator into an absolute URL without fragment.
///
/// Locators are joined against `base` when one is known. Without a base an
/// absolute URL stays as is and anything else is a filesystem path, made
/// absolute against the working directory.
pub fn canonicalize_locator(locator: &str, base: Option<&Url>) -> LoaderResult<Url> {
    let (locator, _) = split_reference(locator);
    let mut url = match base {
        Some(base) => base
            .join(locator)
            .map_err(|e| LoaderError::invalid_reference(locator, e.to_string()))?,
        None => match parse_absolute_url(locator) {
            Some(url) => url,
            None => path_to_url(Path::new(locator))?,
        },
    };
    url.set_fragment(None);
    Ok(url)
}

fn path_to_url(path: &Path) -> LoaderResult<Url> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        let cwd = std::env::current_dir()
            .map_err(|e| LoaderError::io_error(path.display().to_string(), e))?;
        cwd.join(path)
    };
    Url::from_file_path(normalize_path(&absolute)).map_err(|_| {
        LoaderError::invalid_reference(path.display().to_string(), "not a usable file path")
    })
}

/// Lexically remove `.` and `..` components
fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Rewrite every nested `$ref` string of a document loaded from `location`
/// into absolute form, so the document resolves the same once merged into
/// another resolution space
pub fn rewrite_references(value: &mut Value, location: &Url) {
    match value {
        Value::Object(obj) => {
            if let Some(Value::String(reference)) = obj.get_mut("$ref") {
                if let Some(rewritten) = absolutize_reference(reference, location) {
                    *reference = rewritten;
                }
            }
            for (key, child) in obj.iter_mut() {
                if key != "$ref" {
                    rewrite_references(child, location);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                rewrite_references(item, location);
            }
        }
        _ => {}
    }
}

fn absolutize_reference(reference: &str, location: &Url) -> Option<String> {
    let (locator, fragment) = split_reference(reference);
    let target = if locator.is_empty() {
        let mut own = location.clone();
        own.set_fragment(None);
        own
    } else {
        match canonicalize_locator(locator, Some(location)) {
            Ok(url) => url,
            Err(e) => {
                log::debug!("leaving reference '{}' unchanged: {}", reference, e);
                return None;
            }
        }
    };
    Some(match fragment {
        Some(fragment) => format!("{}#{}", target, fragment),
        None => target.to_string(),
    })
}

/// Walk a JSON Pointer fragment through nested mappings
pub fn apply_json_pointer<'a>(
    document: &'a Value,
    pointer: &str,
    reference: &str,
) -> LoaderResult<&'a Value> {
    if pointer.is_empty() {
        return Ok(document);
    }
    let Some(rest) = pointer.strip_prefix('/') else {
        return Err(LoaderError::pointer_error(
            reference,
            pointer,
            "pointer must start with '/'",
        ));
    };

    let mut current = document;
    for segment in rest.split('/') {
        let key = segment.replace("~1", "/").replace("~0", "~");
        current = match current {
            Value::Object(obj) => obj.get(&key).ok_or_else(|| {
                LoaderError::pointer_error(reference, pointer, format!("property '{}' not found", key))
            })?,
            _ => {
                return Err(LoaderError::pointer_error(
                    reference,
                    pointer,
                    format!("cannot access '{}' on a non-object node", key),
                ))
            }
        };
    }
    Ok(current)
}

/// Utility functions for inspecting references
pub struct ReferenceValidator;

impl ReferenceValidator {
    /// Validate JSON pointer syntax
    pub fn validate_json_pointer(pointer: &str) -> LoaderResult<()> {
        if pointer.is_empty() {
            return Ok(());
        }
        if !pointer.starts_with('/') {
            return Err(LoaderError::invalid_reference(
                pointer,
                "JSON pointer must start with '/' or be empty",
            ));
        }

        let mut chars = pointer.chars().peekable();
        while let Some(ch) = chars.next() {
            if ch == '~' && chars.next_if(|c| *c == '0' || *c == '1').is_none() {
                return Err(LoaderError::invalid_reference(
                    pointer,
                    "invalid escape sequence in JSON pointer",
                ));
            }
        }
        Ok(())
    }

    /// Extract every `$ref` string from a document, sorted
    pub fn extract_references(value: &Value) -> BTreeSet<String> {
        let mut references = BTreeSet::new();
        Self::extract_refs_recursive(value, &mut references);
        references
    }

    fn extract_refs_recursive(value: &Value, references: &mut BTreeSet<String>) {
        match value {
            Value::Object(obj) => {
                if let Some(Value::String(reference)) = obj.get("$ref") {
                    references.insert(reference.clone());
                }
                for val in obj.values() {
                    Self::extract_refs_recursive(val, references);
                }
            }
            Value::Array(arr) => {
                for item in arr {
                    Self::extract_refs_recursive(item, references);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_resolver_context_detects_revisits() {
        let mut context = ResolverContext::new(10);
        assert!(context.push_reference("#/definitions/a", 1).is_ok());
        assert!(context.push_reference("#/definitions/a", 2).is_ok());
        let err = context.push_reference("#/definitions/a", 1).unwrap_err();
        assert!(matches!(err, LoaderError::CircularReference { .. }));

        assert_eq!(context.pop_reference().as_deref(), Some("#/definitions/a"));
        assert_eq!(context.depth(), 1);
    }

    #[test]
    fn test_resolver_context_depth_limit() {
        let mut context = ResolverContext::new(2);
        assert!(context.push_reference("#/a", 1).is_ok());
        assert!(context.push_reference("#/b", 1).is_ok());
        assert!(context.push_reference("#/c", 1).is_err());

        assert!(context.push_reference("#/c", 2).is_ok());
        assert!(context.push_reference("#/d", 2).is_ok());
        assert!(context.push_reference("#/e", 2).is_err());
    }

    #[test]
    fn test_resolver_context_counts_per_value() {
        let mut context = ResolverContext::new(2);
        for addr in 0..50 {
            assert!(context.push_reference("#", addr).is_ok(), "{}", addr);
        }
        assert_eq!(context.depth(), 50);
    }

    #[test]
    fn test_json_pointer_traversal() {
        let doc = json!({
            "definitions": {
                "a/b": {"type": "string"},
                "m~n": {"type": "null"},
                "list": [{"type": "integer"}]
            }
        });
        assert_eq!(
            apply_json_pointer(&doc, "/definitions/a~1b", "#").unwrap(),
            &json!({"type": "string"})
        );
        assert_eq!(
            apply_json_pointer(&doc, "/definitions/m~0n", "#").unwrap(),
            &json!({"type": "null"})
        );
        assert_eq!(apply_json_pointer(&doc, "", "#").unwrap(), &doc);
        assert!(apply_json_pointer(&doc, "/definitions/missing", "#").is_err());
        assert!(apply_json_pointer(&doc, "definitions", "#").is_err());
        // arrays are not traversed
        assert!(apply_json_pointer(&doc, "/definitions/list/0", "#").is_err());
    }

    #[test]
    fn test_local_resolution_is_cached() {
        let root = Arc::new(json!({"definitions": {"x": {"type": "integer"}}}));
        let resolver = RefResolver::new();

        let first = resolver.resolve("#/definitions/x", &root).unwrap();
        let second = resolver.resolve("#/definitions/x", &root).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(*first, json!({"type": "integer"}));
        assert_eq!(resolver.cache_stats().references, 1);
    }

    #[test]
    fn test_failures_are_not_cached() {
        let root = Arc::new(json!({}));
        let resolver = RefResolver::new();
        assert!(resolver.resolve("#/definitions/x", &root).is_err());
        assert_eq!(resolver.cache_stats().references, 0);
    }

    #[test]
    fn test_canonicalize_against_url_base() {
        let base = Url::parse("http://example.com/schemas/root.json").unwrap();
        let url = canonicalize_locator("defs/a.json", Some(&base)).unwrap();
        assert_eq!(url.as_str(), "http://example.com/schemas/defs/a.json");

        let absolute = canonicalize_locator("https://other.org/s.json#/x", Some(&base)).unwrap();
        assert_eq!(absolute.as_str(), "https://other.org/s.json");
    }

    #[test]
    fn test_rewrite_references() {
        let location = Url::parse("file:///schemas/defs/common.json").unwrap();
        let mut doc = json!({
            "properties": {
                "a": {"$ref": "#/definitions/a"},
                "b": {"$ref": "../other.json#/definitions/b"},
                "c": {"$ref": "http://example.com/c.json"}
            }
        });
        rewrite_references(&mut doc, &location);
        assert_eq!(
            doc["properties"]["a"]["$ref"],
            "file:///schemas/defs/common.json#/definitions/a"
        );
        assert_eq!(
            doc["properties"]["b"]["$ref"],
            "file:///schemas/other.json#/definitions/b"
        );
        assert_eq!(doc["properties"]["c"]["$ref"], "http://example.com/c.json");
    }

    #[test]
    fn test_external_document_resolution() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("defs.json"),
            r#"{"definitions": {"name": {"type": "string", "minLength": 1}}}"#,
        )
        .unwrap();
        let root_path = dir.path().join("root.json");

        let mut resolver = RefResolver::new();
        resolver.set_base(root_path.to_str());
        let root = Arc::new(json!({}));

        let node = resolver.resolve("defs.json#/definitions/name", &root).unwrap();
        assert_eq!(*node, json!({"type": "string", "minLength": 1}));
        assert_eq!(resolver.cache_stats().documents, 1);

        let missing = resolver.resolve("nope.json", &root).unwrap_err();
        assert!(matches!(missing, LoaderError::Io { .. }));
    }

    #[test]
    fn test_locator_naming_the_root_is_the_root() {
        let dir = tempdir().unwrap();
        let root_path = dir.path().join("root.json");
        let mut resolver = RefResolver::new();
        resolver.set_base(root_path.to_str());

        let root = Arc::new(json!({"definitions": {"a": {"type": "null"}}}));
        let node = resolver.resolve("root.json#/definitions/a", &root).unwrap();
        assert_eq!(*node, json!({"type": "null"}));
        assert_eq!(resolver.cache_stats().documents, 0);
    }

    #[test]
    fn test_extract_references() {
        let schema = json!({
            "properties": {
                "a": {"$ref": "#/definitions/a"},
                "b": {"items": [{"$ref": "other.json"}]}
            },
            "definitions": {"a": {"$ref": "#/definitions/a"}}
        });
        let refs: Vec<_> = ReferenceValidator::extract_references(&schema).into_iter().collect();
        assert_eq!(refs, vec!["#/definitions/a".to_string(), "other.json".to_string()]);
    }

    #[test]
    fn test_pointer_syntax() {
        assert!(ReferenceValidator::validate_json_pointer("").is_ok());
        assert!(ReferenceValidator::validate_json_pointer("/a~0b/c~1d").is_ok());
        assert!(ReferenceValidator::validate_json_pointer("a").is_err());
        assert!(ReferenceValidator::validate_json_pointer("/a~2").is_err());
    }
}
