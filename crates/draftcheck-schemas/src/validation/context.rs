//! Per-call validation session and per-node context
//!
//! Copyright (c) 2025 Draftcheck Team
//! Licensed under the Apache-2.0 license

use crate::config::EngineConfig;
use crate::draft::DraftVersion;
use crate::loader::resolver::{RefResolver, ResolverContext};
use crate::validation::error::{ErrorKind, ValidationError, ValidationErrors};
use crate::validation::pattern::PatternCache;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Label of the root value
pub const ROOT_LABEL: &str = "#/";

/// State carried through one `validate` call.
///
/// Holds the draft, the shared engine caches and the error accumulator.
/// Validators recurse through [`Session::validate_subschema`].
#[derive(Debug)]
pub struct Session<'e> {
    config: &'e EngineConfig,
    resolver: &'e RefResolver,
    patterns: &'e PatternCache,
    root: &'e Arc<Value>,
    draft: Option<DraftVersion>,
    references: ResolverContext,
    errors: ValidationErrors,
}

impl<'e> Session<'e> {
    pub fn new(
        config: &'e EngineConfig,
        resolver: &'e RefResolver,
        patterns: &'e PatternCache,
        root: &'e Arc<Value>,
        draft: Option<DraftVersion>,
    ) -> Self {
        Self {
            config,
            resolver,
            patterns,
            root,
            draft,
            references: ResolverContext::new(config.max_reference_depth),
            errors: ValidationErrors::new(),
        }
    }

    pub fn config(&self) -> &'e EngineConfig {
        self.config
    }

    pub fn resolver(&self) -> &'e RefResolver {
        self.resolver
    }

    pub fn patterns(&self) -> &'e PatternCache {
        self.patterns
    }

    pub fn root(&self) -> &'e Arc<Value> {
        self.root
    }

    /// `None` when `$schema` named no known draft
    pub fn draft(&self) -> Option<DraftVersion> {
        self.draft
    }

    /// Whether a keyword introduced in `version` is in effect.
    ///
    /// Always false while the draft is undetermined.
    pub fn supports(&self, version: DraftVersion) -> bool {
        self.draft.is_some_and(|draft| draft >= version)
    }

    pub fn references_mut(&mut self) -> &mut ResolverContext {
        &mut self.references
    }

    /// Record a message at `label`; unlabeled nodes record nothing
    pub fn record<F>(&mut self, kind: ErrorKind, label: Option<&str>, message: F)
    where
        F: FnOnce() -> String,
    {
        if let Some(label) = label {
            self.errors
                .add(ValidationError::new(kind, Some(label), message()));
        }
    }

    /// Run `check` against a fresh accumulator, returning its verdict and
    /// the errors it produced without merging them
    pub fn isolate<F>(&mut self, check: F) -> (bool, ValidationErrors)
    where
        F: FnOnce(&mut Self) -> bool,
    {
        let outer = std::mem::take(&mut self.errors);
        let valid = check(self);
        let produced = std::mem::replace(&mut self.errors, outer);
        (valid, produced)
    }

    pub fn merge(&mut self, mut errors: ValidationErrors) {
        self.errors.append(&mut errors);
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn into_errors(self) -> ValidationErrors {
        self.errors
    }
}

/// The keyword map and path label a validator is applied under
#[derive(Debug, Clone, Copy)]
pub struct ValidationContext<'s> {
    pub keywords: &'s Map<String, Value>,
    pub label: Option<&'s str>,
}

impl<'s> ValidationContext<'s> {
    pub fn new(keywords: &'s Map<String, Value>, label: Option<&'s str>) -> Self {
        Self { keywords, label }
    }

    pub fn get(&self, keyword: &str) -> Option<&'s Value> {
        self.keywords.get(keyword)
    }

    /// A non-negative integer limit such as `minLength`; `2.0` counts as `2`
    pub fn count_limit(&self, keyword: &str) -> Option<u64> {
        let number = self.get(keyword)?;
        number.as_u64().or_else(|| {
            number
                .as_f64()
                .filter(|f| *f >= 0.0 && f.fract() == 0.0 && *f <= u64::MAX as f64)
                .map(|f| f as u64)
        })
    }

    pub fn has(&self, keyword: &str) -> bool {
        self.keywords.contains_key(keyword)
    }

    /// Label of an object member
    pub fn child(&self, name: &str) -> Option<String> {
        self.label.map(|label| {
            if label == ROOT_LABEL {
                format!("{}{}", ROOT_LABEL, name)
            } else {
                format!("{}/{}", label, name)
            }
        })
    }

    /// Label of an array element
    pub fn child_index(&self, index: usize) -> Option<String> {
        self.label.map(|label| format!("{}[{}]", label, index))
    }

    /// Label of an object member's name, as checked by `propertyNames`
    pub fn child_key(&self, name: &str) -> Option<String> {
        self.label.map(|label| format!("{}[{}]", label, name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_child_labels() {
        let schema = json!({});
        let keywords = schema.as_object().unwrap();

        let root = ValidationContext::new(keywords, Some(ROOT_LABEL));
        assert_eq!(root.child("address").as_deref(), Some("#/address"));
        assert_eq!(root.child_index(0).as_deref(), Some("#/[0]"));
        assert_eq!(root.child_key("name").as_deref(), Some("#/[name]"));

        let nested = ValidationContext::new(keywords, Some("#/address"));
        assert_eq!(nested.child("city").as_deref(), Some("#/address/city"));
        assert_eq!(nested.child_index(2).as_deref(), Some("#/address[2]"));
        assert_eq!(nested.child_key("x").as_deref(), Some("#/address[x]"));

        let silent = ValidationContext::new(keywords, None);
        assert_eq!(silent.child("a"), None);
        assert_eq!(silent.child_index(1), None);
    }

    #[test]
    fn test_count_limits() {
        let schema = json!({"a": 2, "b": 2.0, "c": 2.5, "d": -1, "e": "2"});
        let ctx = ValidationContext::new(schema.as_object().unwrap(), None);
        assert_eq!(ctx.count_limit("a"), Some(2));
        assert_eq!(ctx.count_limit("b"), Some(2));
        assert_eq!(ctx.count_limit("c"), None);
        assert_eq!(ctx.count_limit("d"), None);
        assert_eq!(ctx.count_limit("e"), None);
        assert_eq!(ctx.count_limit("missing"), None);
    }

    #[test]
    fn test_session_isolation_and_recording() {
        let config = EngineConfig::default();
        let resolver = RefResolver::new();
        let patterns = PatternCache::new();
        let root = Arc::new(json!({}));
        let mut session = Session::new(&config, &resolver, &patterns, &root, Some(DraftVersion::Draft6));

        assert!(session.supports(DraftVersion::Draft6));
        assert!(!session.supports(DraftVersion::Draft7));

        session.record(ErrorKind::KeywordViolation, None, || "hidden".to_string());
        assert!(session.errors().is_empty());

        let (valid, produced) = session.isolate(|s| {
            s.record(ErrorKind::TypeMismatch, Some("#/"), || "inner".to_string());
            false
        });
        assert!(!valid);
        assert_eq!(produced.len(), 1);
        assert!(session.errors().is_empty());

        session.merge(produced);
        assert_eq!(session.into_errors().messages(), vec!["inner at context path: #/"]);
    }

    #[test]
    fn test_undetermined_draft_supports_nothing() {
        let config = EngineConfig::default();
        let resolver = RefResolver::new();
        let patterns = PatternCache::new();
        let root = Arc::new(json!({}));
        let session = Session::new(&config, &resolver, &patterns, &root, None);
        assert!(!session.supports(DraftVersion::Draft4));
    }
}
