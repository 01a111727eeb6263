//! Schema engine: owns one root schema and validates values against it
//!
//! The engine detects the draft once per schema, then builds a fresh
//! [`Session`] for every `validate` call. Validators and the engine recurse
//! into each other through [`Session::validate_subschema`].
//!
//! Copyright (c) 2025 Draftcheck Team
//! Licensed under the Apache-2.0 license

use crate::codec::{self, compact_preview};
use crate::config::EngineConfig;
use crate::draft::{base_identifier, implied_type, DraftDetection, DraftVersion, SchemaNode};
use crate::loader::cache::CacheStats;
use crate::loader::error::LoaderResult;
use crate::loader::parser::SchemaParser;
use crate::loader::resolver::{canonicalize_locator, RefResolver};
use crate::loader::source::{DefaultLoader, ResourceLoader};
use crate::validation::context::{Session, ValidationContext, ROOT_LABEL};
use crate::validation::error::{ErrorKind, ValidationError, ValidationErrors};
use crate::validation::pattern::PatternCache;
use crate::validation::{TypeValidator, Validatable};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use url::Url;

/// Preview budget for an unknown `$schema` value
const SCHEMA_URI_PREVIEW: usize = 64;

/// Verdict and messages from one `validate` call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: ValidationErrors,
}

impl ValidationReport {
    /// Messages rendered as `"<problem> at context path: <label>"`
    pub fn messages(&self) -> Vec<String> {
        self.errors.messages()
    }
}

/// Validates JSON values against one JSON Schema document
#[derive(Debug)]
pub struct SchemaEngine {
    config: EngineConfig,
    schema: Option<Arc<Value>>,
    draft: Option<DraftVersion>,
    diagnostics: ValidationErrors,
    resolver: RefResolver,
    patterns: PatternCache,
}

impl Default for SchemaEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaEngine {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self::with_loader(config, Arc::new(DefaultLoader::new()))
    }

    /// Fetch external `$ref` documents through `loader`
    pub fn with_loader(config: EngineConfig, loader: Arc<dyn ResourceLoader>) -> Self {
        let resolver = RefResolver::with_loader(loader, config.cache.clone());
        Self {
            config,
            schema: None,
            draft: None,
            diagnostics: ValidationErrors::new(),
            resolver,
            patterns: PatternCache::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Decode and install a schema from JSON text.
    ///
    /// Text that fails to decode leaves no schema installed; every later
    /// report then fails with the decode diagnostic.
    pub fn set_schema(&mut self, text: &str) -> &mut Self {
        self.reset();
        match codec::parse(text) {
            Ok(schema) => self.install(schema, None),
            Err(e) => {
                log::warn!("schema text could not be decoded: {}", e);
                self.diagnostics.add(ValidationError::document(
                    ErrorKind::Decode,
                    format!("schema is not valid JSON: {}", e),
                ));
            }
        }
        self
    }

    pub fn set_schema_value(&mut self, schema: Value) -> &mut Self {
        self.reset();
        self.install(schema, None);
        self
    }

    /// Load a schema document through the resource loader.
    ///
    /// The location becomes the base identifier unless the document
    /// declares its own, which is then resolved against the location.
    pub fn load_schema(&mut self, location: &str) -> LoaderResult<()> {
        self.reset();
        let url = canonicalize_locator(location, None)?;
        let bytes = self.resolver.loader().load(url.as_str())?;
        let schema = SchemaParser::new().parse_bytes(&bytes, location)?;
        self.install(schema, Some(url));
        Ok(())
    }

    /// Draft of the installed schema; `None` when `$schema` is unknown or
    /// no schema is installed
    pub fn version(&self) -> Option<DraftVersion> {
        self.draft
    }

    pub fn base_uri(&self) -> Option<&Url> {
        self.resolver.base()
    }

    pub fn schema(&self) -> Option<&Value> {
        self.schema.as_deref()
    }

    /// Schema-level messages recorded when the schema was installed
    pub fn diagnostics(&self) -> &ValidationErrors {
        &self.diagnostics
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.resolver.cache_stats()
    }

    pub fn validate(&self, value: &Value) -> ValidationReport {
        let mut errors = self.diagnostics.clone();
        let Some(root) = &self.schema else {
            if errors.is_empty() {
                errors.add(ValidationError::document(
                    ErrorKind::SchemaStructure,
                    "no schema has been set",
                ));
            }
            return ValidationReport { valid: false, errors };
        };

        let mut session = Session::new(&self.config, &self.resolver, &self.patterns, root, self.draft);
        let valid = session.validate_subschema(root, value, Some(ROOT_LABEL));
        let mut produced = session.into_errors();
        log::trace!("validation finished: valid={}, {} new message(s)", valid, produced.len());

        errors.append(&mut produced);
        ValidationReport { valid, errors }
    }

    /// Decode `text` and validate the result
    pub fn validate_str(&self, text: &str) -> ValidationReport {
        match codec::parse(text) {
            Ok(value) => self.validate(&value),
            Err(e) => {
                let mut errors = self.diagnostics.clone();
                errors.add(ValidationError::document(
                    ErrorKind::Decode,
                    format!("value is not valid JSON: {}", e),
                ));
                ValidationReport { valid: false, errors }
            }
        }
    }

    fn reset(&mut self) {
        self.schema = None;
        self.draft = None;
        self.diagnostics = ValidationErrors::new();
        self.resolver.set_base(None);
        self.patterns.clear();
    }

    fn install(&mut self, schema: Value, location: Option<Url>) {
        let detection = DraftDetection::detect(&schema, self.config.default_draft);
        match &detection {
            DraftDetection::Declared(version) => log::debug!("schema declares {}", version),
            DraftDetection::Defaulted(version) => {
                log::debug!("schema declares no draft, assuming {}", version)
            }
            DraftDetection::Unknown(uri) => {
                log::warn!("unknown $schema '{}', version-specific keywords disabled", uri);
                let preview = compact_preview(&Value::String(uri.clone()), SCHEMA_URI_PREVIEW);
                self.diagnostics.add(ValidationError::document(
                    ErrorKind::SchemaStructure,
                    format!("$schema is unknown: {}", preview),
                ));
            }
        }
        self.draft = detection.version();

        let declared = base_identifier(&schema, self.draft);
        let base = match (declared, &location) {
            (Some(id), Some(location)) => canonicalize_locator(id, Some(location))
                .map(|url| url.to_string())
                .unwrap_or_else(|_| id.to_string()),
            (Some(id), None) => id.to_string(),
            (None, Some(location)) => location.to_string(),
            (None, None) => String::new(),
        };
        self.resolver
            .set_base(Some(base.as_str()).filter(|b| !b.is_empty()));
        self.schema = Some(Arc::new(schema));
    }
}

/// Shape of a schema's `type` keyword
enum DeclaredType<'a> {
    Name(&'a str),
    Names(&'a [Value]),
    /// Any other shape, validated generically
    Other,
}

impl<'e> Session<'e> {
    /// Validate `value` against `schema`, recording messages under `label`
    pub fn validate_subschema(&mut self, schema: &Value, value: &Value, label: Option<&str>) -> bool {
        self.evaluate(schema, value, label, None)
    }

    /// Like [`validate_subschema`](Self::validate_subschema), with
    /// `default_type` used in place of keyword inference when the schema
    /// declares no `type`
    pub fn validate_subschema_as(
        &mut self,
        schema: &Value,
        value: &Value,
        label: Option<&str>,
        default_type: &str,
    ) -> bool {
        self.evaluate(schema, value, label, Some(default_type))
    }

    fn evaluate(
        &mut self,
        schema: &Value,
        value: &Value,
        label: Option<&str>,
        default_type: Option<&str>,
    ) -> bool {
        let keywords = match SchemaNode::classify(schema) {
            Some(SchemaNode::Boolean(accept)) if self.supports(DraftVersion::Draft6) => return accept,
            Some(SchemaNode::Keywords(keywords)) => keywords,
            _ => {
                self.record(ErrorKind::SchemaStructure, label, || "schema is not an object".to_string());
                return false;
            }
        };

        if let Some(Value::String(reference)) = keywords.get("$ref") {
            return self.follow_reference(reference, value, label, default_type);
        }

        let declared = match keywords.get("type") {
            Some(Value::String(name)) if !name.is_empty() => Some(DeclaredType::Name(name)),
            Some(Value::Array(names)) if !names.is_empty() => Some(DeclaredType::Names(names)),
            None | Some(Value::String(_)) | Some(Value::Array(_)) => None,
            Some(_) => Some(DeclaredType::Other),
        };
        let declared = declared.or_else(|| {
            default_type
                .or_else(|| implied_type(keywords))
                .map(DeclaredType::Name)
        });

        let ctx = ValidationContext::new(keywords, label);
        match declared {
            Some(DeclaredType::Name(name)) => {
                let validator = TypeValidator::from_type_name(name);
                log::trace!("dispatching {} validator", validator.name());
                validator.is_valid(self, &ctx, value)
            }
            Some(DeclaredType::Names(names)) => self.evaluate_any_type(names, &ctx, value),
            Some(DeclaredType::Other) | None => TypeValidator::Generic.is_valid(self, &ctx, value),
        }
    }

    /// Each named type is tried in isolation; errors surface only when
    /// none of them matched
    fn evaluate_any_type(&mut self, names: &[Value], ctx: &ValidationContext<'_>, value: &Value) -> bool {
        for _ in names.iter().filter(|name| !name.is_string()) {
            self.record(ErrorKind::SchemaStructure, ctx.label, || {
                "if type is array, all elements must be strings".to_string()
            });
        }

        let mut failed = ValidationErrors::new();
        for name in names.iter().filter_map(Value::as_str) {
            let validator = TypeValidator::from_type_name(name);
            let (matched, mut errors) = self.isolate(|session| validator.is_valid(session, ctx, value));
            if matched {
                return true;
            }
            failed.append(&mut errors);
        }

        self.merge(failed);
        false
    }

    /// `$ref` replaces every sibling keyword
    fn follow_reference(
        &mut self,
        reference: &str,
        value: &Value,
        label: Option<&str>,
        default_type: Option<&str>,
    ) -> bool {
        let address = value as *const Value as usize;
        if let Err(e) = self.references_mut().push_reference(reference, address) {
            log::debug!("abandoning reference '{}': {}", reference, e);
            self.record(ErrorKind::ReferenceCycle, label, || e.to_string());
            return false;
        }

        let valid = match self.resolver().resolve(reference, self.root()) {
            Ok(target) => self.evaluate(&target, value, label, default_type),
            Err(e) => {
                self.record(ErrorKind::ReferenceResolution, label, || {
                    format!("unable to resolve $ref \"{}\": {}", reference, e)
                });
                false
            }
        };

        self.references_mut().pop_reference();
        valid
    }
}
