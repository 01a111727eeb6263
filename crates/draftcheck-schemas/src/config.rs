//! Engine configuration
//!
//! Copyright (c) 2025 Draftcheck Team
//! Licensed under the Apache-2.0 license

use crate::draft::DraftVersion;
use crate::loader::cache::CacheConfig;
use serde::{Deserialize, Serialize};

/// Limit for `$ref` chains applied to a single value
pub const DEFAULT_MAX_REFERENCE_DEPTH: usize = 100;

/// Settings that shape how a [`SchemaEngine`](crate::SchemaEngine) validates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Draft used when the root document declares no `$schema`
    pub default_draft: DraftVersion,
    /// Maximum number of `$ref` hops on one value before reporting a cycle
    pub max_reference_depth: usize,
    /// When false, `format` is an annotation and never fails validation
    pub assert_formats: bool,
    /// Relative slack for float `multipleOf` remainders; `None` means exact
    pub multiple_of_tolerance: Option<f64>,
    pub cache: CacheConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_draft: DraftVersion::LATEST,
            max_reference_depth: DEFAULT_MAX_REFERENCE_DEPTH,
            assert_formats: true,
            multiple_of_tolerance: None,
            cache: CacheConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn with_default_draft(mut self, draft: DraftVersion) -> Self {
        self.default_draft = draft;
        self
    }

    pub fn with_max_reference_depth(mut self, depth: usize) -> Self {
        self.max_reference_depth = depth;
        self
    }

    /// Treat `format` as an annotation only
    pub fn without_format_assertion(mut self) -> Self {
        self.assert_formats = false;
        self
    }

    /// Accept float `multipleOf` remainders within `relative * divisor`
    pub fn with_multiple_of_tolerance(mut self, relative: f64) -> Self {
        self.multiple_of_tolerance = Some(relative);
        self
    }

    pub fn with_cache(mut self, cache: CacheConfig) -> Self {
        self.cache = cache;
        self
    }

    pub fn without_cache(mut self) -> Self {
        self.cache.enabled = false;
        self
    }
}
