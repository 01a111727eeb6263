//! Compiled regular expression cache shared by `pattern` and
//! `patternProperties`
//!
//! Copyright (c) 2025 Draftcheck Team
//! Licensed under the Apache-2.0 license

use parking_lot::RwLock;
use regex::Regex;
use std::collections::HashMap;

/// Pattern source to compiled regex, written at most once per pattern
#[derive(Debug, Default)]
pub struct PatternCache {
    compiled: RwLock<HashMap<String, Regex>>,
}

impl PatternCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile `pattern` in Unicode mode, reusing an earlier compilation.
    ///
    /// Patterns are unanchored; anchors must be written in the pattern.
    pub fn get_or_compile(&self, pattern: &str) -> Result<Regex, regex::Error> {
        if let Some(regex) = self.compiled.read().get(pattern) {
            return Ok(regex.clone());
        }

        let regex = Regex::new(pattern)?;
        log::trace!("compiled pattern /{}/", pattern);
        let mut compiled = self.compiled.write();
        Ok(compiled
            .entry(pattern.to_string())
            .or_insert(regex)
            .clone())
    }

    pub fn is_match(&self, pattern: &str, text: &str) -> Result<bool, regex::Error> {
        Ok(self.get_or_compile(pattern)?.is_match(text))
    }

    pub fn len(&self) -> usize {
        self.compiled.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.compiled.write().clear();
    }
}
