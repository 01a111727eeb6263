//! Per-engine caches for external documents and resolved references
//!
//! Both caches sit behind `parking_lot::RwLock` so one engine can serve
//! concurrent `validate` calls. Each key is written at most once; a racing
//! second writer receives the value stored first.
//!
//! Copyright (c) 2025 Draftcheck Team
//! Licensed under the Apache-2.0 license

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

/// Configuration for cache behavior
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Whether loaded documents and resolved refs are memoized
    pub enabled: bool,
    /// Maximum number of external documents kept; the oldest is evicted first
    pub max_documents: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_documents: 256,
        }
    }
}

#[derive(Debug, Default)]
struct DocumentStore {
    entries: HashMap<String, Arc<Value>>,
    insertion_order: VecDeque<String>,
}

/// Canonical location to parsed, ref-rewritten document
#[derive(Debug)]
pub struct DocumentCache {
    config: CacheConfig,
    store: RwLock<DocumentStore>,
}

impl DocumentCache {
    pub fn new() -> Self {
        Self::with_config(CacheConfig::default())
    }

    pub fn with_config(config: CacheConfig) -> Self {
        Self {
            config,
            store: RwLock::new(DocumentStore::default()),
        }
    }

    pub fn get(&self, location: &str) -> Option<Arc<Value>> {
        if !self.config.enabled {
            return None;
        }
        self.store.read().entries.get(location).cloned()
    }

    /// Store a document, returning whichever copy ends up cached
    pub fn insert(&self, location: &str, document: Value) -> Arc<Value> {
        let document = Arc::new(document);
        if !self.config.enabled || self.config.max_documents == 0 {
            return document;
        }

        let mut store = self.store.write();
        if let Some(existing) = store.entries.get(location) {
            return Arc::clone(existing);
        }

        while store.entries.len() >= self.config.max_documents {
            match store.insertion_order.pop_front() {
                Some(oldest) => {
                    log::debug!("evicting cached document '{}'", oldest);
                    store.entries.remove(&oldest);
                }
                None => break,
            }
        }

        store.entries.insert(location.to_string(), Arc::clone(&document));
        store.insertion_order.push_back(location.to_string());
        document
    }

    pub fn contains(&self, location: &str) -> bool {
        self.store.read().entries.contains_key(location)
    }

    pub fn len(&self) -> usize {
        self.store.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        let mut store = self.store.write();
        store.entries.clear();
        store.insertion_order.clear();
    }
}

impl Default for DocumentCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Exact `$ref` string to the node it resolved to
#[derive(Debug)]
pub struct RefCache {
    enabled: bool,
    entries: RwLock<HashMap<String, Arc<Value>>>,
}

impl RefCache {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn get(&self, reference: &str) -> Option<Arc<Value>> {
        if !self.enabled {
            return None;
        }
        self.entries.read().get(reference).cloned()
    }

    /// Memoize a resolution, keeping the first value stored under the key
    pub fn insert(&self, reference: &str, node: Arc<Value>) -> Arc<Value> {
        if !self.enabled {
            return node;
        }
        let mut entries = self.entries.write();
        Arc::clone(entries.entry(reference.to_string()).or_insert(node))
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }
}

impl Default for RefCache {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Cache statistics for monitoring and debugging
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub documents: usize,
    pub references: usize,
    pub max_documents: usize,
    pub enabled: bool,
}
