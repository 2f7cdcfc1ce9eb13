//! Content-addressed cache for loaded datasets
//!
//! Key = SHA-256 over the encoding name and the raw input bytes. Inputs are
//! immutable once read, so entries are never invalidated and each key maps
//! to at most one dataset.

use crate::error::Result;
use crate::loader::{load_dataset, TextEncoding};
use crate::record::Dataset;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

/// SHA-256 digest identifying one (encoding, bytes) input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey([u8; 32]);

impl CacheKey {
    pub fn new(bytes: &[u8], encoding: TextEncoding) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(encoding.name().as_bytes());
        hasher.update([0u8]);
        hasher.update(bytes);
        CacheKey(hasher.finalize().into())
    }

    /// Lowercase hex digest
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Memoizes `load_dataset` by input content
#[derive(Debug, Default)]
pub struct DatasetCache {
    entries: HashMap<CacheKey, Dataset>,
    hits: u64,
    misses: u64,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the dataset for these bytes, loading it on first sight
    ///
    /// A failed load leaves the cache untouched.
    pub fn get_or_load(&mut self, bytes: &[u8], encoding: TextEncoding) -> Result<&Dataset> {
        let key = CacheKey::new(bytes, encoding);
        if self.entries.contains_key(&key) {
            self.hits += 1;
            debug!("Dataset cache hit for {}", key);
        } else {
            self.misses += 1;
            debug!("Dataset cache miss for {}", key);
            let dataset = load_dataset(bytes, encoding)?;
            self.entries.insert(key, dataset);
        }
        Ok(&self.entries[&key])
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}
