//! Cache storage backends.
//!
//! Chromium mapping: net/disk_cache/disk_cache.h (Backend), reduced to
//! single-key get/set/delete.
//!
//! Stores hand out owned copies: a response returned by `get` can be modified
//! freely without affecting what is stored, and the only way to change an
//! entry is another `set`.

use crate::base::neterror::NetError;
use crate::cache::key::CacheKey;
use crate::http::response::HttpResponse;
use dashmap::DashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Pluggable key/value backend for cached responses.
///
/// Implementations must make each operation atomic for a single key. No
/// ordering across keys is required. Errors other than
/// [`NetError::CacheChecksumMismatch`] reach the caller of the request.
pub trait CacheStore: Send + Sync {
    /// Stored response for `key`, if any.
    fn get(&self, key: &CacheKey) -> Result<Option<HttpResponse>, NetError>;

    /// Store `response` under `key`, replacing any previous entry.
    fn set(&self, key: &CacheKey, response: HttpResponse) -> Result<(), NetError>;

    /// Remove the entry for `key`, returning it.
    fn delete(&self, key: &CacheKey) -> Result<Option<HttpResponse>, NetError>;
}

/// In-memory store.
///
/// Thread-safe via DashMap. Without limits it never evicts; with limits it
/// drops arbitrary entries once the entry count or total body size would be
/// exceeded.
pub struct MemoryStore {
    entries: DashMap<CacheKey, HttpResponse>,
    max_entries: Option<usize>,
    max_size_bytes: Option<usize>,
    current_size: AtomicUsize,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Unbounded store.
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            max_entries: None,
            max_size_bytes: None,
            current_size: AtomicUsize::new(0),
        }
    }

    /// Store bounded by entry count and total body bytes.
    pub fn with_limits(max_entries: usize, max_size_bytes: usize) -> Self {
        Self {
            max_entries: Some(max_entries),
            max_size_bytes: Some(max_size_bytes),
            ..Self::new()
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total body bytes currently held.
    pub fn size_bytes(&self) -> usize {
        self.current_size.load(Ordering::Relaxed)
    }

    pub fn clear(&self) {
        self.entries.clear();
        self.current_size.store(0, Ordering::Relaxed);
    }

    fn maybe_evict(&self, key: &CacheKey, new_entry_size: usize) {
        if let Some(max_entries) = self.max_entries {
            while !self.entries.is_empty() && self.entries.len() >= max_entries {
                if !self.evict_one(key) {
                    break;
                }
            }
        }

        if let Some(max_size_bytes) = self.max_size_bytes {
            while !self.entries.is_empty()
                && self.size_bytes() + new_entry_size > max_size_bytes
            {
                if !self.evict_one(key) {
                    break;
                }
            }
        }
    }

    /// Evict one entry other than `keep`. Returns false if none was found.
    fn evict_one(&self, keep: &CacheKey) -> bool {
        let victim = self
            .entries
            .iter()
            .map(|entry| entry.key().clone())
            .find(|key| key != keep);

        match victim {
            Some(key) => {
                tracing::debug!(key = %key, "evicting cache entry");
                self.remove_entry(&key);
                true
            }
            None => false,
        }
    }

    fn remove_entry(&self, key: &CacheKey) -> Option<HttpResponse> {
        let (_, entry) = self.entries.remove(key)?;
        self.current_size
            .fetch_sub(entry.body().len(), Ordering::Relaxed);
        Some(entry)
    }
}

impl CacheStore for MemoryStore {
    fn get(&self, key: &CacheKey) -> Result<Option<HttpResponse>, NetError> {
        Ok(self.entries.get(key).map(|entry| entry.value().clone()))
    }

    fn set(&self, key: &CacheKey, response: HttpResponse) -> Result<(), NetError> {
        self.remove_entry(key);

        let size = response.body().len();
        self.maybe_evict(key, size);

        self.current_size.fetch_add(size, Ordering::Relaxed);
        // A concurrent writer may have stored this key since the removal above
        if let Some(old) = self.entries.insert(key.clone(), response) {
            self.current_size
                .fetch_sub(old.body().len(), Ordering::Relaxed);
        }
        Ok(())
    }

    fn delete(&self, key: &CacheKey) -> Result<Option<HttpResponse>, NetError> {
        Ok(self.remove_entry(key))
    }
}

/// In-memory store holding serialized responses.
///
/// Entries are kept as [`HttpResponse::to_bytes`] blobs indexed by
/// [`CacheKey::storage_key`], the way an out-of-process backend would hold
/// them. A blob that does not decode is reported as
/// [`NetError::CacheChecksumMismatch`].
#[derive(Default)]
pub struct EncodedMemoryStore {
    entries: DashMap<String, Vec<u8>>,
}

impl EncodedMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store raw bytes under `key`, bypassing encoding.
    pub fn insert_raw(&self, key: &CacheKey, bytes: Vec<u8>) {
        self.entries.insert(key.storage_key(), bytes);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl CacheStore for EncodedMemoryStore {
    fn get(&self, key: &CacheKey) -> Result<Option<HttpResponse>, NetError> {
        match self.entries.get(&key.storage_key()) {
            Some(bytes) => HttpResponse::from_bytes(bytes.value()).map(Some),
            None => Ok(None),
        }
    }

    fn set(&self, key: &CacheKey, response: HttpResponse) -> Result<(), NetError> {
        let bytes = response.to_bytes()?;
        self.entries.insert(key.storage_key(), bytes);
        Ok(())
    }

    fn delete(&self, key: &CacheKey) -> Result<Option<HttpResponse>, NetError> {
        match self.entries.remove(&key.storage_key()) {
            Some((_, bytes)) => HttpResponse::from_bytes(&bytes).map(Some),
            None => Ok(None),
        }
    }
}
