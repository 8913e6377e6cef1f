//! Cache configuration.
//!
//! A [`CacheConfig`] is handed to the client at construction and copied into
//! each request's options. There is no process-wide default store.

use crate::cache::reconcile::ReconcilePolicy;
use crate::cache::store::CacheStore;
use std::fmt;
use std::sync::Arc;

/// Per-request cache behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheMode {
    /// Serve fresh entries, revalidate stale ones, store cacheable responses.
    #[default]
    Normal,
    /// Ignore any stored entry and fetch from the network. On success the old
    /// entry is replaced if the new response is cacheable and deleted
    /// otherwise; a failed fetch leaves it in place.
    ForceRefresh,
    /// Read and revalidate, but never write to or delete from the store.
    ReadOnly,
}

/// Cache settings for a client.
#[derive(Clone, Default)]
pub struct CacheConfig {
    /// Backing store; `None` disables caching.
    pub store: Option<Arc<dyn CacheStore>>,
    /// Default mode for requests that do not set one.
    pub mode: CacheMode,
    /// How 304 headers are merged into stored entries.
    pub reconcile: ReconcilePolicy,
}

impl fmt::Debug for CacheConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheConfig")
            .field("store", &self.store.as_ref().map(|_| "<CacheStore>"))
            .field("mode", &self.mode)
            .field("reconcile", &self.reconcile)
            .finish()
    }
}

impl CacheConfig {
    /// Caching disabled.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Cache into `store` with default settings.
    pub fn with_store(store: Arc<dyn CacheStore>) -> Self {
        Self {
            store: Some(store),
            ..Self::default()
        }
    }

    pub fn mode(mut self, mode: CacheMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn reconcile(mut self, policy: ReconcilePolicy) -> Self {
        self.reconcile = policy;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.store.is_some()
    }
}
