//! Cache proxy state machine.
//!
//! Chromium mapping: net/http/http_cache_transaction.cc (heavily reduced)
//!
//! A [`CacheProxy`] is chosen once per request. Requests without a store,
//! and anything but GET, go straight to the transport. Everything else runs
//! through [`CachingProxy`], which decides between serving from the store,
//! revalidating a stale entry, and fetching afresh.
//!
//! The proxy holds no state between calls; all of it lives in the store.
//! Concurrent misses for the same key each fetch and the last write wins.

use crate::base::neterror::NetError;
use crate::cache::config::CacheMode;
use crate::cache::freshness;
use crate::cache::key::CacheKey;
use crate::cache::reconcile::{reconcile, ReconcilePolicy};
use crate::cache::store::CacheStore;
use crate::cache::validation::build_validation_request;
use crate::http::request::HttpRequestInfo;
use crate::http::response::HttpResponse;
use crate::http::transport::Transport;
use http::StatusCode;
use std::fmt;
use std::sync::Arc;
use time::OffsetDateTime;

/// Which path a request took through the proxy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    /// No store configured, or not a GET.
    NoCacheConfigured,
    /// Nothing usable stored (or a refresh was forced).
    CacheMiss,
    /// Served from the store without touching the network.
    CacheHitFresh,
    /// Stale entry revalidated with a conditional request.
    CacheHitStaleValidatable,
    /// Stale entry without validators; fetched like a miss.
    CacheHitStaleNotValidatable,
}

/// Cache behavior selected for one request.
#[derive(Debug)]
pub enum CacheProxy {
    /// Forward to the transport untouched.
    Passthrough,
    Caching(CachingProxy),
}

impl CacheProxy {
    /// Pick the proxy for `request`.
    pub fn select(request: &HttpRequestInfo, policy: ReconcilePolicy) -> Self {
        let Some(store) = request.options().cache_store.clone() else {
            return CacheProxy::Passthrough;
        };

        match CacheKey::derive(request) {
            Some(key) => CacheProxy::Caching(CachingProxy {
                store,
                key,
                mode: request.options().cache_mode,
                policy,
            }),
            None => CacheProxy::Passthrough,
        }
    }

    /// Perform `request`, consulting the cache where configured.
    pub async fn get(
        &self,
        transport: &dyn Transport,
        request: &HttpRequestInfo,
    ) -> Result<HttpResponse, NetError> {
        self.execute(transport, request)
            .await
            .map(|(_, response)| response)
    }

    /// Like [`get`](Self::get), also reporting the path taken.
    pub async fn execute(
        &self,
        transport: &dyn Transport,
        request: &HttpRequestInfo,
    ) -> Result<(CacheState, HttpResponse), NetError> {
        match self {
            CacheProxy::Passthrough => {
                tracing::debug!(
                    method = %request.method(),
                    url = %request.url(),
                    "cache bypassed"
                );
                let response = transport.send(request.clone()).await?;
                Ok((CacheState::NoCacheConfigured, response))
            }
            CacheProxy::Caching(proxy) => proxy.execute(transport, request).await,
        }
    }
}

/// Proxy for a cacheable request with a store.
pub struct CachingProxy {
    store: Arc<dyn CacheStore>,
    key: CacheKey,
    mode: CacheMode,
    policy: ReconcilePolicy,
}

impl fmt::Debug for CachingProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachingProxy")
            .field("key", &self.key)
            .field("mode", &self.mode)
            .field("policy", &self.policy)
            .finish()
    }
}

impl CachingProxy {
    pub fn key(&self) -> &CacheKey {
        &self.key
    }

    pub fn mode(&self) -> CacheMode {
        self.mode
    }

    async fn execute(
        &self,
        transport: &dyn Transport,
        request: &HttpRequestInfo,
    ) -> Result<(CacheState, HttpResponse), NetError> {
        if self.mode == CacheMode::ForceRefresh {
            return self.refresh(transport, request).await;
        }

        let now = OffsetDateTime::now_utc();
        match self.lookup()? {
            None => self.fetch(transport, request, CacheState::CacheMiss).await,
            Some(entry) if !freshness::is_expired(&entry, now) => {
                tracing::debug!(key = %self.key, state = ?CacheState::CacheHitFresh, "cache hit");
                Ok((CacheState::CacheHitFresh, entry))
            }
            Some(entry) if freshness::is_validatable(&entry) => {
                self.revalidate(transport, request, entry).await
            }
            Some(_) => {
                self.fetch(transport, request, CacheState::CacheHitStaleNotValidatable)
                    .await
            }
        }
    }

    /// Read the stored entry. An entry that fails to decode counts as absent.
    fn lookup(&self) -> Result<Option<HttpResponse>, NetError> {
        match self.store.get(&self.key) {
            Err(NetError::CacheChecksumMismatch) => {
                tracing::warn!(key = %self.key, "corrupt cache entry, treating as miss");
                Ok(None)
            }
            other => other,
        }
    }

    /// Fetch from the network, replacing whatever is stored.
    async fn fetch(
        &self,
        transport: &dyn Transport,
        request: &HttpRequestInfo,
        state: CacheState,
    ) -> Result<(CacheState, HttpResponse), NetError> {
        tracing::debug!(key = %self.key, state = ?state, "fetching");

        self.remove()?;

        let response = transport.send(request.clone()).await?;
        self.store_if_cacheable(&response)?;
        Ok((state, response))
    }

    /// Fetch ignoring the stored entry. The store is only touched once the
    /// transport has answered, so a failed refresh keeps the old entry.
    async fn refresh(
        &self,
        transport: &dyn Transport,
        request: &HttpRequestInfo,
    ) -> Result<(CacheState, HttpResponse), NetError> {
        tracing::debug!(key = %self.key, "forced refresh");

        let response = transport.send(request.clone()).await?;
        if freshness::is_cacheable(&response, OffsetDateTime::now_utc()) {
            self.store_if_cacheable(&response)?;
        } else {
            self.remove()?;
        }
        Ok((CacheState::CacheMiss, response))
    }

    /// Send a conditional request for a stale entry.
    async fn revalidate(
        &self,
        transport: &dyn Transport,
        request: &HttpRequestInfo,
        mut entry: HttpResponse,
    ) -> Result<(CacheState, HttpResponse), NetError> {
        let state = CacheState::CacheHitStaleValidatable;
        tracing::debug!(key = %self.key, state = ?state, "revalidating");

        let conditional = build_validation_request(&entry, request)?;
        let response = transport.send(conditional).await?;

        if response.status() != StatusCode::NOT_MODIFIED {
            tracing::debug!(key = %self.key, status = %response.status(), "entry replaced");
            self.store_if_cacheable(&response)?;
            return Ok((state, response));
        }

        tracing::debug!(key = %self.key, "not modified");
        reconcile(&mut entry, &response, self.policy);
        entry.set_received_at(OffsetDateTime::now_utc());
        if self.writable() {
            self.store.set(&self.key, entry.clone())?;
        }
        Ok((state, entry))
    }

    fn store_if_cacheable(&self, response: &HttpResponse) -> Result<(), NetError> {
        if !self.writable() || !freshness::is_cacheable(response, OffsetDateTime::now_utc()) {
            return Ok(());
        }
        tracing::debug!(key = %self.key, "storing response");
        self.store.set(&self.key, response.clone())
    }

    /// Drop the stored entry. An undecodable entry is gone either way.
    fn remove(&self) -> Result<(), NetError> {
        if !self.writable() {
            return Ok(());
        }
        match self.store.delete(&self.key) {
            Ok(_) | Err(NetError::CacheChecksumMismatch) => Ok(()),
            Err(e) => Err(e),
        }
    }

    fn writable(&self) -> bool {
        self.mode != CacheMode::ReadOnly
    }
}
