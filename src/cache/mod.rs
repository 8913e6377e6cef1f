//! HTTP caching.
//!
//! Chromium mapping: net/http/http_cache.h (in-memory, single-key stores)
//!
//! - [`key`] - Cache key derivation
//! - [`control`] - Cache-Control parsing
//! - [`freshness`] - Cacheability, expiry and validators
//! - [`validation`] - Conditional request construction
//! - [`reconcile`] - Header update on `304 Not Modified`
//! - [`store`] - Storage trait and in-memory backends
//! - [`proxy`] - The state machine tying it together
//!
//! Only GET responses are cached. Freshness follows RFC 2616 with `max-age`
//! taking precedence over `Expires`.

pub mod config;
pub mod control;
pub mod freshness;
pub mod key;
pub mod proxy;
pub mod reconcile;
pub mod store;
pub mod validation;

pub use config::{CacheConfig, CacheMode};
pub use control::{CacheControl, CacheDirective};
pub use key::CacheKey;
pub use proxy::{CacheProxy, CacheState, CachingProxy};
pub use reconcile::{reconcile, ReconcilePolicy};
pub use store::{CacheStore, EncodedMemoryStore, MemoryStore};
pub use validation::build_validation_request;
