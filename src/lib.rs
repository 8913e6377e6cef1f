//! # cachenet
//!
//! An HTTP client library with an RFC 2616 caching layer.
//!
//! Requests are plain values ([`HttpRequestInfo`]) built through
//! [`Client`]'s request builder. Responses are buffered ([`HttpResponse`])
//! and decoded on demand through a [`Codec`](http::Codec). With a cache store
//! configured, GET responses are stored, served while fresh, and revalidated
//! with conditional requests once stale.
//!
//! ## Features
//!
//! - **Cache keys**: method, origin, path, query parameters as a set,
//!   credentials and TLS verification mode
//! - **Freshness**: `max-age`, `Expires` and the `Expires` fragment some
//!   servers put inside `Cache-Control`
//! - **Revalidation**: `If-None-Match` / `If-Modified-Since` with header
//!   reconciliation on `304 Not Modified`
//! - **Pluggable stores**: anything implementing [`CacheStore`]
//! - **Pluggable transport and executor**: [`Transport`], [`Executor`]
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cachenet::cache::MemoryStore;
//! use cachenet::Client;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = Client::builder()
//!         .cache_store(Arc::new(MemoryStore::new()))
//!         .build();
//!
//!     let response = client.get("http://example.com/").send().await.unwrap();
//!     println!("Status: {}", response.status());
//! }
//! ```
//!
//! ## Modules
//!
//! - [`base`] - Errors and task execution
//! - [`cache`] - Keys, freshness, validation, stores and the cache proxy
//! - [`http`] - Requests, responses, codecs and the transport boundary
//! - [`client`] - Builder-style client

pub mod base;
pub mod cache;
pub mod client;
pub mod http;

pub use base::executor::{Executor, TokioExecutor};
pub use base::neterror::NetError;
pub use cache::{CacheConfig, CacheKey, CacheMode, CacheStore, MemoryStore};
pub use client::{Client, ClientBuilder, PendingResponse, RequestBuilder};
pub use http::{HttpRequestInfo, HttpResponse, Transport};
