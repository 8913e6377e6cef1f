//! Base types and error handling.
//!
//! Provides foundational types mirroring Chromium's `net/base/`:
//! - [`NetError`](neterror::NetError): Network error codes matching `net_error_list.h`
//! - [`Executor`](executor::Executor): Background execution of whole requests

pub mod executor;
pub mod neterror;
