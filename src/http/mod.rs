//! HTTP request/response types and the transport boundary.

pub mod codec;
pub mod date;
pub mod request;
pub mod response;
pub mod transport;

// Re-exports for convenience
pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use request::{ConnectionMode, Credentials, HttpRequestInfo, RequestOptions};
pub use response::HttpResponse;
pub use transport::{HyperTransport, Transport, Transporting};
