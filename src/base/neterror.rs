use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum NetError {
    // Generic
    #[error("Request aborted")]
    Aborted,

    // Connection Errors
    #[error("Connection closed (TCP FIN)")]
    ConnectionClosed,
    #[error("Connection reset (TCP RST)")]
    ConnectionReset,
    #[error("Connection refused")]
    ConnectionRefused,
    #[error("Connection aborted")]
    ConnectionAborted,
    #[error("Connection failed")]
    ConnectionFailed,
    #[error("Address unreachable")]
    AddressUnreachable,
    #[error("Socket not connected")]
    SocketNotConnected,
    #[error("Connection timed out")]
    ConnectionTimedOut,

    // HTTP Errors
    #[error("Invalid URL")]
    InvalidUrl,
    #[error("Disallowed URL scheme")]
    DisallowedUrlScheme,
    #[error("Empty response")]
    EmptyResponse,
    #[error("Invalid HTTP response")]
    InvalidHttpResponse,

    // Cache Errors
    #[error("Cache read failure: {message}")]
    CacheReadFailure { message: String },
    #[error("Cache write failure: {message}")]
    CacheWriteFailure { message: String },
    #[error("Cache entry checksum mismatch")]
    CacheChecksumMismatch,
    #[error("Cache entry not suitable for validation")]
    CacheEntryNotSuitable,

    // Body and codec errors (custom codes starting at -900)
    #[error("Invalid header")]
    InvalidHeader,
    #[error("HTTP body error")]
    HttpBodyError,
    #[error("Invalid UTF-8 in body")]
    InvalidUtf8,
    #[error("JSON parse error")]
    JsonParseError,
    #[error("Unsupported content type: {content_type}")]
    UnsupportedContentType { content_type: String },
    #[error("Body encoding failed")]
    BodyEncodingFailed,

    #[error("Unknown error: {0}")]
    Unknown(i32),
}

impl NetError {
    pub fn as_i32(&self) -> i32 {
        match self {
            NetError::Aborted => -3,

            NetError::ConnectionClosed => -100,
            NetError::ConnectionReset => -101,
            NetError::ConnectionRefused => -102,
            NetError::ConnectionAborted => -103,
            NetError::ConnectionFailed => -104,
            NetError::AddressUnreachable => -109,
            NetError::SocketNotConnected => -112,
            NetError::ConnectionTimedOut => -118,

            NetError::InvalidUrl => -300,
            NetError::DisallowedUrlScheme => -301,
            NetError::EmptyResponse => -324,
            NetError::InvalidHttpResponse => -370,

            NetError::CacheReadFailure { .. } => -401,
            NetError::CacheWriteFailure { .. } => -402,
            NetError::CacheChecksumMismatch => -408,
            NetError::CacheEntryNotSuitable => -411,

            NetError::InvalidHeader => -905,
            NetError::HttpBodyError => -906,
            NetError::InvalidUtf8 => -907,
            NetError::JsonParseError => -908,
            NetError::UnsupportedContentType { .. } => -909,
            NetError::BodyEncodingFailed => -910,
            NetError::Unknown(code) => *code,
        }
    }

    /// Socket-level failures (Chromium's 100-199 range).
    ///
    /// These come from the transport and are never produced by the cache.
    pub fn is_connection_error(&self) -> bool {
        (-199..=-100).contains(&self.as_i32())
    }

    /// Failures raised by a cache store or by cache bookkeeping.
    pub fn is_cache_error(&self) -> bool {
        (-499..=-400).contains(&self.as_i32())
    }

    /// Create a store read failure with context.
    pub fn cache_read_failed(message: impl Into<String>) -> Self {
        NetError::CacheReadFailure {
            message: message.into(),
        }
    }

    /// Create a store write failure with context.
    pub fn cache_write_failed(message: impl Into<String>) -> Self {
        NetError::CacheWriteFailure {
            message: message.into(),
        }
    }

    pub fn unsupported_content_type(content_type: impl Into<String>) -> Self {
        NetError::UnsupportedContentType {
            content_type: content_type.into(),
        }
    }
}

impl From<i32> for NetError {
    fn from(code: i32) -> Self {
        match code {
            -3 => NetError::Aborted,

            -100 => NetError::ConnectionClosed,
            -101 => NetError::ConnectionReset,
            -102 => NetError::ConnectionRefused,
            -103 => NetError::ConnectionAborted,
            -104 => NetError::ConnectionFailed,
            -109 => NetError::AddressUnreachable,
            -112 => NetError::SocketNotConnected,
            -118 => NetError::ConnectionTimedOut,

            -300 => NetError::InvalidUrl,
            -301 => NetError::DisallowedUrlScheme,
            -324 => NetError::EmptyResponse,
            -370 => NetError::InvalidHttpResponse,

            -401 => NetError::cache_read_failed(""),
            -402 => NetError::cache_write_failed(""),
            -408 => NetError::CacheChecksumMismatch,
            -411 => NetError::CacheEntryNotSuitable,

            -905 => NetError::InvalidHeader,
            -906 => NetError::HttpBodyError,
            -907 => NetError::InvalidUtf8,
            -908 => NetError::JsonParseError,
            -909 => NetError::unsupported_content_type(""),
            -910 => NetError::BodyEncodingFailed,
            _ => NetError::Unknown(code),
        }
    }
}
