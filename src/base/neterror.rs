use http::StatusCode;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum NetError {
    // Connection Errors
    #[error("Connection closed (TCP FIN)")]
    ConnectionClosed,
    #[error("Connection to {host}:{port} failed: {message}")]
    ConnectionFailedTo {
        host: String,
        port: u16,
        message: String,
    },
    #[error("Name not resolved: {domain}: {message}")]
    NameNotResolvedFor { domain: String, message: String },
    #[error("SSL protocol error")]
    SslProtocolError,
    #[error("SSL handshake with {host} failed")]
    SslHandshakeFailed { host: String },
    #[error("Request timed out")]
    TimedOut,

    // HTTP Errors
    #[error("Invalid URL")]
    InvalidUrl,
    #[error("Unknown URL scheme")]
    UnknownUrlScheme,
    #[error("Invalid header: {name}")]
    InvalidHeader { name: String },
    #[error("Failed to read response body")]
    HttpBodyError,
    #[error("HTTP status {0}")]
    HttpStatus(StatusCode),

    // Body decoding
    #[error("Response body is not text")]
    ContentDecodingFailed,
    #[error("Response body is not valid JSON")]
    JsonParseError,
}

impl NetError {
    pub fn connection_failed_to(host: &str, port: u16, err: std::io::Error) -> Self {
        NetError::ConnectionFailedTo {
            host: host.to_string(),
            port,
            message: err.to_string(),
        }
    }

    pub fn dns_failed(domain: &str, err: std::io::Error) -> Self {
        NetError::NameNotResolvedFor {
            domain: domain.to_string(),
            message: err.to_string(),
        }
    }

    /// Chromium `net_error_list.h` code, used as a stable log field.
    pub fn as_i32(&self) -> i32 {
        match self {
            NetError::ConnectionClosed => -100,
            NetError::ConnectionFailedTo { .. } => -104,
            NetError::NameNotResolvedFor { .. } => -105,
            NetError::SslProtocolError => -107,
            NetError::SslHandshakeFailed { .. } => -107,
            NetError::TimedOut => -118,
            NetError::InvalidUrl => -300,
            NetError::UnknownUrlScheme => -302,
            NetError::InvalidHeader { .. } => -320,
            NetError::HttpBodyError => -320,
            NetError::HttpStatus(_) => -370,
            NetError::ContentDecodingFailed => -330,
            NetError::JsonParseError => -330,
        }
    }

    /// True for failures raised before any bytes reached the server.
    pub fn is_connect(&self) -> bool {
        matches!(
            self,
            NetError::ConnectionFailedTo { .. }
                | NetError::NameNotResolvedFor { .. }
                | NetError::SslProtocolError
                | NetError::SslHandshakeFailed { .. }
        )
    }
}
