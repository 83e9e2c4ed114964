use thiserror::Error;

/// Failure of a single network exchange with the remote service.
///
/// Every variant keeps the request URL and the underlying cause. Nothing in
/// the crate retries on these; the caller decides what to show.
#[derive(Error, Debug)]
pub enum TransportError {
    /// Connection could not be established or the request could not be sent
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The per-client timeout elapsed
    #[error("request to {url} timed out: {source}")]
    Timeout {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The service answered with a non-success status code
    #[error("{url} returned HTTP {status}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    /// The body was not valid JSON
    #[error("undecodable response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl TransportError {
    /// URL of the request that failed
    pub fn url(&self) -> &str {
        match self {
            Self::Request { url, .. }
            | Self::Timeout { url, .. }
            | Self::Status { url, .. }
            | Self::Decode { url, .. } => url,
        }
    }

    /// HTTP status code, if the service answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// eurogames error types
#[derive(Error, Debug)]
pub enum EurogamesError {
    /// Network exchange failed
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),

    /// File I/O error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse or serialize JSON outside of a network exchange
    #[error("parse error: {0}")]
    Parse(String),
}

impl EurogamesError {
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

/// Result type alias for eurogames
pub type Result<T> = std::result::Result<T, EurogamesError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn status_error() -> TransportError {
        TransportError::Status {
            url: "https://example.invalid/v1/games".into(),
            status: 503,
            body: "upstream down".into(),
        }
    }

    #[test]
    fn test_error_display() {
        let err = EurogamesError::Config("timeout must be numeric".into());
        assert_eq!(err.to_string(), "config error: timeout must be numeric");
    }

    #[test]
    fn test_status_error_display() {
        assert_eq!(
            status_error().to_string(),
            "https://example.invalid/v1/games returned HTTP 503: upstream down"
        );
    }

    #[test]
    fn test_transport_error_conversion() {
        let err: EurogamesError = status_error().into();
        assert!(err.is_transport());
        assert!(err.to_string().starts_with("transport error:"));
    }

    #[test]
    fn test_transport_accessors() {
        let err = status_error();
        assert_eq!(err.url(), "https://example.invalid/v1/games");
        assert_eq!(err.status(), Some(503));
    }

    #[test]
    fn test_decode_error_keeps_source() {
        let source = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let err = TransportError::Decode {
            url: "u".into(),
            source,
        };
        assert!(std::error::Error::source(&err).is_some());
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: EurogamesError = io_err.into();
        assert!(err.to_string().contains("io error"));
        assert!(!err.is_transport());
    }
}
