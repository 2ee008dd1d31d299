//! Server error types.

use std::io;

use thiserror::Error;

/// Result type for server operations.
pub type ServerResult<T> = std::result::Result<T, ServerError>;

/// Error type for server startup and runtime faults.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Server configuration is invalid.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Failed to bind to the specified address.
    #[error("Failed to bind to {address}: {source}")]
    BindError {
        address: String,
        #[source]
        source: io::Error,
    },

    /// Runtime server error.
    #[error("Runtime error: {0}")]
    Runtime(#[source] io::Error),

    /// TLS configuration error.
    #[error("TLS certificate error: {0}")]
    #[allow(dead_code)]
    TlsCertificate(String),
}

impl ServerError {
    /// Creates a bind error with address context.
    pub fn bind_error(address: &str, source: io::Error) -> Self {
        Self::BindError {
            address: address.to_string(),
            source,
        }
    }

    /// Determines if this error is potentially recoverable.
    ///
    /// Recoverable errors are those that might succeed if retried or if
    /// the environment changes (e.g., different port, wait for resource).
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::InvalidConfig(_) | Self::TlsCertificate(_) => false,
            Self::BindError { source, .. } => matches!(
                source.kind(),
                io::ErrorKind::PermissionDenied
                    | io::ErrorKind::AddrInUse
                    | io::ErrorKind::AddrNotAvailable
            ),
            Self::Runtime(err) => matches!(
                err.kind(),
                io::ErrorKind::PermissionDenied
                    | io::ErrorKind::Interrupted
                    | io::ErrorKind::TimedOut
                    | io::ErrorKind::ConnectionRefused
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_errors_on_busy_ports_are_recoverable() {
        let error = ServerError::bind_error(
            "127.0.0.1:3000",
            io::Error::new(io::ErrorKind::AddrInUse, "in use"),
        );
        assert!(error.is_recoverable());
        assert!(error.to_string().contains("127.0.0.1:3000"));
    }

    #[test]
    fn config_errors_are_not_recoverable() {
        let error = ServerError::InvalidConfig("bad port".to_string());
        assert!(!error.is_recoverable());
    }
}
