//! Common error type definitions.

use strum::{AsRefStr, IntoStaticStr};
use thiserror::Error;

/// Type alias for boxed dynamic errors that can be sent across threads.
///
/// This type is commonly used as a source error in structured error types,
/// providing a way to wrap any error that implements the standard `Error` trait
/// while maintaining Send and Sync bounds for multi-threaded contexts.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// Type alias for Results with our custom Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Categories of errors that can occur in snapcdn operations.
///
/// Validation kinds (`MissingIdentifier`, `InvalidIdentifier`,
/// `MissingPayload`) are always raised before any filesystem mutation;
/// `StorageIo` wraps an underlying filesystem fault; `NotFound` applies
/// only to read targets and is never raised by idempotent deletes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// A required identifier role is absent or empty.
    MissingIdentifier,
    /// An identifier or filename contains path-unsafe content.
    InvalidIdentifier,
    /// No file payload was supplied.
    MissingPayload,
    /// An underlying filesystem operation failed.
    StorageIo,
    /// The requested asset does not exist.
    NotFound,
}

/// A structured error type for snapcdn operations.
#[derive(Debug, Error)]
#[error("{kind:?}{}", message.as_ref().map(|m| format!(": {}", m)).unwrap_or_default())]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional error message.
    pub message: Option<String>,
    /// Optional source error.
    #[source]
    pub source: Option<BoxedError>,
}

impl Error {
    /// Creates a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            source: None,
        }
    }

    /// Adds a message to this error.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Adds a source error to this error.
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Creates a new missing identifier error.
    pub fn missing_identifier() -> Self {
        Self::new(ErrorKind::MissingIdentifier)
    }

    /// Creates a new invalid identifier error.
    pub fn invalid_identifier() -> Self {
        Self::new(ErrorKind::InvalidIdentifier)
    }

    /// Creates a new missing payload error.
    pub fn missing_payload() -> Self {
        Self::new(ErrorKind::MissingPayload)
    }

    /// Creates a new storage I/O error.
    pub fn storage_io() -> Self {
        Self::new(ErrorKind::StorageIo)
    }

    /// Creates a new not found error.
    pub fn not_found() -> Self {
        Self::new(ErrorKind::NotFound)
    }

    /// Returns the error kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the error kind as a string.
    pub fn kind_str(&self) -> &'static str {
        self.kind.into()
    }

    /// Returns whether this error was raised before any filesystem mutation.
    pub fn is_validation(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::MissingIdentifier | ErrorKind::InvalidIdentifier | ErrorKind::MissingPayload
        )
    }
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Self::new(ErrorKind::StorageIo).with_source(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_strings_are_snake_case() {
        assert_eq!(Error::missing_identifier().kind_str(), "missing_identifier");
        assert_eq!(Error::invalid_identifier().kind_str(), "invalid_identifier");
        assert_eq!(Error::missing_payload().kind_str(), "missing_payload");
        assert_eq!(Error::storage_io().kind_str(), "storage_io");
        assert_eq!(Error::not_found().kind_str(), "not_found");
    }

    #[test]
    fn validation_kinds_are_classified() {
        assert!(Error::missing_identifier().is_validation());
        assert!(Error::invalid_identifier().is_validation());
        assert!(Error::missing_payload().is_validation());
        assert!(!Error::storage_io().is_validation());
        assert!(!Error::not_found().is_validation());
    }

    #[test]
    fn io_errors_convert_to_storage_io() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let error = Error::from(io);
        assert_eq!(error.kind(), ErrorKind::StorageIo);
        assert!(std::error::Error::source(&error).is_some());
    }

    #[test]
    fn message_is_rendered() {
        let error = Error::missing_identifier().with_message("user id is required");
        assert!(error.to_string().contains("user id is required"));
    }
}
