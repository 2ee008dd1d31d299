//! Stored-name derivation for ingested assets.

use std::fmt;

use serde::Serialize;
use uuid::Uuid;

use crate::error::{Error, Result};

/// The unique on-disk name of an ingested asset.
///
/// A stored name is `{uuid-v7}-{sanitized original filename}`. The UUIDv7
/// prefix keeps names roughly time-ordered within a directory while
/// guaranteeing that two ingestions of identically named files never
/// collide, no matter how close together they complete.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
#[must_use = "stored names do nothing unless written under a namespace"]
pub struct StoredName(String);

impl StoredName {
    /// Derives a fresh unique stored name from the caller-supplied
    /// original filename.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidIdentifier`] if the original filename
    /// fails [`sanitize_filename`].
    ///
    /// [`ErrorKind::InvalidIdentifier`]: crate::ErrorKind::InvalidIdentifier
    pub fn derive(original: &str) -> Result<Self> {
        let sanitized = sanitize_filename(original)?;
        Ok(Self(format!("{}-{}", Uuid::now_v7(), sanitized)))
    }

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the name, returning the inner string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for StoredName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StoredName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Validates and sanitizes a caller-supplied filename for use as a path
/// segment.
///
/// Path traversal content and leading dots are rejected outright; all
/// remaining characters outside the portable set are stripped.
///
/// # Errors
///
/// Returns [`ErrorKind::InvalidIdentifier`] if the name contains traversal
/// characters, starts with a dot, or contains no valid characters at all.
///
/// [`ErrorKind::InvalidIdentifier`]: crate::ErrorKind::InvalidIdentifier
pub fn sanitize_filename(filename: &str) -> Result<String> {
    if filename.contains("..") || filename.contains('/') || filename.contains('\\') {
        return Err(Error::invalid_identifier()
            .with_message("filename contains path traversal characters"));
    }

    if filename.starts_with('.') {
        return Err(Error::invalid_identifier().with_message("filename cannot start with a dot"));
    }

    let sanitized: String = filename
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, '.' | '_' | '-' | ' '))
        .collect();

    if sanitized.is_empty() {
        return Err(
            Error::invalid_identifier().with_message("filename contains no valid characters")
        );
    }

    Ok(sanitized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_keeps_portable_characters() {
        assert_eq!(sanitize_filename("photo-1.png").unwrap(), "photo-1.png");
        assert_eq!(sanitize_filename("my photo_2.JPG").unwrap(), "my photo_2.JPG");
    }

    #[test]
    fn sanitize_strips_exotic_characters() {
        assert_eq!(sanitize_filename("a<b>:c.png").unwrap(), "abc.png");
    }

    #[test]
    fn sanitize_rejects_traversal() {
        assert!(sanitize_filename("../secret.png").is_err());
        assert!(sanitize_filename("a/b.png").is_err());
        assert!(sanitize_filename("a\\b.png").is_err());
        assert!(sanitize_filename(".hidden").is_err());
    }

    #[test]
    fn sanitize_rejects_empty_results() {
        assert!(sanitize_filename("").is_err());
        assert!(sanitize_filename("<<<>>>").is_err());
    }

    #[test]
    fn derived_names_embed_the_original() {
        let name = StoredName::derive("photo.png").unwrap();
        assert!(name.as_str().ends_with("-photo.png"));
    }

    #[test]
    fn derived_names_are_unique() {
        let a = StoredName::derive("photo.png").unwrap();
        let b = StoredName::derive("photo.png").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn derived_names_are_time_ordered() {
        // UUIDv7 prefixes sort by creation time at millisecond granularity,
        // so a later derivation never sorts before an earlier one across a
        // millisecond boundary. Compare only across a measurable gap.
        let early = StoredName::derive("a.png").unwrap();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let late = StoredName::derive("a.png").unwrap();
        assert!(early.as_str() < late.as_str());
    }
}
