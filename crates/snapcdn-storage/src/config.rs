//! Storage configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

/// Configuration for the on-disk asset store.
///
/// The storage root and public base URL are supplied once at startup and
/// treated as immutable for the process lifetime; no other component owns
/// any part of the filesystem subtree below the root.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[must_use = "config does nothing unless you use it"]
pub struct StorageConfig {
    /// Directory under which all namespaces live.
    pub root: PathBuf,
    /// Base URL prepended to relative asset paths in returned `fileUrl`s,
    /// e.g. `https://cdn.snapshotfa.st`.
    pub public_base_url: Url,
}

impl StorageConfig {
    /// Creates a new storage configuration.
    pub fn new(root: impl Into<PathBuf>, public_base_url: Url) -> Self {
        Self {
            root: root.into(),
            public_base_url,
        }
    }

    /// Returns the storage root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Builds the externally addressable URL for a root-relative asset path.
    pub fn public_url(&self, relative_path: &str) -> String {
        let base = self.public_base_url.as_str().trim_end_matches('/');
        format!("{base}/images/{relative_path}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_urls_are_rooted_under_images() {
        let config = StorageConfig::new(
            "/var/lib/snapcdn",
            Url::parse("https://cdn.snapshotfa.st").unwrap(),
        );
        assert_eq!(
            config.public_url("avatars/u1/x.png"),
            "https://cdn.snapshotfa.st/images/avatars/u1/x.png"
        );
    }

    #[test]
    fn trailing_slash_in_base_url_is_tolerated() {
        let config = StorageConfig::new(
            "/var/lib/snapcdn",
            Url::parse("https://cdn.snapshotfa.st/").unwrap(),
        );
        assert_eq!(
            config.public_url("a.png"),
            "https://cdn.snapshotfa.st/images/a.png"
        );
    }
}
