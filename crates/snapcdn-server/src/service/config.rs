//! Service configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use snapcdn_storage::StorageConfig;
use url::Url;

/// Application configuration.
///
/// The storage root and public base URL are the only two process-wide
/// values; both are injected at startup and immutable afterwards.
///
/// # Environment Variables
///
/// - `STORAGE_ROOT` - Directory under which all assets are stored
/// - `PUBLIC_BASE_URL` - Base URL used when building returned file URLs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(clap::Args))]
#[must_use = "config does nothing unless you use it"]
pub struct ServiceConfig {
    /// Directory under which all assets are stored.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "STORAGE_ROOT", default_value = "./images")
    )]
    pub storage_root: PathBuf,

    /// Base URL prepended to relative asset paths in returned file URLs,
    /// e.g. `https://cdn.snapshotfa.st`.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "PUBLIC_BASE_URL", default_value = "http://127.0.0.1:3000")
    )]
    pub public_base_url: Url,
}

impl ServiceConfig {
    /// Builds the storage configuration for the asset store.
    pub fn storage_config(&self) -> StorageConfig {
        StorageConfig::new(self.storage_root.clone(), self.public_base_url.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_config_carries_both_values() {
        let config = ServiceConfig {
            storage_root: PathBuf::from("/var/lib/snapcdn"),
            public_base_url: Url::parse("https://cdn.snapshotfa.st").unwrap(),
        };

        let storage = config.storage_config();
        assert_eq!(storage.root(), PathBuf::from("/var/lib/snapcdn"));
        assert_eq!(
            storage.public_url("a.png"),
            "https://cdn.snapshotfa.st/images/a.png"
        );
    }
}
