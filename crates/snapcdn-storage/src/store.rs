//! Filesystem-backed asset store.
//!
//! [`AssetStore`] owns the storage root and implements the full asset
//! lifecycle: collision-free ingestion with crash-safe placement,
//! read-only retrieval, idempotent subtree deletion, and best-effort
//! selective deletion by product identifier.
//!
//! Ingestion follows the write-temp → rename pattern: bytes land in a
//! uniquely named staging file first and are renamed into the namespace
//! directory only once fully written and synced, so a path visible under
//! its final name is always complete.

use std::io;
use std::path::{Component, Path, PathBuf};

use bytes::Bytes;
use serde::Serialize;
use snapcdn_core::namespace::{self, Category, Identifiers, Role, StoredName};
use snapcdn_core::{Error, Result};
use tokio::io::AsyncWriteExt;

use crate::config::StorageConfig;
use crate::staging::Staging;

/// Tracing target for asset lifecycle operations.
const TRACING_TARGET: &str = "snapcdn_storage::store";

/// The resolved location of a successfully ingested asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetLocation {
    /// Path of the stored file relative to the storage root.
    pub relative_path: String,
    /// Externally addressable URL of the stored file.
    pub file_url: String,
}

/// Outcome of a selective product deletion.
///
/// The sweep is best-effort: it keeps going past individual removal
/// failures and reports them here instead of failing the operation.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ProductSweep {
    /// Stored names that were removed.
    pub removed: Vec<String>,
    /// Stored names that matched but could not be removed.
    pub failed: Vec<String>,
}

impl ProductSweep {
    /// Returns the number of files removed.
    pub fn removed_count(&self) -> usize {
        self.removed.len()
    }

    /// Returns whether every matched file was removed.
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Filesystem-backed asset store rooted at a configured directory.
///
/// Cheap to clone; handlers hold a clone each. All filesystem work goes
/// through `tokio::fs`, so a stalled operation for one request never
/// blocks unrelated requests.
#[derive(Debug, Clone)]
#[must_use = "stores do nothing unless you call operations on them"]
pub struct AssetStore {
    config: StorageConfig,
    staging: Staging,
}

impl AssetStore {
    /// Opens the store, creating the storage root and staging directory
    /// if absent.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::StorageIo`] if either directory cannot be
    /// created.
    ///
    /// [`ErrorKind::StorageIo`]: snapcdn_core::ErrorKind::StorageIo
    pub async fn open(config: StorageConfig) -> Result<Self> {
        let staging = Staging::new(config.root());

        tokio::fs::create_dir_all(config.root()).await.map_err(|err| {
            Error::storage_io()
                .with_message("failed to create storage root")
                .with_source(err)
        })?;
        staging.ensure().await.map_err(|err| {
            Error::storage_io()
                .with_message("failed to create staging directory")
                .with_source(err)
        })?;

        Ok(Self { config, staging })
    }

    /// Returns the store configuration.
    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    /// Removes orphaned staging files left behind by a crash.
    ///
    /// Intended to run once at startup, before the server accepts
    /// requests.
    pub async fn sweep_staging(&self) -> Result<u64> {
        self.staging.sweep().await
    }

    /// Ingests an uploaded payload into its namespace directory.
    ///
    /// The payload is written to a staging file, synced, and atomically
    /// renamed to `{namespace}/{unique name}`. Concurrent ingestions into
    /// the same directory are safe: directory creation is idempotent and
    /// every asset receives an independent unique name.
    ///
    /// # Errors
    ///
    /// Validation errors (`MissingIdentifier`, `InvalidIdentifier`,
    /// `MissingPayload`) are raised before any filesystem mutation;
    /// `StorageIo` wraps directory creation, write, or rename faults.
    #[tracing::instrument(skip(self, payload), fields(category = %category, size = payload.len()))]
    pub async fn ingest(
        &self,
        payload: Bytes,
        original_name: &str,
        category: Category,
        identifiers: &Identifiers,
    ) -> Result<AssetLocation> {
        if payload.is_empty() {
            return Err(Error::missing_payload().with_message("no file payload supplied"));
        }

        let namespace = namespace::resolve(category, identifiers)?;
        let stored_name = StoredName::derive(original_name)?;

        let directory = self.config.root().join(namespace.to_rel_path());
        tokio::fs::create_dir_all(&directory).await.map_err(|err| {
            Error::storage_io()
                .with_message("failed to create namespace directory")
                .with_source(err)
        })?;

        let staged = self.staging.claim();
        if let Err(err) = write_synced(&staged, &payload).await {
            self.discard(&staged).await;
            return Err(Error::storage_io()
                .with_message("failed to write staged payload")
                .with_source(err));
        }

        let target = directory.join(stored_name.as_str());
        if let Err(err) = tokio::fs::rename(&staged, &target).await {
            self.discard(&staged).await;
            return Err(Error::storage_io()
                .with_message("failed to move staged payload into place")
                .with_source(err));
        }

        let relative_path = namespace.join_name(stored_name.as_str());
        let file_url = self.config.public_url(&relative_path);

        tracing::info!(
            target: TRACING_TARGET,
            url = %file_url,
            size = payload.len(),
            "asset stored"
        );

        Ok(AssetLocation {
            relative_path,
            file_url,
        })
    }

    /// Fetches the bytes of a stored asset by its root-relative path.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::NotFound`] for absent assets and for any path
    /// that is absolute, contains traversal segments, or addresses hidden
    /// entries (the staging directory included); `StorageIo` for other
    /// filesystem faults.
    ///
    /// [`ErrorKind::NotFound`]: snapcdn_core::ErrorKind::NotFound
    pub async fn fetch(&self, relative_path: &str) -> Result<Bytes> {
        let relative = served_path(relative_path)?;
        let full = self.config.root().join(relative);

        match tokio::fs::read(&full).await {
            Ok(bytes) => Ok(Bytes::from(bytes)),
            Err(err)
                if matches!(
                    err.kind(),
                    io::ErrorKind::NotFound | io::ErrorKind::IsADirectory
                ) =>
            {
                Err(Error::not_found().with_message("asset does not exist"))
            }
            Err(err) => Err(Error::storage_io()
                .with_message("failed to read asset")
                .with_source(err)),
        }
    }

    /// Removes a namespace directory and everything beneath it.
    ///
    /// A missing directory is a successful no-op, so the operation is
    /// idempotent. The root namespace ([`Category::Raw`]) is refused: it
    /// would delete the entire storage tree.
    ///
    /// # Errors
    ///
    /// Propagates resolution errors unchanged; returns `StorageIo` only
    /// on an underlying filesystem fault.
    #[tracing::instrument(skip(self), fields(category = %category))]
    pub async fn delete_subtree(
        &self,
        category: Category,
        identifiers: &Identifiers,
    ) -> Result<()> {
        let namespace = namespace::resolve(category, identifiers)?;
        if namespace.is_root() {
            return Err(
                Error::invalid_identifier().with_message("refusing to delete the storage root")
            );
        }

        let directory = self.config.root().join(namespace.to_rel_path());
        match tokio::fs::remove_dir_all(&directory).await {
            Ok(()) => {
                tracing::info!(
                    target: TRACING_TARGET,
                    namespace = %namespace,
                    "namespace subtree deleted"
                );
                Ok(())
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(Error::storage_io()
                .with_message("failed to delete namespace subtree")
                .with_source(err)),
        }
    }

    /// Removes every file in the product directory whose stored name
    /// contains the product identifier as a substring.
    ///
    /// Matching is intentionally coarse: `prod42` also matches
    /// `prod423`. The product directory is shared per `(user, supplier)`,
    /// and identifier formats are assumed not to collide as accidental
    /// substrings. A missing directory is a successful no-op.
    ///
    /// # Errors
    ///
    /// Returns `MissingIdentifier`/`InvalidIdentifier` for a bad product
    /// id and `StorageIo` only if the directory listing itself fails;
    /// per-file removal failures are reported in [`ProductSweep::failed`].
    #[tracing::instrument(skip(self))]
    pub async fn delete_by_product(&self, identifiers: &Identifiers) -> Result<ProductSweep> {
        let product_id = identifiers.get(Role::Product).ok_or_else(|| {
            Error::missing_identifier().with_message("product id is required")
        })?;
        namespace::validate_identifier(Role::Product, product_id)?;

        let namespace = namespace::resolve(Category::Product, identifiers)?;
        let directory = self.config.root().join(namespace.to_rel_path());

        let mut entries = match tokio::fs::read_dir(&directory).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Ok(ProductSweep::default());
            }
            Err(err) => {
                return Err(Error::storage_io()
                    .with_message("failed to list product directory")
                    .with_source(err));
            }
        };

        let mut sweep = ProductSweep::default();
        while let Some(entry) = entries.next_entry().await.map_err(|err| {
            Error::storage_io()
                .with_message("failed to list product directory")
                .with_source(err)
        })? {
            let name = entry.file_name().to_string_lossy().into_owned();
            if !name.contains(product_id) {
                continue;
            }

            match entry.file_type().await {
                Ok(file_type) if !file_type.is_file() => continue,
                Ok(_) => {}
                Err(err) => {
                    tracing::warn!(
                        target: TRACING_TARGET,
                        error = %err,
                        file = %name,
                        "failed to stat matched entry"
                    );
                    sweep.failed.push(name);
                    continue;
                }
            }

            match tokio::fs::remove_file(entry.path()).await {
                Ok(()) => sweep.removed.push(name),
                Err(err) => {
                    tracing::warn!(
                        target: TRACING_TARGET,
                        error = %err,
                        file = %name,
                        "failed to remove matched file"
                    );
                    sweep.failed.push(name);
                }
            }
        }

        tracing::info!(
            target: TRACING_TARGET,
            namespace = %namespace,
            removed = sweep.removed.len(),
            failed = sweep.failed.len(),
            "product files swept"
        );

        Ok(sweep)
    }

    /// Best-effort removal of a staging file after a failed ingestion.
    async fn discard(&self, staged: &Path) {
        if let Err(err) = tokio::fs::remove_file(staged).await
            && err.kind() != io::ErrorKind::NotFound
        {
            tracing::warn!(
                target: TRACING_TARGET,
                error = %err,
                file = %staged.display(),
                "failed to remove staging file after ingestion failure"
            );
        }
    }
}

/// Writes a payload to `path`, flushed and synced to disk.
async fn write_synced(path: &Path, payload: &[u8]) -> io::Result<()> {
    let mut file = tokio::fs::File::create(path).await?;
    file.write_all(payload).await?;
    file.flush().await?;
    file.sync_all().await?;
    Ok(())
}

/// Validates a requested root-relative path for read-only serving.
///
/// Only plain `Normal` components are allowed. Absolute paths, traversal
/// segments, and hidden entries all resolve to [`ErrorKind::NotFound`];
/// the read contract exposes nothing beyond "absent".
///
/// [`ErrorKind::NotFound`]: snapcdn_core::ErrorKind::NotFound
fn served_path(relative_path: &str) -> Result<PathBuf> {
    if relative_path.is_empty() || relative_path.contains('\0') {
        return Err(Error::not_found().with_message("asset does not exist"));
    }

    let mut clean = PathBuf::new();
    for component in Path::new(relative_path).components() {
        match component {
            Component::Normal(part) if !part.to_string_lossy().starts_with('.') => {
                clean.push(part);
            }
            _ => return Err(Error::not_found().with_message("asset does not exist")),
        }
    }

    if clean.as_os_str().is_empty() {
        return Err(Error::not_found().with_message("asset does not exist"));
    }

    Ok(clean)
}
