//! Staging directory for in-flight uploads.
//!
//! Incoming bytes are written to a uniquely named `.part` file under
//! `{root}/.staging` and atomically renamed into their final directory
//! once fully written. Keeping the staging directory under the storage
//! root guarantees the rename never crosses filesystems.

use std::io;
use std::path::{Path, PathBuf};

use snapcdn_core::Result;
use uuid::Uuid;

/// Tracing target for staging housekeeping.
const TRACING_TARGET: &str = "snapcdn_storage::staging";

/// Directory name for in-flight uploads, relative to the storage root.
const STAGING_DIR: &str = ".staging";

/// Suffix of in-flight upload files.
const PART_SUFFIX: &str = ".part";

/// Staging area for partially written uploads.
#[derive(Debug, Clone)]
pub(crate) struct Staging {
    dir: PathBuf,
}

impl Staging {
    /// Creates a staging area rooted under the given storage root.
    pub(crate) fn new(root: &Path) -> Self {
        Self {
            dir: root.join(STAGING_DIR),
        }
    }

    /// Ensures the staging directory exists.
    pub(crate) async fn ensure(&self) -> io::Result<()> {
        tokio::fs::create_dir_all(&self.dir).await
    }

    /// Claims a fresh, uniquely named staging path for one upload.
    pub(crate) fn claim(&self) -> PathBuf {
        self.dir.join(format!("{}{PART_SUFFIX}", Uuid::new_v4()))
    }

    /// Removes leftover `.part` files from uploads that never completed.
    ///
    /// Anything inside the staging directory is by definition either
    /// in-flight or orphaned; this sweep runs at startup, before any
    /// request is accepted, so everything present is an orphan.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::StorageIo`] if the staging directory cannot
    /// be listed. Individual removal failures are logged and skipped.
    ///
    /// [`ErrorKind::StorageIo`]: snapcdn_core::ErrorKind::StorageIo
    pub(crate) async fn sweep(&self) -> Result<u64> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(err) => {
                return Err(snapcdn_core::Error::storage_io()
                    .with_message("failed to list staging directory")
                    .with_source(err));
            }
        };

        let mut removed = 0;
        while let Some(entry) = entries.next_entry().await.map_err(|err| {
            snapcdn_core::Error::storage_io()
                .with_message("failed to list staging directory")
                .with_source(err)
        })? {
            let name = entry.file_name();
            if !name.to_string_lossy().ends_with(PART_SUFFIX) {
                continue;
            }

            match tokio::fs::remove_file(entry.path()).await {
                Ok(()) => removed += 1,
                Err(err) => {
                    tracing::warn!(
                        target: TRACING_TARGET,
                        error = %err,
                        file = %entry.path().display(),
                        "failed to remove orphaned staging file"
                    );
                }
            }
        }

        if removed > 0 {
            tracing::info!(
                target: TRACING_TARGET,
                removed = removed,
                "swept orphaned staging files"
            );
        }

        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn claims_are_unique() {
        let staging = Staging::new(Path::new("/tmp/snapcdn-test"));
        assert_ne!(staging.claim(), staging.claim());
    }

    #[tokio::test]
    async fn sweep_of_missing_directory_is_a_noop() {
        let temp = tempfile::tempdir().unwrap();
        let staging = Staging::new(&temp.path().join("never-created"));
        assert_eq!(staging.sweep().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn sweep_removes_only_part_files() {
        let temp = tempfile::tempdir().unwrap();
        let staging = Staging::new(temp.path());
        staging.ensure().await.unwrap();

        let orphan = staging.claim();
        tokio::fs::write(&orphan, b"partial").await.unwrap();
        let keeper = staging.dir.join("not-a-part-file");
        tokio::fs::write(&keeper, b"keep").await.unwrap();

        assert_eq!(staging.sweep().await.unwrap(), 1);
        assert!(!orphan.exists());
        assert!(keeper.exists());
    }
}
