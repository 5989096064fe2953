// SPDX-License-Identifier: GPL-3.0-only
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::SyncError;
use crate::manifest::{Manifest, MANIFEST_FILE};
use crate::store::traits::CacheStore;
use crate::utils::validate_package_name;

/// Prefix of temporary files used for atomic writes. Leading dot keeps them
/// out of entry listings and out of the valid package-name space.
const TEMP_PREFIX: &str = ".tmp-";

/// Filesystem-backed cache store: one file per package in a single cache
/// directory, with the manifest record stored beside them.
pub struct FsCacheStore {
    root: PathBuf,
}

impl FsCacheStore {
    /// Open (creating if needed) a cache store rooted at `root`.
    pub async fn new(root: PathBuf) -> Result<Self, SyncError> {
        tokio::fs::create_dir_all(&root)
            .await
            .map_err(|e| SyncError::storage("creating cache directory", e))?;
        Ok(Self { root })
    }

    fn manifest_path(&self) -> PathBuf {
        self.root.join(MANIFEST_FILE)
    }

    fn entry_path(&self, name: &str) -> Result<PathBuf, SyncError> {
        validate_package_name(name).map_err(|reason| {
            SyncError::storage(
                "resolving cache entry path",
                std::io::Error::new(ErrorKind::InvalidInput, reason),
            )
        })?;
        Ok(self.root.join(name))
    }

    /// Write `content` to `target` via a uniquely named temp file and a
    /// rename, so readers never observe a partial file.
    async fn write_atomic(&self, target: &Path, content: &[u8]) -> Result<(), SyncError> {
        let temp = self.root.join(format!("{}{}", TEMP_PREFIX, Uuid::new_v4()));

        if let Err(e) = tokio::fs::write(&temp, content).await {
            return Err(SyncError::storage("writing temp file", e));
        }

        if let Err(e) = tokio::fs::rename(&temp, target).await {
            if let Err(cleanup) = tokio::fs::remove_file(&temp).await {
                warn!(error = %cleanup, path = %temp.display(), "Failed to remove stale temp file");
            }
            return Err(SyncError::storage("committing file", e));
        }

        Ok(())
    }
}

#[async_trait]
impl CacheStore for FsCacheStore {
    async fn load_manifest(&self) -> Result<Manifest, SyncError> {
        let path = self.manifest_path();

        let body = match tokio::fs::read_to_string(&path).await {
            Ok(body) => body,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "No local manifest, treating cache as empty");
                return Ok(Manifest::new());
            }
            Err(e) => return Err(SyncError::storage("reading local manifest", e)),
        };

        match Manifest::from_json(&body) {
            Ok(manifest) => Ok(manifest),
            Err(e) => {
                // Corrupt record, as opposed to first-run absence.
                warn!(path = %path.display(), error = %e, "Local manifest is unreadable");
                Err(SyncError::storage(
                    "parsing local manifest",
                    std::io::Error::new(ErrorKind::InvalidData, e.to_string()),
                ))
            }
        }
    }

    async fn write_manifest(&self, manifest: &Manifest) -> Result<(), SyncError> {
        let body = manifest.to_json()?;
        self.write_atomic(&self.manifest_path(), body.as_bytes())
            .await
    }

    async fn list_entries(&self) -> Result<Vec<String>, SyncError> {
        let mut entries = Vec::new();
        let mut dir = tokio::fs::read_dir(&self.root)
            .await
            .map_err(|e| SyncError::storage("listing cache directory", e))?;

        while let Some(entry) = dir
            .next_entry()
            .await
            .map_err(|e| SyncError::storage("listing cache directory", e))?
        {
            let file_type = entry
                .file_type()
                .await
                .map_err(|e| SyncError::storage("inspecting cache entry", e))?;
            if !file_type.is_file() {
                continue;
            }

            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if name == MANIFEST_FILE || name.starts_with('.') {
                continue;
            }
            entries.push(name);
        }

        Ok(entries)
    }

    async fn read(&self, name: &str) -> Result<Option<Vec<u8>>, SyncError> {
        let path = self.entry_path(name)?;
        match tokio::fs::read(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(SyncError::storage("reading cache entry", e)),
        }
    }

    async fn write(&self, name: &str, content: &[u8]) -> Result<(), SyncError> {
        let path = self.entry_path(name)?;
        self.write_atomic(&path, content).await
    }

    async fn delete(&self, name: &str) -> Result<(), SyncError> {
        let path = self.entry_path(name)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SyncError::storage("deleting cache entry", e)),
        }
    }
}
