// SPDX-License-Identifier: GPL-3.0-only
use async_trait::async_trait;

use crate::error::SyncError;
use crate::manifest::Manifest;

/// Persistent package cache: one content blob per package name plus the
/// persisted manifest record. No network access; side effects are confined
/// to storage.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Read the persisted manifest.
    ///
    /// A missing record is not an error and yields an empty manifest; only
    /// storage failures (including an unreadable record) are reported.
    async fn load_manifest(&self) -> Result<Manifest, SyncError>;

    /// Persist the manifest atomically relative to readers: a concurrent
    /// reader sees either the old or the new record, never a partial write.
    async fn write_manifest(&self, manifest: &Manifest) -> Result<(), SyncError>;

    /// Names of all cached packages, excluding the manifest record.
    async fn list_entries(&self) -> Result<Vec<String>, SyncError>;

    /// Content of a cached package, or `None` when absent.
    async fn read(&self, name: &str) -> Result<Option<Vec<u8>>, SyncError>;

    /// Store or overwrite a package's content verbatim.
    async fn write(&self, name: &str, content: &[u8]) -> Result<(), SyncError>;

    /// Remove a cached package. Deleting an absent entry is not an error.
    async fn delete(&self, name: &str) -> Result<(), SyncError>;
}
