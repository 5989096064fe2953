// SPDX-License-Identifier: GPL-3.0-only
use async_trait::async_trait;

use crate::error::SyncError;
use crate::manifest::Manifest;

/// Byte-progress callback: `(bytes_loaded, bytes_total)`. The total is
/// `None` when the transfer does not report a length.
pub type ProgressFn<'a> = &'a (dyn Fn(u64, Option<u64>) + Send + Sync);

/// Retrieval of the remote manifest and package content.
#[async_trait]
pub trait PackageFetcher: Send + Sync {
    /// Fetch the canonical manifest document.
    ///
    /// Fails with `NetworkError` or `ParseError`; never returns a partial
    /// manifest.
    async fn fetch_manifest(&self) -> Result<Manifest, SyncError>;

    /// Fetch one package's content, invoking `progress` as bytes arrive.
    ///
    /// On failure the partial body is discarded by the caller; nothing is
    /// written anywhere by the fetcher itself.
    async fn fetch_package(
        &self,
        name: &str,
        progress: ProgressFn<'_>,
    ) -> Result<Vec<u8>, SyncError>;
}
