// SPDX-License-Identifier: GPL-3.0-only
use std::collections::HashSet;

use tracing::debug;

use crate::manifest::Manifest;

/// Ephemeral result of diffing local state against the remote manifest.
/// Recomputed on every synchronization pass, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdatePlan {
    /// Packages to (re)download, in remote-manifest document order.
    pub downloads: Vec<String>,

    /// Cached packages absent from the remote manifest, sorted so the
    /// deletion order is deterministic.
    pub orphans: Vec<String>,
}

impl UpdatePlan {
    pub fn is_empty(&self) -> bool {
        self.downloads.is_empty() && self.orphans.is_empty()
    }
}

/// Diff the local manifest and cached entry set against the remote manifest.
///
/// A package is downloaded when it is absent locally or its version token
/// differs (exact string comparison, no version ordering). A cached entry is
/// an orphan when the remote manifest no longer references it. Packages with
/// a matching token are skipped entirely.
pub fn reconcile(local: &Manifest, remote: &Manifest, cached: &HashSet<String>) -> UpdatePlan {
    let mut downloads = Vec::new();
    for entry in remote.iter() {
        if local.get(&entry.name) == Some(entry.version.as_str()) {
            debug!(package = %entry.name, "Package up to date");
        } else {
            downloads.push(entry.name.clone());
        }
    }

    let mut orphans: Vec<String> = cached
        .iter()
        .filter(|name| !remote.contains(name.as_str()))
        .cloned()
        .collect();
    orphans.sort();

    UpdatePlan { downloads, orphans }
}
