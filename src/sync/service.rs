// SPDX-License-Identifier: GPL-3.0-only
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{error, info, warn};

use crate::error::SyncError;
use crate::fetcher::PackageFetcher;
use crate::manifest::Manifest;
use crate::reconcile::reconcile;
use crate::status::{StatusEvent, StatusReporter};
use crate::store::CacheStore;
use crate::sync::session::{SyncPhase, SyncSession};

/// Result of a successful synchronization session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOutcome {
    /// Every package of the new manifest, in document order. This is the
    /// mount list handed to the embedding host.
    pub packages: Vec<String>,

    /// Packages actually transferred this session.
    pub downloaded: usize,

    /// Orphaned packages removed from the cache.
    pub removed: usize,
}

/// Drives a synchronization session: fetch the remote manifest, reconcile
/// against the local cache, download changed packages strictly one at a
/// time, then commit (orphan deletion, manifest swap) only after every
/// download succeeded.
pub struct SyncService {
    store: Arc<dyn CacheStore>,
    fetcher: Arc<dyn PackageFetcher>,
    reporter: Arc<dyn StatusReporter>,
    session: Arc<Mutex<SyncSession>>,
}

impl SyncService {
    pub fn new(
        store: Arc<dyn CacheStore>,
        fetcher: Arc<dyn PackageFetcher>,
        reporter: Arc<dyn StatusReporter>,
    ) -> Self {
        Self {
            store,
            fetcher,
            reporter,
            session: Arc::new(Mutex::new(SyncSession::new())),
        }
    }

    pub fn phase(&self) -> SyncPhase {
        self.lock_session().phase()
    }

    /// Run one full synchronization session.
    ///
    /// Refuses re-entry while a session is in flight. On failure the session
    /// ends in `Failed` with prior cache state intact: no orphan deletion
    /// and no manifest swap have happened yet, and partially transferred
    /// packages were never written.
    pub async fn synchronize(&self) -> Result<SyncOutcome, SyncError> {
        {
            let mut session = self.lock_session();
            if !session.phase().can_start() {
                return Err(SyncError::SessionBusy);
            }
            session.enter(SyncPhase::FetchingManifest);
        }
        self.reporter.report(StatusEvent::Checking);

        match self.run().await {
            Ok(outcome) => {
                self.enter(SyncPhase::Ready);
                self.reporter.report(StatusEvent::Ready);
                info!(
                    packages = outcome.packages.len(),
                    downloaded = outcome.downloaded,
                    removed = outcome.removed,
                    "Synchronization complete"
                );
                Ok(outcome)
            }
            Err(e) => {
                let failed_package = self.lock_session().current_package().map(str::to_string);
                self.enter(SyncPhase::Failed);
                match failed_package {
                    Some(package) => {
                        error!(error = %e, package = %package, "Synchronization failed")
                    }
                    None => error!(error = %e, "Synchronization failed"),
                }
                self.reporter.report(StatusEvent::Failed {
                    reason: e.to_string(),
                });
                Err(e)
            }
        }
    }

    async fn run(&self) -> Result<SyncOutcome, SyncError> {
        let remote = self.fetcher.fetch_manifest().await?;

        // Read-side storage errors are soft: degrade to an empty cache
        // rather than failing the session.
        let local = match self.store.load_manifest().await {
            Ok(manifest) => manifest,
            Err(e) => {
                warn!(error = %e, "Local manifest unavailable, treating cache as empty");
                Manifest::new()
            }
        };
        let cached: HashSet<String> = match self.store.list_entries().await {
            Ok(entries) => entries.into_iter().collect(),
            Err(e) => {
                warn!(error = %e, "Cache listing unavailable, skipping orphan detection");
                HashSet::new()
            }
        };

        self.enter(SyncPhase::Reconciling);
        let plan = reconcile(&local, &remote, &cached);
        info!(
            downloads = plan.downloads.len(),
            orphans = plan.orphans.len(),
            "Update plan computed"
        );

        self.enter(SyncPhase::Downloading);
        let mut downloaded = 0;
        for name in &plan.downloads {
            self.lock_session().begin_package(name);
            self.reporter.report(StatusEvent::Downloading {
                package: name.clone(),
                percent: None,
            });

            let session = Arc::clone(&self.session);
            let reporter = Arc::clone(&self.reporter);
            let package = name.clone();
            let progress = move |loaded: u64, total: Option<u64>| {
                let changed = session
                    .lock()
                    .unwrap_or_else(|e| e.into_inner())
                    .record_progress(loaded, total);
                if let Some(percent) = changed {
                    reporter.report(StatusEvent::Downloading {
                        package: package.clone(),
                        percent: Some(percent),
                    });
                }
            };

            let content = self.fetcher.fetch_package(name, &progress).await?;
            self.store.write(name, &content).await?;
            info!(package = %name, bytes = content.len(), "Package downloaded");
            downloaded += 1;
        }

        // Commit phase: nothing below runs unless every download succeeded.
        for name in &plan.orphans {
            info!(package = %name, "Deleting orphaned package");
            self.store.delete(name).await?;
        }

        self.store.write_manifest(&remote).await?;

        Ok(SyncOutcome {
            packages: remote.names().map(str::to_string).collect(),
            downloaded,
            removed: plan.orphans.len(),
        })
    }

    fn enter(&self, phase: SyncPhase) {
        self.lock_session().enter(phase);
    }

    fn lock_session(&self) -> MutexGuard<'_, SyncSession> {
        self.session.lock().unwrap_or_else(|e| e.into_inner())
    }
}
