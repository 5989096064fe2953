// SPDX-License-Identifier: GPL-3.0-only

/// Phase of a synchronization session.
///
/// `Idle -> FetchingManifest -> Reconciling -> Downloading -> {Ready | Failed}`.
/// `Ready` and `Failed` are terminal for a session; a fresh session may be
/// started from either.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    Idle,
    FetchingManifest,
    Reconciling,
    Downloading,
    Ready,
    Failed,
}

impl SyncPhase {
    /// Whether a new session may start from this phase. Refusing re-entry
    /// elsewhere is the only concurrency control a session needs.
    pub fn can_start(self) -> bool {
        matches!(self, Self::Idle | Self::Ready | Self::Failed)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Ready | Self::Failed)
    }
}

/// Single source of truth for session state: the current phase plus the
/// in-flight download's identity and byte counters.
#[derive(Debug)]
pub struct SyncSession {
    phase: SyncPhase,
    current_package: Option<String>,
    bytes_loaded: u64,
    bytes_total: Option<u64>,
    last_percent: Option<u8>,
}

impl SyncSession {
    pub fn new() -> Self {
        Self {
            phase: SyncPhase::Idle,
            current_package: None,
            bytes_loaded: 0,
            bytes_total: None,
            last_percent: None,
        }
    }

    pub fn phase(&self) -> SyncPhase {
        self.phase
    }

    pub fn current_package(&self) -> Option<&str> {
        self.current_package.as_deref()
    }

    pub fn enter(&mut self, phase: SyncPhase) {
        self.phase = phase;
        if phase != SyncPhase::Downloading {
            self.current_package = None;
            self.reset_progress();
        }
    }

    /// Mark `name` as the package currently downloading.
    pub fn begin_package(&mut self, name: &str) {
        self.current_package = Some(name.to_string());
        self.reset_progress();
    }

    /// Record byte progress for the current download.
    ///
    /// Returns the rounded percentage when the total is known and the value
    /// changed since the last call, so the caller can report each step once.
    pub fn record_progress(&mut self, loaded: u64, total: Option<u64>) -> Option<u8> {
        self.bytes_loaded = loaded;
        self.bytes_total = total;

        let total = total.filter(|t| *t > 0)?;
        let percent = ((loaded as f64 / total as f64) * 100.0).round().min(100.0) as u8;

        if self.last_percent == Some(percent) {
            None
        } else {
            self.last_percent = Some(percent);
            Some(percent)
        }
    }

    pub fn bytes(&self) -> (u64, Option<u64>) {
        (self.bytes_loaded, self.bytes_total)
    }

    fn reset_progress(&mut self) {
        self.bytes_loaded = 0;
        self.bytes_total = None;
        self.last_percent = None;
    }
}

impl Default for SyncSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_phase_is_idle() {
        let session = SyncSession::new();
        assert_eq!(session.phase(), SyncPhase::Idle);
        assert!(session.current_package().is_none());
    }

    #[test]
    fn test_can_start_only_from_idle_ready_failed() {
        assert!(SyncPhase::Idle.can_start());
        assert!(SyncPhase::Ready.can_start());
        assert!(SyncPhase::Failed.can_start());
        assert!(!SyncPhase::FetchingManifest.can_start());
        assert!(!SyncPhase::Reconciling.can_start());
        assert!(!SyncPhase::Downloading.can_start());
    }

    #[test]
    fn test_terminal_phases() {
        assert!(SyncPhase::Ready.is_terminal());
        assert!(SyncPhase::Failed.is_terminal());
        assert!(!SyncPhase::Downloading.is_terminal());
    }

    #[test]
    fn test_record_progress_reports_changed_percent_once() {
        let mut session = SyncSession::new();
        session.begin_package("base.zip");

        assert_eq!(session.record_progress(50, Some(200)), Some(25));
        assert_eq!(session.record_progress(51, Some(200)), None); // still 25%
        assert_eq!(session.record_progress(100, Some(200)), Some(50));
        assert_eq!(session.record_progress(200, Some(200)), Some(100));
    }

    #[test]
    fn test_record_progress_without_total_reports_nothing() {
        let mut session = SyncSession::new();
        session.begin_package("base.zip");

        assert_eq!(session.record_progress(1024, None), None);
        assert_eq!(session.bytes(), (1024, None));
    }

    #[test]
    fn test_begin_package_resets_progress() {
        let mut session = SyncSession::new();
        session.begin_package("a.zip");
        session.record_progress(100, Some(100));

        session.begin_package("b.zip");
        assert_eq!(session.bytes(), (0, None));
        // 100% for the new package reports again even though the previous
        // package ended at 100%.
        assert_eq!(session.record_progress(10, Some(10)), Some(100));
    }

    #[test]
    fn test_leaving_downloading_clears_current_package() {
        let mut session = SyncSession::new();
        session.enter(SyncPhase::Downloading);
        session.begin_package("a.zip");
        assert_eq!(session.current_package(), Some("a.zip"));

        session.enter(SyncPhase::Ready);
        assert!(session.current_package().is_none());
    }
}
