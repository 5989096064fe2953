// SPDX-License-Identifier: GPL-3.0-only
use tokio::sync::mpsc;

/// Externally observable synchronization status.
///
/// Ordering contract: `Checking` precedes any `Downloading`; a session ends
/// with exactly one `Ready` or `Failed`; `Downloading` events for a package
/// are contiguous and in byte order. `percent` is omitted when the transfer
/// does not report a total length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusEvent {
    Checking,
    Downloading {
        package: String,
        percent: Option<u8>,
    },
    Ready,
    Failed {
        reason: String,
    },
}

/// Relay of status events to an external observer. Pure relay, no logic;
/// implementations must not block.
pub trait StatusReporter: Send + Sync {
    fn report(&self, event: StatusEvent);
}

/// Reporter backed by an unbounded channel.
///
/// Send failures are ignored: a departed observer must not fail a
/// synchronization session.
pub struct ChannelReporter {
    tx: mpsc::UnboundedSender<StatusEvent>,
}

impl ChannelReporter {
    pub fn new(tx: mpsc::UnboundedSender<StatusEvent>) -> Self {
        Self { tx }
    }
}

impl StatusReporter for ChannelReporter {
    fn report(&self, event: StatusEvent) {
        let _ = self.tx.send(event);
    }
}

/// Reporter that discards every event.
pub struct NullReporter;

impl StatusReporter for NullReporter {
    fn report(&self, _event: StatusEvent) {}
}
