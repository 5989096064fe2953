// SPDX-License-Identifier: GPL-3.0-only
pub mod service;
pub mod session;

pub use service::{SyncOutcome, SyncService};
pub use session::{SyncPhase, SyncSession};
