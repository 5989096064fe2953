// SPDX-License-Identifier: GPL-3.0-only
pub mod reporter;

pub use reporter::{ChannelReporter, NullReporter, StatusEvent, StatusReporter};
