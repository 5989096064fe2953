// SPDX-License-Identifier: GPL-3.0-only
pub mod channel;
pub mod protocol;

pub use channel::{ModuleChannel, ModuleEndpoint};
pub use protocol::{HostMessage, ModuleMessage, ProtocolError};
