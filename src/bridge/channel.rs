// SPDX-License-Identifier: GPL-3.0-only
use tokio::sync::mpsc;
use tracing::warn;

use crate::bridge::protocol::{HostMessage, ModuleMessage};

/// Host side of the message channel to the embedded module.
///
/// Raw string frames cross the channel; decoding happens once here, and
/// malformed frames are dropped with a warning rather than surfaced.
pub struct ModuleChannel {
    tx: mpsc::UnboundedSender<String>,
    rx: mpsc::UnboundedReceiver<String>,
}

/// The module's side of the channel, handed to the embedding host. Frames
/// are raw wire strings; the collaborator speaks the tagged protocol
/// directly.
pub struct ModuleEndpoint {
    pub tx: mpsc::UnboundedSender<String>,
    pub rx: mpsc::UnboundedReceiver<String>,
}

impl ModuleChannel {
    /// Create a connected channel/endpoint pair.
    pub fn pair() -> (ModuleChannel, ModuleEndpoint) {
        let (host_tx, module_rx) = mpsc::unbounded_channel();
        let (module_tx, host_rx) = mpsc::unbounded_channel();

        (
            ModuleChannel {
                tx: host_tx,
                rx: host_rx,
            },
            ModuleEndpoint {
                tx: module_tx,
                rx: module_rx,
            },
        )
    }

    /// Post a message to the module. Returns false when the module side is
    /// gone.
    pub fn post(&self, message: &HostMessage) -> bool {
        self.tx.send(message.encode()).is_ok()
    }

    /// Receive the next well-formed module message, or `None` once the
    /// module side has closed.
    pub async fn recv(&mut self) -> Option<ModuleMessage> {
        while let Some(raw) = self.rx.recv().await {
            match ModuleMessage::parse(&raw) {
                Ok(message) => return Some(message),
                Err(e) => {
                    warn!(error = %e, "Dropping malformed module message");
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_post_reaches_module_endpoint() {
        let (channel, mut endpoint) = ModuleChannel::pair();

        assert!(channel.post(&HostMessage::Lang("en-US".to_string())));
        assert_eq!(endpoint.rx.recv().await, Some("lang:en-US".to_string()));
    }

    #[tokio::test]
    async fn test_recv_decodes_module_messages() {
        let (mut channel, endpoint) = ModuleChannel::pair();

        endpoint.tx.send("init:".to_string()).unwrap();
        endpoint.tx.send("quit:".to_string()).unwrap();

        assert_eq!(channel.recv().await, Some(ModuleMessage::Init));
        assert_eq!(channel.recv().await, Some(ModuleMessage::Quit));
    }

    #[tokio::test]
    async fn test_recv_skips_malformed_frames() {
        let (mut channel, endpoint) = ModuleChannel::pair();

        endpoint.tx.send("garbage".to_string()).unwrap();
        endpoint.tx.send("none:".to_string()).unwrap();

        assert_eq!(channel.recv().await, Some(ModuleMessage::HideOverlay));
    }

    #[tokio::test]
    async fn test_recv_none_after_endpoint_dropped() {
        let (mut channel, endpoint) = ModuleChannel::pair();
        drop(endpoint);

        assert_eq!(channel.recv().await, None);
    }

    #[tokio::test]
    async fn test_post_fails_after_endpoint_dropped() {
        let (channel, endpoint) = ModuleChannel::pair();
        drop(endpoint);

        assert!(!channel.post(&HostMessage::Lang("en".to_string())));
    }
}
