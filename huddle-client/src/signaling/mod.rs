mod ws_signaling;

pub use ws_signaling::*;

use async_trait::async_trait;
use huddle_core::{ChatMessage, ClientSignal, MemberId};
use tokio::sync::mpsc;

/// Outbound half of the signaling transport as seen by the coordinator.
#[async_trait]
pub trait SignalingSink: Send + Sync {
    async fn send(&self, signal: ClientSignal) -> anyhow::Result<()>;
}

#[async_trait]
impl SignalingSink for mpsc::UnboundedSender<ClientSignal> {
    async fn send(&self, signal: ClientSignal) -> anyhow::Result<()> {
        mpsc::UnboundedSender::send(self, signal)
            .map_err(|_| anyhow::anyhow!("signaling channel closed"))
    }
}

/// Receives application messages from open data channels.
///
/// `from` is the link the message arrived on; `message.sender` is what the
/// remote peer claims and is passed through untouched.
pub trait MessageHandler: Send + Sync {
    fn on_message(&self, from: &MemberId, message: ChatMessage);
}

impl MessageHandler for mpsc::UnboundedSender<(MemberId, ChatMessage)> {
    fn on_message(&self, from: &MemberId, message: ChatMessage) {
        let _ = self.send((*from, message));
    }
}
