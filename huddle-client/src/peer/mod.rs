mod rtc_connector;

pub use rtc_connector::*;

use async_trait::async_trait;
use bytes::Bytes;
use huddle_core::MemberId;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::mpsc;

/// What a peer connection reports back to the link that owns it.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// A local ICE candidate, already in its JSON wire form.
    LocalCandidate(Value),
    ChannelOpen,
    ChannelMessage(Bytes),
    ChannelClosed,
    ConnectionFailed,
}

/// Creates one peer connection per remote member.
#[async_trait]
pub trait PeerConnector: Send + Sync {
    async fn connect(
        &self,
        remote: MemberId,
        events: mpsc::UnboundedSender<SessionEvent>,
    ) -> anyhow::Result<Arc<dyn PeerSession>>;
}

/// One peer connection with at most one application data channel.
///
/// Descriptions and candidates are passed as the JSON values carried by
/// signaling frames and are never inspected by the coordinator.
#[async_trait]
pub trait PeerSession: Send + Sync {
    async fn create_data_channel(&self, label: &str) -> anyhow::Result<()>;

    /// Creates an offer and applies it as the local description.
    async fn create_offer(&self) -> anyhow::Result<Value>;

    /// Creates an answer and applies it as the local description.
    async fn create_answer(&self) -> anyhow::Result<Value>;

    async fn set_remote_description(&self, description: Value) -> anyhow::Result<()>;

    async fn add_ice_candidate(&self, candidate: Value) -> anyhow::Result<()>;

    async fn send_text(&self, text: &str) -> anyhow::Result<()>;

    async fn close(&self) -> anyhow::Result<()>;
}
