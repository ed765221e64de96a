use crate::Coordinator;
use crate::link::NegotiationState;
use crate::peer::PeerSession;
use huddle_core::{ChatMessage, MemberId};
use std::sync::Arc;
use tracing::{debug, warn};

impl Coordinator {
    /// Sends `text` to every peer with an open data channel.
    ///
    /// Returns `false` when nothing was delivered, in which case the caller
    /// should show the message as local only. Nothing is queued for later.
    pub async fn broadcast_message(&self, text: &str) -> bool {
        let Some(local_id) = self.local_id() else {
            debug!("No member id yet, message stays local");
            return false;
        };

        let message = ChatMessage::new(text, local_id);
        let json = match serde_json::to_string(&message) {
            Ok(json) => json,
            Err(e) => {
                warn!("Failed to encode chat message: {}", e);
                return false;
            }
        };

        // Collect first: sessions are awaited outside the map's shard locks.
        let targets: Vec<(MemberId, Arc<dyn PeerSession>)> = self
            .inner
            .links
            .iter()
            .filter(|entry| entry.value().state() == NegotiationState::ChannelOpen)
            .map(|entry| (*entry.key(), entry.value().session()))
            .collect();

        let mut delivered = 0;
        for (remote, session) in targets {
            match session.send_text(&json).await {
                Ok(()) => delivered += 1,
                Err(e) => warn!("Failed to send message to {}: {:#}", remote, e),
            }
        }

        debug!("Message delivered to {} peer(s)", delivered);
        delivered > 0
    }
}
