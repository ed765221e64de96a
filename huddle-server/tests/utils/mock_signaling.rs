use async_trait::async_trait;
use huddle_core::{MemberId, ServerSignal};
use huddle_server::SignalingOutput;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

#[derive(Debug, Clone, PartialEq)]
pub struct SentSignal {
    pub to: MemberId,
    pub signal: ServerSignal,
}

/// Mock SignalingOutput that captures every frame addressed to a registered member.
#[derive(Clone)]
pub struct MockSignalingOutput {
    tx: mpsc::UnboundedSender<SentSignal>,
    /// Members that count as connected. Frames to anyone else are misses.
    connected: Arc<Mutex<HashSet<MemberId>>>,
    signals: Arc<Mutex<Vec<SentSignal>>>,
}

impl MockSignalingOutput {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<SentSignal>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let signaling = Self {
            tx,
            connected: Arc::new(Mutex::new(HashSet::new())),
            signals: Arc::new(Mutex::new(Vec::new())),
        };
        (signaling, rx)
    }

    /// Creates a member id that the mock treats as having a live connection.
    pub async fn connect(&self) -> MemberId {
        let member = MemberId::new();
        self.connected.lock().await.insert(member);
        member
    }

    pub async fn disconnect(&self, member: &MemberId) {
        self.connected.lock().await.remove(member);
    }

    pub async fn signals_for(&self, member: &MemberId) -> Vec<ServerSignal> {
        self.signals
            .lock()
            .await
            .iter()
            .filter(|s| &s.to == member)
            .map(|s| s.signal.clone())
            .collect()
    }

    pub async fn snapshots_for(&self, member: &MemberId) -> Vec<Vec<MemberId>> {
        self.signals_for(member)
            .await
            .into_iter()
            .filter_map(|s| match s {
                ServerSignal::UsersInRoom(existing) => Some(existing),
                _ => None,
            })
            .collect()
    }

    pub async fn joined_seen_by(&self, member: &MemberId) -> Vec<MemberId> {
        self.signals_for(member)
            .await
            .into_iter()
            .filter_map(|s| match s {
                ServerSignal::UserJoined(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    pub async fn left_seen_by(&self, member: &MemberId) -> Vec<MemberId> {
        self.signals_for(member)
            .await
            .into_iter()
            .filter_map(|s| match s {
                ServerSignal::UserLeft(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    pub async fn total(&self) -> usize {
        self.signals.lock().await.len()
    }
}

#[async_trait]
impl SignalingOutput for MockSignalingOutput {
    async fn send_signal(&self, member_id: MemberId, signal: ServerSignal) -> bool {
        if !self.connected.lock().await.contains(&member_id) {
            tracing::debug!("[MockSignaling] {} is not connected", member_id);
            return false;
        }

        let sent = SentSignal {
            to: member_id,
            signal,
        };
        self.signals.lock().await.push(sent.clone());
        let _ = self.tx.send(sent);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_signaling_captures_connected_only() {
        let (signaling, mut rx) = MockSignalingOutput::new();
        let member = signaling.connect().await;
        let stranger = MemberId::new();

        assert!(
            signaling
                .send_signal(member, ServerSignal::UserLeft(stranger))
                .await
        );
        assert!(
            !signaling
                .send_signal(stranger, ServerSignal::UserLeft(member))
                .await
        );

        let sent = rx.recv().await.unwrap();
        assert_eq!(sent.to, member);
        assert_eq!(signaling.total().await, 1);
    }
}
