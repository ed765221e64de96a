use crate::signaling::SignalingOutput;
use async_trait::async_trait;
use axum::extract::ws::Message;
use dashmap::DashMap;
use huddle_core::{MemberId, ServerSignal};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error};

struct SignalingInner {
    connections: DashMap<MemberId, mpsc::UnboundedSender<Message>>,
}

/// Live WebSocket connections keyed by the member id assigned on upgrade.
#[derive(Clone)]
pub struct SignalingService {
    inner: Arc<SignalingInner>,
}

impl SignalingService {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(SignalingInner {
                connections: DashMap::new(),
            }),
        }
    }

    pub fn add_connection(&self, member_id: MemberId, tx: mpsc::UnboundedSender<Message>) {
        self.inner.connections.insert(member_id, tx);
    }

    pub fn remove_connection(&self, member_id: &MemberId) {
        self.inner.connections.remove(member_id);
    }

    pub fn is_connected(&self, member_id: &MemberId) -> bool {
        self.inner.connections.contains_key(member_id)
    }

    pub fn connection_count(&self) -> usize {
        self.inner.connections.len()
    }

    pub fn send(&self, member_id: MemberId, signal: &ServerSignal) -> bool {
        let Some(connection) = self.inner.connections.get(&member_id) else {
            debug!("No connection for {}, frame dropped", member_id);
            return false;
        };

        match serde_json::to_string(signal) {
            Ok(json) => {
                if let Err(e) = connection.send(Message::Text(json.into())) {
                    error!("Failed to queue WS message to {}: {:?}", member_id, e);
                    return false;
                }
                true
            }
            Err(e) => {
                error!("Failed to serialize server signal: {}", e);
                false
            }
        }
    }
}

impl Default for SignalingService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SignalingOutput for SignalingService {
    async fn send_signal(&self, member_id: MemberId, signal: ServerSignal) -> bool {
        self.send(member_id, &signal)
    }
}
