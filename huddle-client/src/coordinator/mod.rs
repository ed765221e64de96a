use crate::config::CoordinatorConfig;
use crate::link::{LinkContext, LinkSnapshot, NegotiationState, PeerLink, Role};
use crate::peer::PeerConnector;
use crate::signaling::{MessageHandler, SignalingSink};
use dashmap::DashMap;
use huddle_core::{MemberId, RoomId};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

mod broadcast_impl;
mod handle_signal_impl;
mod membership_impl;
mod open_link_impl;

struct CoordinatorInner {
    local_id: watch::Sender<Option<MemberId>>,
    room: watch::Sender<Option<RoomId>>,
    links: DashMap<MemberId, PeerLink>,
    /// ICE candidates from members we have no link with yet.
    early_candidates: DashMap<MemberId, Vec<Value>>,
    connector: Arc<dyn PeerConnector>,
    ctx: LinkContext,
    config: CoordinatorConfig,
}

/// Client-side owner of every [`PeerLink`].
///
/// Server frames must be fed to [`handle_signal`](Self::handle_signal) in
/// arrival order from a single task; link creation relies on that ordering.
#[derive(Clone)]
pub struct Coordinator {
    inner: Arc<CoordinatorInner>,
}

impl Coordinator {
    pub fn new(
        connector: Arc<dyn PeerConnector>,
        sink: Arc<dyn SignalingSink>,
        handler: Arc<dyn MessageHandler>,
        config: CoordinatorConfig,
    ) -> Self {
        let (local_id, _) = watch::channel(None);
        let (room, _) = watch::channel(None);

        Self {
            inner: Arc::new(CoordinatorInner {
                local_id,
                room,
                links: DashMap::new(),
                early_candidates: DashMap::new(),
                connector,
                ctx: LinkContext {
                    sink,
                    handler,
                    channel_label: config.channel_label.clone(),
                },
                config,
            }),
        }
    }

    /// Member id assigned by the server, known after `welcome`.
    pub fn local_id(&self) -> Option<MemberId> {
        *self.inner.local_id.borrow()
    }

    pub fn current_room(&self) -> Option<RoomId> {
        self.inner.room.borrow().clone()
    }

    /// Waits until the server has assigned a member id.
    pub async fn wait_for_welcome(&self, timeout: Duration) -> Option<MemberId> {
        let mut rx = self.inner.local_id.subscribe();
        let id = tokio::time::timeout(timeout, rx.wait_for(Option::is_some))
            .await
            .ok()?
            .ok()?;
        *id
    }

    pub fn link_state(&self, remote: &MemberId) -> Option<NegotiationState> {
        self.inner.links.get(remote).map(|link| link.state())
    }

    pub fn link_role(&self, remote: &MemberId) -> Option<Role> {
        self.inner.links.get(remote).map(|link| link.role())
    }

    pub fn peers(&self) -> Vec<LinkSnapshot> {
        self.inner
            .links
            .iter()
            .map(|entry| entry.value().snapshot())
            .collect()
    }

    pub fn open_peer_count(&self) -> usize {
        self.inner
            .links
            .iter()
            .filter(|entry| entry.value().state() == NegotiationState::ChannelOpen)
            .count()
    }

    /// Waits until the link to `remote` reaches `state`. Returns `false` on timeout
    /// or if there is no such link.
    pub async fn wait_for_state(
        &self,
        remote: &MemberId,
        state: NegotiationState,
        timeout: Duration,
    ) -> bool {
        let Some(mut rx) = self.inner.links.get(remote).map(|link| link.subscribe()) else {
            return false;
        };

        matches!(
            tokio::time::timeout(timeout, rx.wait_for(|current| *current == state)).await,
            Ok(Ok(_))
        )
    }
}
