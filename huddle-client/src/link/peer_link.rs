use crate::link::link_worker::{LinkContext, LinkStep, LinkWorker};
use crate::link::{LinkSnapshot, NegotiationState, Role};
use crate::peer::{PeerSession, SessionEvent};
use huddle_core::MemberId;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::debug;

/// Client-side record of the connection to one remote member.
///
/// Negotiation runs on a dedicated worker task so a stalled peer never holds
/// up the others. The link only hands it steps and publishes its state.
pub struct PeerLink {
    remote: MemberId,
    role: Role,
    state: Arc<watch::Sender<NegotiationState>>,
    session: Arc<dyn PeerSession>,
    steps: mpsc::UnboundedSender<LinkStep>,
    worker: JoinHandle<()>,
}

impl PeerLink {
    pub(crate) fn spawn(
        remote: MemberId,
        role: Role,
        session: Arc<dyn PeerSession>,
        events_rx: mpsc::UnboundedReceiver<SessionEvent>,
        ctx: LinkContext,
    ) -> Self {
        let (state, _) = watch::channel(NegotiationState::New);
        let state = Arc::new(state);
        let (steps, steps_rx) = mpsc::unbounded_channel();

        let worker = LinkWorker::new(
            remote,
            session.clone(),
            state.clone(),
            steps_rx,
            events_rx,
            ctx,
        );
        let worker = tokio::spawn(worker.run());

        Self {
            remote,
            role,
            state,
            session,
            steps,
            worker,
        }
    }

    pub fn remote(&self) -> MemberId {
        self.remote
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn state(&self) -> NegotiationState {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<NegotiationState> {
        self.state.subscribe()
    }

    pub fn session(&self) -> Arc<dyn PeerSession> {
        self.session.clone()
    }

    pub fn snapshot(&self) -> LinkSnapshot {
        LinkSnapshot {
            remote: self.remote,
            role: self.role,
            state: self.state(),
        }
    }

    pub(crate) fn push(&self, step: LinkStep) -> bool {
        self.steps.send(step).is_ok()
    }

    /// Cancels in-flight negotiation and releases the peer connection.
    pub(crate) fn close(self) {
        self.worker.abort();
        advance(&self.state, NegotiationState::Closed);

        let remote = self.remote;
        let session = self.session;
        tokio::spawn(async move {
            if let Err(e) = session.close().await {
                debug!("Closing session with {} failed: {:#}", remote, e);
            }
        });
    }
}

/// Moves the published state forward. `Closed` is terminal.
pub(crate) fn advance(state: &watch::Sender<NegotiationState>, next: NegotiationState) {
    state.send_if_modified(|current| {
        if current.is_closed() || *current == next {
            return false;
        }
        *current = next;
        true
    });
}
