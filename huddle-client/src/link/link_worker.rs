use crate::link::NegotiationState;
use crate::link::peer_link::advance;
use crate::peer::{PeerSession, SessionEvent};
use crate::signaling::{MessageHandler, SignalingSink};
use anyhow::Result;
use huddle_core::{ChatMessage, ClientSignal, MemberId};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

/// Work handed to a link by the coordinator, applied strictly in order.
#[derive(Debug)]
pub(crate) enum LinkStep {
    Initiate,
    ApplyOffer(Value),
    ApplyAnswer(Value),
    AddCandidate(Value),
}

#[derive(Clone)]
pub(crate) struct LinkContext {
    pub sink: Arc<dyn SignalingSink>,
    pub handler: Arc<dyn MessageHandler>,
    pub channel_label: String,
}

pub(crate) struct LinkWorker {
    remote: MemberId,
    session: Arc<dyn PeerSession>,
    state: Arc<watch::Sender<NegotiationState>>,
    steps_rx: mpsc::UnboundedReceiver<LinkStep>,
    events_rx: mpsc::UnboundedReceiver<SessionEvent>,
    ctx: LinkContext,
    remote_applied: bool,
    channel_open: bool,
    /// Candidates that arrived before any remote description.
    pending_candidates: Vec<Value>,
}

impl LinkWorker {
    pub(crate) fn new(
        remote: MemberId,
        session: Arc<dyn PeerSession>,
        state: Arc<watch::Sender<NegotiationState>>,
        steps_rx: mpsc::UnboundedReceiver<LinkStep>,
        events_rx: mpsc::UnboundedReceiver<SessionEvent>,
        ctx: LinkContext,
    ) -> Self {
        Self {
            remote,
            session,
            state,
            steps_rx,
            events_rx,
            ctx,
            remote_applied: false,
            channel_open: false,
            pending_candidates: Vec::new(),
        }
    }

    pub(crate) async fn run(mut self) {
        debug!("Link worker for {} started", self.remote);

        loop {
            let keep_going = tokio::select! {
                step = self.steps_rx.recv() => match step {
                    Some(step) => self.apply_step(step).await,
                    None => false,
                },
                event = self.events_rx.recv() => match event {
                    Some(event) => self.on_session_event(event).await,
                    None => false,
                },
            };

            if !keep_going || self.current().is_closed() {
                break;
            }
        }

        advance(&self.state, NegotiationState::Closed);
        if let Err(e) = self.session.close().await {
            debug!("Closing session with {} failed: {:#}", self.remote, e);
        }
        debug!("Link worker for {} finished", self.remote);
    }

    fn current(&self) -> NegotiationState {
        *self.state.borrow()
    }

    async fn apply_step(&mut self, step: LinkStep) -> bool {
        let result = match step {
            LinkStep::Initiate => self.initiate().await,
            LinkStep::ApplyOffer(offer) => self.apply_offer(offer).await,
            LinkStep::ApplyAnswer(answer) => self.apply_answer(answer).await,
            LinkStep::AddCandidate(candidate) => {
                self.add_candidate(candidate).await;
                Ok(())
            }
        };

        if let Err(e) = result {
            warn!("Negotiation with {} failed: {:#}", self.remote, e);
            advance(&self.state, NegotiationState::Closed);
            return false;
        }
        true
    }

    async fn initiate(&mut self) -> Result<()> {
        self.session
            .create_data_channel(&self.ctx.channel_label)
            .await?;
        let offer = self.session.create_offer().await?;
        advance(&self.state, NegotiationState::HasLocalOffer);

        self.ctx
            .sink
            .send(ClientSignal::Offer {
                target: self.remote,
                offer,
            })
            .await?;
        info!("Sent offer to {}", self.remote);
        Ok(())
    }

    async fn apply_offer(&mut self, offer: Value) -> Result<()> {
        let previous = self.current();
        if previous != NegotiationState::New {
            info!("Renegotiating with {} (was {})", self.remote, previous);
        }

        self.session.set_remote_description(offer).await?;
        self.remote_applied = true;
        advance(&self.state, NegotiationState::HasRemoteOffer);
        self.flush_candidates().await;

        let answer = self.session.create_answer().await?;
        let next = if self.channel_open {
            NegotiationState::ChannelOpen
        } else {
            NegotiationState::HasLocalAnswer
        };
        advance(&self.state, next);

        self.ctx
            .sink
            .send(ClientSignal::Answer {
                target: self.remote,
                answer,
            })
            .await?;
        info!("Sent answer to {}", self.remote);
        Ok(())
    }

    async fn apply_answer(&mut self, answer: Value) -> Result<()> {
        let current = self.current();
        if current != NegotiationState::HasLocalOffer {
            warn!(
                "Ignoring answer from {} while link is {}",
                self.remote, current
            );
            return Ok(());
        }

        self.session.set_remote_description(answer).await?;
        self.remote_applied = true;
        advance(&self.state, NegotiationState::HasRemoteAnswer);
        self.flush_candidates().await;
        Ok(())
    }

    async fn add_candidate(&mut self, candidate: Value) {
        if !self.remote_applied {
            debug!("Holding ICE candidate from {} until remote description", self.remote);
            self.pending_candidates.push(candidate);
            return;
        }

        if let Err(e) = self.session.add_ice_candidate(candidate).await {
            warn!("Failed to add ICE candidate from {}: {:#}", self.remote, e);
        }
    }

    async fn flush_candidates(&mut self) {
        for candidate in std::mem::take(&mut self.pending_candidates) {
            self.add_candidate(candidate).await;
        }
    }

    async fn on_session_event(&mut self, event: SessionEvent) -> bool {
        match event {
            SessionEvent::LocalCandidate(candidate) => {
                let signal = ClientSignal::IceCandidate {
                    target: self.remote,
                    candidate,
                };
                if let Err(e) = self.ctx.sink.send(signal).await {
                    warn!("Failed to send ICE candidate to {}: {:#}", self.remote, e);
                }
                true
            }

            SessionEvent::ChannelOpen => {
                if !self.channel_open {
                    self.channel_open = true;
                    advance(&self.state, NegotiationState::ChannelOpen);
                    info!("Data channel with {} is open", self.remote);
                }
                true
            }

            SessionEvent::ChannelMessage(data) => {
                match serde_json::from_slice::<ChatMessage>(&data) {
                    Ok(message) => self.ctx.handler.on_message(&self.remote, message),
                    Err(e) => warn!("Dropped malformed message from {}: {}", self.remote, e),
                }
                true
            }

            SessionEvent::ChannelClosed => {
                info!("Data channel with {} closed", self.remote);
                self.channel_open = false;
                false
            }

            SessionEvent::ConnectionFailed => {
                warn!("Connection with {} failed", self.remote);
                false
            }
        }
    }
}
