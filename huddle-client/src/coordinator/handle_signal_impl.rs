use crate::Coordinator;
use crate::error::CoordinatorError;
use crate::link::{Discovery, LinkStep, NegotiationState, Role};
use huddle_core::{MemberId, ServerSignal};
use serde_json::Value;
use tracing::{debug, info, warn};

impl Coordinator {
    /// Applies one frame from the signaling server.
    ///
    /// A link that cannot be created is logged and skipped; the other members
    /// of the room are still negotiated with.
    pub async fn handle_signal(&self, signal: ServerSignal) -> Result<(), CoordinatorError> {
        match signal {
            ServerSignal::Welcome { member_id } => {
                info!("Assigned member id {}", member_id);
                self.inner.local_id.send_replace(Some(member_id));
            }

            ServerSignal::UsersInRoom(members) => {
                info!("Room has {} other member(s)", members.len());
                for remote in members {
                    if let Err(e) = self.discover(remote, Discovery::RoomSnapshot).await {
                        warn!("Skipping member {}: {:#}", remote, e);
                    }
                }
            }

            ServerSignal::UserJoined(remote) => {
                if let Err(e) = self.discover(remote, Discovery::PeerJoined).await {
                    warn!("Skipping member {}: {:#}", remote, e);
                }
            }

            ServerSignal::UserLeft(remote) => {
                info!("Member {} left", remote);
                self.close_link(&remote);
                self.take_buffered(&remote);
            }

            ServerSignal::Offer { offer, sender } => {
                if let Err(e) = self.on_offer(sender, offer).await {
                    warn!("Dropped offer from {}: {:#}", sender, e);
                }
            }

            ServerSignal::Answer { answer, sender } => {
                if !self.push_step(&sender, LinkStep::ApplyAnswer(answer)) {
                    debug!("Ignoring answer from {} with no link", sender);
                }
            }

            ServerSignal::IceCandidate { candidate, sender } => {
                if !self.push_step(&sender, LinkStep::AddCandidate(candidate.clone())) {
                    self.buffer_candidate(sender, candidate);
                }
            }
        }
        Ok(())
    }

    async fn discover(&self, remote: MemberId, discovery: Discovery) -> Result<(), CoordinatorError> {
        if Some(remote) == self.local_id() {
            return Ok(());
        }

        let role = Role::for_discovery(discovery);
        let created = self.open_link(remote, role).await?;
        if created && role == Role::Initiator {
            self.push_step(&remote, LinkStep::Initiate);
        }
        Ok(())
    }

    async fn on_offer(&self, sender: MemberId, offer: Value) -> Result<(), CoordinatorError> {
        if self.link_state(&sender) == Some(NegotiationState::HasLocalOffer) {
            // Offers crossed. The higher id keeps its own offer, the lower id answers.
            if self.local_id().is_some_and(|local| local > sender) {
                debug!("Ignoring offer from {} that crossed our own", sender);
                return Ok(());
            }
            info!("Offer from {} crossed ours, answering instead", sender);
            self.close_link(&sender);
        }

        if self.push_step(&sender, LinkStep::ApplyOffer(offer.clone())) {
            return Ok(());
        }

        self.open_link(sender, Role::for_discovery(Discovery::InboundOffer))
            .await?;
        self.push_step(&sender, LinkStep::ApplyOffer(offer));
        Ok(())
    }
}
