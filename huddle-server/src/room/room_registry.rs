use crate::error::RegistryError;
use crate::room::registry_worker::RegistryWorker;
use crate::room::room_command::RoomCommand;
use crate::signaling::SignalingOutput;
use huddle_core::{ClientSignal, MemberId, RoomId, SignalingEnvelope};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

const COMMAND_BUFFER: usize = 256;

/// Handle to the room registry. Cheap to clone; one per connection task.
#[derive(Clone)]
pub struct RoomRegistry {
    command_tx: mpsc::Sender<RoomCommand>,
    signaling: Arc<dyn SignalingOutput>,
}

impl RoomRegistry {
    /// Starts the registry worker on the current tokio runtime.
    pub fn spawn(signaling: Arc<dyn SignalingOutput>) -> Self {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let worker = RegistryWorker::new(command_rx, signaling.clone());
        tokio::spawn(worker.run());

        Self {
            command_tx,
            signaling,
        }
    }

    /// Adds `member_id` to `room_id` and returns the members that were already there.
    ///
    /// The joiner is sent `users-in-room`; every existing member is sent `user-joined`.
    pub async fn join(
        &self,
        member_id: MemberId,
        room_id: RoomId,
    ) -> Result<Vec<MemberId>, RegistryError> {
        validate_member(&member_id)?;
        if room_id.is_empty() {
            return Err(RegistryError::EmptyRoomId);
        }

        self.request(|reply| RoomCommand::Join {
            member_id,
            room_id,
            reply,
        })
        .await
    }

    /// Removes the member from its room, if any. Safe to call repeatedly.
    pub async fn leave(&self, member_id: MemberId) -> Result<bool, RegistryError> {
        validate_member(&member_id)?;
        self.request(|reply| RoomCommand::Leave { member_id, reply })
            .await
    }

    /// Forwards an envelope to its target with `sender` as the origin.
    ///
    /// Returns whether the target had a live connection. A miss is not an error
    /// and nothing is reported back to the sender.
    pub async fn route(&self, sender: MemberId, envelope: SignalingEnvelope) -> bool {
        let kind = envelope.kind;
        let target = envelope.target;
        let delivered = self
            .signaling
            .send_signal(target, envelope.deliver_from(sender))
            .await;

        if !delivered {
            debug!("Dropped {} from {} to unknown target {}", kind, sender, target);
        }
        delivered
    }

    /// Applies one client frame on behalf of the connection identified by `sender`.
    pub async fn handle_signal(
        &self,
        sender: MemberId,
        signal: ClientSignal,
    ) -> Result<(), RegistryError> {
        match signal {
            ClientSignal::JoinRoom(room_id) => {
                self.join(sender, room_id).await?;
            }
            ClientSignal::LeaveRoom => {
                self.leave(sender).await?;
            }
            relayed => {
                if let Some(envelope) = SignalingEnvelope::from_client(relayed)? {
                    self.route(sender, envelope).await;
                }
            }
        }
        Ok(())
    }

    pub async fn members(&self, room_id: RoomId) -> Result<Vec<MemberId>, RegistryError> {
        self.request(|reply| RoomCommand::Members { room_id, reply })
            .await
    }

    pub async fn room_count(&self) -> Result<usize, RegistryError> {
        self.request(|reply| RoomCommand::RoomCount { reply }).await
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> RoomCommand,
    ) -> Result<T, RegistryError> {
        let (reply, rx) = oneshot::channel();
        self.command_tx
            .send(build(reply))
            .await
            .map_err(|_| RegistryError::Closed)?;
        rx.await.map_err(|_| RegistryError::Closed)
    }
}

fn validate_member(member_id: &MemberId) -> Result<(), RegistryError> {
    if member_id.0.is_nil() {
        return Err(RegistryError::MissingMemberId);
    }
    Ok(())
}
