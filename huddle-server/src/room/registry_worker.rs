use crate::room::room::{LeaveOutcome, RoomTable};
use crate::room::room_command::RoomCommand;
use crate::signaling::SignalingOutput;
use huddle_core::{MemberId, RoomId, ServerSignal};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Serialized owner of the room table.
///
/// Every membership change and the notifications it causes are produced
/// inside one `handle_command` call, so a joiner's `users-in-room` snapshot
/// and the `user-joined`/`user-left` frames of later changes reach clients
/// in the order the changes were applied.
pub struct RegistryWorker {
    table: RoomTable,
    command_rx: mpsc::Receiver<RoomCommand>,
    signaling: Arc<dyn SignalingOutput>,
}

impl RegistryWorker {
    pub fn new(command_rx: mpsc::Receiver<RoomCommand>, signaling: Arc<dyn SignalingOutput>) -> Self {
        Self {
            table: RoomTable::new(),
            command_rx,
            signaling,
        }
    }

    pub async fn run(mut self) {
        info!("Room registry started");

        while let Some(cmd) = self.command_rx.recv().await {
            self.handle_command(cmd).await;
        }

        info!("Command channel closed. Room registry finished");
    }

    async fn handle_command(&mut self, cmd: RoomCommand) {
        match cmd {
            RoomCommand::Join {
                member_id,
                room_id,
                reply,
            } => {
                let existing = self.join(member_id, room_id).await;
                let _ = reply.send(existing);
            }

            RoomCommand::Leave { member_id, reply } => {
                let removed = match self.table.leave(&member_id) {
                    Some(outcome) => {
                        self.notify_left(member_id, &outcome).await;
                        true
                    }
                    None => {
                        debug!("Leave for {} ignored, not in any room", member_id);
                        false
                    }
                };
                let _ = reply.send(removed);
            }

            RoomCommand::Members { room_id, reply } => {
                let _ = reply.send(self.table.members(&room_id));
            }

            RoomCommand::RoomCount { reply } => {
                let _ = reply.send(self.table.room_count());
            }
        }
    }

    async fn join(&mut self, member_id: MemberId, room_id: RoomId) -> Vec<MemberId> {
        let outcome = self.table.join(member_id, room_id.clone());

        if let Some(left) = &outcome.left {
            self.notify_left(member_id, left).await;
        }

        if outcome.newly_joined {
            info!(
                "Member {} joined room '{}' ({} already there)",
                member_id,
                room_id,
                outcome.existing.len()
            );
            for peer in &outcome.existing {
                self.signaling
                    .send_signal(*peer, ServerSignal::UserJoined(member_id))
                    .await;
            }
        } else {
            debug!("Member {} re-joined room '{}'", member_id, room_id);
        }

        self.signaling
            .send_signal(member_id, ServerSignal::UsersInRoom(outcome.existing.clone()))
            .await;

        outcome.existing
    }

    async fn notify_left(&self, member_id: MemberId, outcome: &LeaveOutcome) {
        info!("Member {} left room '{}'", member_id, outcome.room_id);

        for peer in &outcome.remaining {
            self.signaling
                .send_signal(*peer, ServerSignal::UserLeft(member_id))
                .await;
        }

        if outcome.room_closed {
            info!("Room '{}' is empty, removed", outcome.room_id);
        }
    }
}
