use huddle_core::{MemberId, RoomId};
use tokio::sync::oneshot;

/// Membership commands handled by the registry worker, one at a time.
#[derive(Debug)]
pub enum RoomCommand {
    /// Add a member to a room. Replies with the members that were already there.
    Join {
        member_id: MemberId,
        room_id: RoomId,
        reply: oneshot::Sender<Vec<MemberId>>,
    },

    /// Explicit leave or dropped connection. Replies `true` if a membership was removed.
    Leave {
        member_id: MemberId,
        reply: oneshot::Sender<bool>,
    },

    Members {
        room_id: RoomId,
        reply: oneshot::Sender<Vec<MemberId>>,
    },

    RoomCount { reply: oneshot::Sender<usize> },
}
