mod link_worker;
mod peer_link;

pub use peer_link::*;

pub(crate) use link_worker::{LinkContext, LinkStep};

use huddle_core::MemberId;
use std::fmt;

/// How the local client learned about a remote member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Discovery {
    /// Listed in the `users-in-room` reply to our own join.
    RoomSnapshot,
    /// Announced by `user-joined` after we were already in the room.
    PeerJoined,
    /// First heard of through an offer addressed to us.
    InboundOffer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Initiator,
    Responder,
}

impl Role {
    /// The newcomer initiates toward everyone already present; everyone else waits.
    pub fn for_discovery(discovery: Discovery) -> Self {
        match discovery {
            Discovery::RoomSnapshot => Role::Initiator,
            Discovery::PeerJoined | Discovery::InboundOffer => Role::Responder,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NegotiationState {
    New,
    HasLocalOffer,
    HasRemoteAnswer,
    HasRemoteOffer,
    HasLocalAnswer,
    ChannelOpen,
    Closed,
}

impl NegotiationState {
    pub fn is_closed(self) -> bool {
        self == NegotiationState::Closed
    }

    /// Whether a remote description has been applied in this state.
    pub fn has_remote_description(self) -> bool {
        matches!(
            self,
            NegotiationState::HasRemoteAnswer
                | NegotiationState::HasRemoteOffer
                | NegotiationState::HasLocalAnswer
                | NegotiationState::ChannelOpen
        )
    }
}

impl fmt::Display for NegotiationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NegotiationState::New => "new",
            NegotiationState::HasLocalOffer => "has-local-offer",
            NegotiationState::HasRemoteAnswer => "has-remote-answer",
            NegotiationState::HasRemoteOffer => "has-remote-offer",
            NegotiationState::HasLocalAnswer => "has-local-answer",
            NegotiationState::ChannelOpen => "channel-open",
            NegotiationState::Closed => "closed",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkSnapshot {
    pub remote: MemberId,
    pub role: Role,
    pub state: NegotiationState,
}
