use crate::error::EnvelopeError;
use crate::model::member::MemberId;
use crate::model::room::RoomId;
use crate::utils::DEFAULT_STUN_SERVERS;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IceServerConfig {
    pub urls: Vec<String>,
    pub username: Option<String>,
    pub credential: Option<String>,
}

impl IceServerConfig {
    pub fn default_stun() -> Vec<Self> {
        vec![Self {
            urls: DEFAULT_STUN_SERVERS.iter().map(|s| s.to_string()).collect(),
            username: None,
            credential: None,
        }]
    }
}

/// Frames a client sends to the signaling server.
///
/// Relayed variants carry only the `target`; the server adds `sender` itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientSignal {
    JoinRoom(RoomId),
    LeaveRoom,
    Offer { target: MemberId, offer: Value },
    Answer { target: MemberId, answer: Value },
    IceCandidate { target: MemberId, candidate: Value },
}

/// Frames the signaling server sends to a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerSignal {
    Welcome {
        #[serde(rename = "memberId")]
        member_id: MemberId,
    },
    UsersInRoom(Vec<MemberId>),
    UserJoined(MemberId),
    UserLeft(MemberId),
    Offer { offer: Value, sender: MemberId },
    Answer { answer: Value, sender: MemberId },
    IceCandidate { candidate: Value, sender: MemberId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalKind {
    Offer,
    Answer,
    IceCandidate,
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalKind::Offer => f.write_str("offer"),
            SignalKind::Answer => f.write_str("answer"),
            SignalKind::IceCandidate => f.write_str("ice-candidate"),
        }
    }
}

/// A relayed negotiation payload addressed to one member.
///
/// The payload is opaque to everything except the two peer connections.
/// There is no sender field: it only comes into existence in
/// [`SignalingEnvelope::deliver_from`], which the registry calls with the
/// identity of the connection the envelope arrived on.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalingEnvelope {
    pub kind: SignalKind,
    pub target: MemberId,
    pub payload: Value,
}

impl SignalingEnvelope {
    pub fn new(kind: SignalKind, target: MemberId, payload: Value) -> Result<Self, EnvelopeError> {
        if payload.is_null() {
            return Err(EnvelopeError::MissingPayload { kind });
        }
        Ok(Self {
            kind,
            target,
            payload,
        })
    }

    /// Splits a client frame into an envelope. Membership frames yield `Ok(None)`.
    pub fn from_client(signal: ClientSignal) -> Result<Option<Self>, EnvelopeError> {
        let envelope = match signal {
            ClientSignal::Offer { target, offer } => Self::new(SignalKind::Offer, target, offer)?,
            ClientSignal::Answer { target, answer } => {
                Self::new(SignalKind::Answer, target, answer)?
            }
            ClientSignal::IceCandidate { target, candidate } => {
                Self::new(SignalKind::IceCandidate, target, candidate)?
            }
            ClientSignal::JoinRoom(_) | ClientSignal::LeaveRoom => return Ok(None),
        };
        Ok(Some(envelope))
    }

    pub fn deliver_from(self, sender: MemberId) -> ServerSignal {
        match self.kind {
            SignalKind::Offer => ServerSignal::Offer {
                offer: self.payload,
                sender,
            },
            SignalKind::Answer => ServerSignal::Answer {
                answer: self.payload,
                sender,
            },
            SignalKind::IceCandidate => ServerSignal::IceCandidate {
                candidate: self.payload,
                sender,
            },
        }
    }
}

impl From<SignalingEnvelope> for ClientSignal {
    fn from(envelope: SignalingEnvelope) -> Self {
        let target = envelope.target;
        match envelope.kind {
            SignalKind::Offer => ClientSignal::Offer {
                target,
                offer: envelope.payload,
            },
            SignalKind::Answer => ClientSignal::Answer {
                target,
                answer: envelope.payload,
            },
            SignalKind::IceCandidate => ClientSignal::IceCandidate {
                target,
                candidate: envelope.payload,
            },
        }
    }
}
