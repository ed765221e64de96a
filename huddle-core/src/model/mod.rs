mod member;
mod message;
mod room;
mod signaling;

pub use member::MemberId;
pub use message::ChatMessage;
pub use room::RoomId;
pub use signaling::{ClientSignal, IceServerConfig, ServerSignal, SignalKind, SignalingEnvelope};
