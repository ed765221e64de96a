use async_trait::async_trait;
use huddle_core::{MemberId, ServerSignal};

/// Outbound side of the signaling server.
///
/// The registry only knows member ids; whatever owns the sockets implements this
/// to turn a frame into bytes on the right connection.
#[async_trait]
pub trait SignalingOutput: Send + Sync {
    /// Deliver one frame to one member. Returns `false` if the member has no live connection.
    async fn send_signal(&self, member_id: MemberId, signal: ServerSignal) -> bool;
}
