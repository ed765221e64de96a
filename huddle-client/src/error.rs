use huddle_core::MemberId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoordinatorError {
    #[error("room id is empty")]
    EmptyRoomId,

    #[error("failed to create peer connection for {remote}")]
    Connect {
        remote: MemberId,
        #[source]
        source: anyhow::Error,
    },

    #[error("signaling channel is unavailable")]
    Signaling(#[source] anyhow::Error),
}
