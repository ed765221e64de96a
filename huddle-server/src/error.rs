use huddle_core::EnvelopeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("room id is empty")]
    EmptyRoomId,

    #[error("member id is missing")]
    MissingMemberId,

    #[error(transparent)]
    Envelope(#[from] EnvelopeError),

    #[error("room registry is no longer running")]
    Closed,
}
