use crate::model::SignalKind;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EnvelopeError {
    #[error("{kind} envelope has no payload")]
    MissingPayload { kind: SignalKind },
}
