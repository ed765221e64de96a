pub mod config;
pub mod coordinator;
pub mod error;
pub mod link;
pub mod peer;
pub mod signaling;

pub use config::*;
pub use coordinator::*;
pub use error::CoordinatorError;
pub use link::*;
pub use peer::*;
pub use signaling::*;
