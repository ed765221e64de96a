pub mod app;
pub mod config;
pub mod error;
pub mod room;
pub mod signaling;

pub use app::*;
pub use config::*;
pub use error::RegistryError;
pub use room::*;
pub use signaling::*;
