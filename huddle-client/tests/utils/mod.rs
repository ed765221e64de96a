
pub use hub::*;
pub use memory_network::*;
pub use recording_peer::*;
