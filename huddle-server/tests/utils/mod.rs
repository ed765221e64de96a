pub mod mock_signaling;

pub use mock_signaling::*;
pub use signal_helpers::*;
pub use ws_client::*;
