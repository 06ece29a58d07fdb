pub mod network;
pub mod persist;
pub mod state;

pub use network::Network;
pub use state::ForwardState;
