pub mod activation;
pub mod error;
pub mod loss;
pub mod network;
pub mod train;

// Convenience re-exports
pub use activation::{sigmoid, sigmoid_prime};
pub use error::{HematiteError, Result};
pub use loss::SquaredError;
pub use network::{ForwardState, Network};
pub use train::{EpochStats, TrainConfig, train_epoch, train_loop};
