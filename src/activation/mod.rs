pub mod logistic;

pub use logistic::{sigmoid, sigmoid_prime};
