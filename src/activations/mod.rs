//! # Activation Functions Module
//!
//! Element-wise non-linearities for the dense layers of the Q-network.
//!
//! - **ReLU**: `max(0, x)`, the default for hidden layers
//! - **Linear**: identity, used by the output layer so Q-values are unbounded
//! - **Tanh**: hyperbolic tangent
//! - **LeakyReLU**: ReLU with a small negative slope
//!
//! ```rust
//! use banana_dqn::activations::Activation;
//! use ndarray::array;
//!
//! let mut batch = array![[1.0, -0.5], [0.0, 2.0]];
//! Activation::Relu.apply_batch(&mut batch);
//! assert_eq!(batch, array![[1.0, 0.0], [0.0, 2.0]]);
//! ```

pub mod functions;

pub use functions::Activation;
