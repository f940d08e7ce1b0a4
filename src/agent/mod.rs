//! # Reinforcement Learning Agents Module
//!
//! [`Agent`] is the seam between the episode loops and the learner. The loops
//! only ever call `act`, `step` and the checkpoint methods, so tests can drive
//! them with scripted agents.
//!
//! [`DqnAgent`] is the Deep Q-Network learner:
//! - local and target Q-networks of identical shape
//! - uniform experience replay
//! - Adam (or plain SGD) on the local network every `update_every` steps
//! - soft target updates with rate `tau`
//!
//! ```rust
//! use banana_dqn::agent::{Agent, AgentConfig, DqnAgent};
//! use ndarray::Array1;
//!
//! let mut agent = DqnAgent::new(37, 4, AgentConfig::default()).unwrap();
//! let state = Array1::<f32>::zeros(37);
//! let action = agent.act(state.view(), 0.1).unwrap();
//! assert!(action < 4);
//! ```

pub mod traits;

mod dqn;
pub use dqn::{AgentConfig, DqnAgent};
pub use traits::Agent;
