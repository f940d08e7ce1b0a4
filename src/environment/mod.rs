//! # Environments
//!
//! [`Environment`] is what the training and evaluation loops step through.
//! Its lifecycle is explicit: construct, `reset`/`step` for as many episodes
//! as needed, then `close`. Using an environment after `close` is an error.
//!
//! [`BananaCollector`] is the bundled simulation: an agent in a walled square
//! arena collects yellow bananas (+1) and avoids blue ones (-1).

use ndarray::Array1;

use crate::error::Result;

pub mod banana;

pub use banana::{BananaCollector, BananaConfig};

/// Result of applying one action.
#[derive(Clone, Debug, PartialEq)]
pub struct StepOutcome {
    pub next_state: Array1<f32>,
    pub reward: f32,
    pub done: bool,
}

pub trait Environment {
    /// Length of every state vector.
    fn state_size(&self) -> usize;

    /// Number of discrete actions; valid actions are `0..action_size()`.
    fn action_size(&self) -> usize;

    /// Start a new episode and return its first state.
    fn reset(&mut self) -> Result<Array1<f32>>;

    /// Apply `action` and advance by one step.
    fn step(&mut self, action: usize) -> Result<StepOutcome>;

    /// Release the environment.
    fn close(&mut self) -> Result<()>;
}
