//! # banana-dqn - Deep Q-Learning for the Banana collection task
//!
//! Trains a small dense Q-network with epsilon-greedy Deep Q-Learning against
//! a simulated banana arena, saves the learned weights to a checkpoint,
//! replays the checkpoint greedily, and plots the scores.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use banana_dqn::agent::{AgentConfig, DqnAgent};
//! use banana_dqn::environment::{BananaCollector, BananaConfig, Environment};
//! use banana_dqn::training::{train, TrainingConfig};
//!
//! let mut env = BananaCollector::new(BananaConfig::default()).unwrap();
//! let mut agent = DqnAgent::new(env.state_size(), env.action_size(), AgentConfig::default()).unwrap();
//! let history = train(&mut env, &mut agent, &TrainingConfig::default(), Path::new("checkpoint.bin")).unwrap();
//! println!("{} episodes", history.scores.len());
//! ```
//!
//! ## Module Organization
//!
//! - [`activations`] - Activation functions for the dense layers
//! - [`agent`] - The [`agent::Agent`] seam and the DQN learner
//! - [`checkpoint`] - Saving and loading network parameters
//! - [`config`] - JSON run configuration
//! - [`environment`] - The [`environment::Environment`] seam and the banana arena
//! - [`episode`] - The per-episode interaction loop
//! - [`error`] - Error types and result handling
//! - [`evaluation`] - Greedy evaluation and watching
//! - [`layers`] - Dense layers
//! - [`metrics`] - Score window and summary statistics
//! - [`network`] - Feed-forward Q-network
//! - [`optimizer`] - SGD and Adam
//! - [`replay_buffer`] - Experience replay
//! - [`training`] - The training loop and epsilon schedule
//! - [`visualization`] - Score plots and reports

pub mod activations;
pub mod agent;
pub mod checkpoint;
pub mod config;
pub mod environment;
pub mod episode;
pub mod error;
pub mod evaluation;
pub mod layers;
pub mod metrics;
pub mod network;
pub mod optimizer;
pub mod replay_buffer;
pub mod training;
pub mod visualization;

#[cfg(test)]
mod tests;
