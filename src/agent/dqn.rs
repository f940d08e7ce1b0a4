use std::path::Path;

use log::debug;
use ndarray::{Array1, Array2, ArrayView1};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::traits::Agent;
use crate::activations::Activation;
use crate::checkpoint::Checkpoint;
use crate::error::{DqnError, Result};
use crate::network::NeuralNetwork;
use crate::optimizer::OptimizerKind;
use crate::replay_buffer::{Experience, ReplayBuffer};

/// Hyperparameters of the DQN learner.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct AgentConfig {
    /// Replay memory capacity
    pub buffer_size: usize,
    /// Minibatch size
    pub batch_size: usize,
    /// Discount factor
    pub gamma: f32,
    /// Soft update rate of the target network
    pub tau: f32,
    pub learning_rate: f32,
    pub optimizer: OptimizerKind,
    /// Learn once every this many calls to `step`
    pub update_every: usize,
    /// Widths of the hidden layers
    pub hidden_layers: Vec<usize>,
    pub hidden_activation: Activation,
    /// Seeds weight init, exploration and replay sampling
    pub seed: u64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        AgentConfig {
            buffer_size: 100_000,
            batch_size: 64,
            gamma: 0.99,
            tau: 1e-3,
            learning_rate: 5e-4,
            optimizer: OptimizerKind::Adam,
            update_every: 4,
            hidden_layers: vec![64, 64],
            hidden_activation: Activation::Relu,
            seed: 0,
        }
    }
}

impl AgentConfig {
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(DqnError::invalid_parameter("batch_size", "must be positive"));
        }
        if self.buffer_size < self.batch_size {
            return Err(DqnError::invalid_parameter("buffer_size", "must be at least batch_size"));
        }
        if self.update_every == 0 {
            return Err(DqnError::invalid_parameter("update_every", "must be positive"));
        }
        if !(0.0..=1.0).contains(&self.gamma) {
            return Err(DqnError::invalid_parameter("gamma", "must be within [0, 1]"));
        }
        if !(0.0..=1.0).contains(&self.tau) {
            return Err(DqnError::invalid_parameter("tau", "must be within [0, 1]"));
        }
        if !(self.learning_rate > 0.0 && self.learning_rate.is_finite()) {
            return Err(DqnError::invalid_parameter("learning_rate", "must be a positive number"));
        }
        Ok(())
    }
}

/// Deep Q-Network agent with experience replay and a soft-updated target
/// network.
///
/// ```rust
/// use banana_dqn::agent::{Agent, AgentConfig, DqnAgent};
/// use ndarray::array;
///
/// let config = AgentConfig { batch_size: 2, update_every: 1, ..AgentConfig::default() };
/// let mut agent = DqnAgent::new(2, 2, config).unwrap();
/// let state = array![0.1, -0.2];
/// let action = agent.act(state.view(), 1.0).unwrap();
/// let next_state = array![0.2, -0.1];
/// agent.step(&state, action, 1.0, &next_state, false).unwrap();
/// ```
pub struct DqnAgent {
    /// Network used for acting and trained every update
    pub q_local: NeuralNetwork,

    /// Network used to compute bootstrap targets
    pub q_target: NeuralNetwork,

    pub memory: ReplayBuffer,
    pub config: AgentConfig,
    state_size: usize,
    action_size: usize,

    /// Steps since the last learning update, modulo `update_every`
    t_step: usize,

    /// Number of learning updates performed
    pub learn_steps: usize,

    rng: StdRng,
}

impl DqnAgent {
    pub fn new(state_size: usize, action_size: usize, config: AgentConfig) -> Result<Self> {
        config.validate()?;
        let mut rng = StdRng::seed_from_u64(config.seed);

        let mut layer_sizes = Vec::with_capacity(config.hidden_layers.len() + 2);
        layer_sizes.push(state_size);
        layer_sizes.extend_from_slice(&config.hidden_layers);
        layer_sizes.push(action_size);

        let mut activations = vec![config.hidden_activation; layer_sizes.len() - 2];
        activations.push(Activation::Linear);

        let q_local = NeuralNetwork::new(&layer_sizes, &activations, config.optimizer.build(), &mut rng)?;
        let q_target = q_local.clone();
        let memory = ReplayBuffer::new(config.buffer_size, config.seed.wrapping_add(1));

        Ok(DqnAgent {
            q_local,
            q_target,
            memory,
            config,
            state_size,
            action_size,
            t_step: 0,
            learn_steps: 0,
            rng,
        })
    }

    pub fn state_size(&self) -> usize {
        self.state_size
    }

    pub fn action_size(&self) -> usize {
        self.action_size
    }

    /// Q-values of the local network for `state`.
    pub fn q_values(&self, state: ArrayView1<f32>) -> Result<Array1<f32>> {
        self.q_local.predict(state)
    }

    /// Index of the largest Q-value; ties go to the lowest index.
    pub fn greedy_action(&self, state: ArrayView1<f32>) -> Result<usize> {
        let q_values = self.q_values(state)?;
        let mut best: Option<(usize, f32)> = None;
        for (idx, &q) in q_values.iter().enumerate() {
            if q.is_nan() {
                return Err(DqnError::NumericalError("Q-value is NaN".to_string()));
            }
            if best.map_or(true, |(_, b)| q > b) {
                best = Some((idx, q));
            }
        }
        best.map(|(idx, _)| idx)
            .ok_or_else(|| DqnError::NumericalError("No valid Q-values".to_string()))
    }

    /// Update the local network from a batch of experiences, then move the
    /// target network towards it. Returns the mean squared TD error.
    pub fn learn(&mut self, experiences: &[Experience], gamma: f32) -> Result<f32> {
        if experiences.is_empty() {
            return Err(DqnError::EmptyBuffer("No experiences to train on".to_string()));
        }

        let batch_size = experiences.len();
        let mut states = Array2::zeros((batch_size, self.state_size));
        let mut next_states = Array2::zeros((batch_size, self.state_size));
        for (i, exp) in experiences.iter().enumerate() {
            if exp.state.len() != self.state_size || exp.next_state.len() != self.state_size {
                return Err(DqnError::dimension_mismatch(
                    format!("state of length {}", self.state_size),
                    format!("state of length {}", exp.state.len().max(exp.next_state.len())),
                ));
            }
            if exp.action >= self.action_size {
                return Err(DqnError::InvalidAction {
                    action: exp.action,
                    max_actions: self.action_size,
                });
            }
            states.row_mut(i).assign(&exp.state);
            next_states.row_mut(i).assign(&exp.next_state);
        }

        let next_q = self.q_target.predict_batch(next_states.view())?;
        let q_expected = self.q_local.forward_batch(states.view())?;

        let mut output_errors = Array2::<f32>::zeros(q_expected.dim());
        let mut loss = 0.0;
        let scale = 2.0 / batch_size as f32;
        for (i, exp) in experiences.iter().enumerate() {
            let max_next = next_q.row(i).fold(f32::NEG_INFINITY, |m, &v| m.max(v));
            let not_done = if exp.done { 0.0 } else { 1.0 };
            let target = exp.reward + gamma * max_next * not_done;
            let td = q_expected[[i, exp.action]] - target;
            loss += td * td;
            output_errors[[i, exp.action]] = scale * td;
        }
        let loss = loss / batch_size as f32;
        if !loss.is_finite() {
            return Err(DqnError::NumericalError(format!("loss is {}", loss)));
        }

        self.q_local
            .apply_output_errors(output_errors.view(), self.config.learning_rate)?;
        self.q_target.soft_update_from(&self.q_local, self.config.tau)?;
        self.learn_steps += 1;
        debug!("learn step {}: loss {:.6}", self.learn_steps, loss);
        Ok(loss)
    }
}

impl Agent for DqnAgent {
    fn act(&mut self, state: ArrayView1<f32>, epsilon: f32) -> Result<usize> {
        if !(0.0..=1.0).contains(&epsilon) {
            return Err(DqnError::invalid_parameter(
                "epsilon".to_string(),
                format!("{} is outside [0, 1]", epsilon),
            ));
        }
        if state.len() != self.state_size {
            return Err(DqnError::dimension_mismatch(
                format!("state of length {}", self.state_size),
                format!("state of length {}", state.len()),
            ));
        }

        if self.rng.gen::<f32>() < epsilon {
            Ok(self.rng.gen_range(0..self.action_size))
        } else {
            self.greedy_action(state)
        }
    }

    fn step(
        &mut self,
        state: &Array1<f32>,
        action: usize,
        reward: f32,
        next_state: &Array1<f32>,
        done: bool,
    ) -> Result<Option<f32>> {
        self.memory.add(Experience {
            state: state.clone(),
            action,
            reward,
            next_state: next_state.clone(),
            done,
        });

        self.t_step = (self.t_step + 1) % self.config.update_every;
        if self.t_step != 0 || self.memory.len() <= self.config.batch_size {
            return Ok(None);
        }

        let batch: Vec<Experience> = self
            .memory
            .sample(self.config.batch_size)?
            .into_iter()
            .cloned()
            .collect();
        let gamma = self.config.gamma;
        self.learn(&batch, gamma).map(Some)
    }

    fn save_checkpoint(&self, path: &Path) -> Result<()> {
        Checkpoint::from_network(&self.q_local).save(path)
    }

    /// Loads into the local network and mirrors the parameters into the
    /// target network so that resumed training starts from a consistent pair.
    fn load_checkpoint(&mut self, path: &Path) -> Result<()> {
        let checkpoint = Checkpoint::load(path)?;
        checkpoint.apply_to(&mut self.q_local)?;
        checkpoint.apply_to(&mut self.q_target)
    }
}
