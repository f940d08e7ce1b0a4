use ndarray::Array1;
use rand::rngs::StdRng;
use rand::seq::index;
use rand::SeedableRng;
use std::collections::VecDeque;

use crate::error::{DqnError, Result};

/// One environment transition.
#[derive(Clone, Debug, PartialEq)]
pub struct Experience {
    pub state: Array1<f32>,
    pub action: usize,
    pub reward: f32,
    pub next_state: Array1<f32>,
    pub done: bool,
}

/// Fixed-size experience memory. When full, the oldest experience is dropped
/// to make room for the new one. Sampling is uniform without replacement.
#[derive(Clone, Debug)]
pub struct ReplayBuffer {
    buffer: VecDeque<Experience>,
    capacity: usize,
    rng: StdRng,
}

impl ReplayBuffer {
    pub fn new(capacity: usize, seed: u64) -> Self {
        ReplayBuffer {
            buffer: VecDeque::with_capacity(capacity.min(1 << 16)),
            capacity: capacity.max(1),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn add(&mut self, experience: Experience) {
        if self.buffer.len() == self.capacity {
            self.buffer.pop_front();
        }
        self.buffer.push_back(experience);
    }

    /// Draw up to `batch_size` distinct experiences.
    pub fn sample(&mut self, batch_size: usize) -> Result<Vec<&Experience>> {
        if self.buffer.is_empty() {
            return Err(DqnError::EmptyBuffer("cannot sample from an empty replay buffer".to_string()));
        }
        let amount = batch_size.min(self.buffer.len());
        let indices = index::sample(&mut self.rng, self.buffer.len(), amount);
        Ok(indices.into_iter().map(|i| &self.buffer[i]).collect())
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
