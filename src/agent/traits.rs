use std::path::Path;

use ndarray::{Array1, ArrayView1};

use crate::error::Result;

/// The learner driven by the training and evaluation loops.
pub trait Agent {
    /// Choose an action for `state`; with probability `epsilon` the choice is
    /// uniformly random, otherwise greedy.
    fn act(&mut self, state: ArrayView1<f32>, epsilon: f32) -> Result<usize>;

    /// Record one transition and learn from memory when due.
    /// Returns the loss of the learning update, if one ran.
    fn step(
        &mut self,
        state: &Array1<f32>,
        action: usize,
        reward: f32,
        next_state: &Array1<f32>,
        done: bool,
    ) -> Result<Option<f32>>;

    /// Persist the parameters used for acting.
    fn save_checkpoint(&self, path: &Path) -> Result<()>;

    /// Replace the parameters used for acting with those stored at `path`.
    fn load_checkpoint(&mut self, path: &Path) -> Result<()>;
}
