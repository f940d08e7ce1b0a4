use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use ndarray::{array, Array1, ArrayView1};

use crate::agent::Agent;
use crate::environment::{Environment, StepOutcome};
use crate::error::{DqnError, Result};

/// Two-dimensional corridor: reward equals the action taken, `done` after
/// `length` steps. The state encodes the step counter.
pub struct Corridor {
    pub length: usize,
    pub t: usize,
    pub resets: usize,
    pub closed: bool,
}

impl Corridor {
    pub fn new(length: usize) -> Self {
        Corridor {
            length,
            t: 0,
            resets: 0,
            closed: false,
        }
    }

    fn state(&self) -> Array1<f32> {
        array![self.t as f32, 1.0]
    }
}

impl Environment for Corridor {
    fn state_size(&self) -> usize {
        2
    }

    fn action_size(&self) -> usize {
        2
    }

    fn reset(&mut self) -> Result<Array1<f32>> {
        if self.closed {
            return Err(DqnError::EnvironmentClosed);
        }
        self.t = 0;
        self.resets += 1;
        Ok(self.state())
    }

    fn step(&mut self, action: usize) -> Result<StepOutcome> {
        if self.closed {
            return Err(DqnError::EnvironmentClosed);
        }
        self.t += 1;
        Ok(StepOutcome {
            next_state: self.state(),
            reward: action as f32,
            done: self.t >= self.length,
        })
    }

    fn close(&mut self) -> Result<()> {
        self.closed = true;
        Ok(())
    }
}

/// Calls observed by [`ScriptedAgent`].
#[derive(Default, Debug)]
pub struct Calls {
    pub epsilons: Vec<f32>,
    pub steps: usize,
    pub saved: Vec<PathBuf>,
    pub loaded: Vec<PathBuf>,
}

/// Always picks `action` and records what the loops ask of it.
pub struct ScriptedAgent {
    pub action: usize,
    pub calls: Rc<RefCell<Calls>>,
}

impl ScriptedAgent {
    pub fn new(action: usize) -> Self {
        ScriptedAgent {
            action,
            calls: Rc::new(RefCell::new(Calls::default())),
        }
    }
}

impl Agent for ScriptedAgent {
    fn act(&mut self, _state: ArrayView1<f32>, epsilon: f32) -> Result<usize> {
        self.calls.borrow_mut().epsilons.push(epsilon);
        Ok(self.action)
    }

    fn step(&mut self, _: &Array1<f32>, _: usize, _: f32, _: &Array1<f32>, _: bool) -> Result<Option<f32>> {
        self.calls.borrow_mut().steps += 1;
        Ok(None)
    }

    fn save_checkpoint(&self, path: &Path) -> Result<()> {
        self.calls.borrow_mut().saved.push(path.to_path_buf());
        Ok(())
    }

    fn load_checkpoint(&mut self, path: &Path) -> Result<()> {
        self.calls.borrow_mut().loaded.push(path.to_path_buf());
        Ok(())
    }
}
