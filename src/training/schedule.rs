use crate::error::{DqnError, Result};

/// Geometric epsilon decay with a floor:
/// `eps <- max(end, decay * eps)` once per episode.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EpsilonSchedule {
    start: f32,
    end: f32,
    decay: f32,
    current: f32,
}

impl EpsilonSchedule {
    pub fn new(start: f32, end: f32, decay: f32) -> Result<Self> {
        if !(0.0..=1.0).contains(&start) || !(0.0..=1.0).contains(&end) {
            return Err(DqnError::invalid_parameter("epsilon", "start and end must be within [0, 1]"));
        }
        if end > start {
            return Err(DqnError::invalid_parameter("eps_end", "must not exceed eps_start"));
        }
        if !(decay > 0.0 && decay <= 1.0) {
            return Err(DqnError::invalid_parameter("eps_decay", "must be within (0, 1]"));
        }
        Ok(EpsilonSchedule {
            start,
            end,
            decay,
            current: start,
        })
    }

    pub fn value(&self) -> f32 {
        self.current
    }

    /// Decay once and return the new value.
    pub fn advance(&mut self) -> f32 {
        self.current = (self.decay * self.current).max(self.end).min(self.start);
        self.current
    }
}
