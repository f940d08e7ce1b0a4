//! The inner loop shared by training, evaluation and watching.

use crate::agent::Agent;
use crate::environment::{Environment, StepOutcome};
use crate::error::Result;

/// Whether transitions are forwarded to the agent for learning.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Learn,
    Act,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EpisodeSummary {
    /// Sum of rewards
    pub score: f32,
    /// Transitions taken; never more than the step budget
    pub steps: usize,
    /// The environment reported `done` (as opposed to running out of steps)
    pub done: bool,
}

/// Play one episode from `reset` until `done` or `max_t` steps.
pub fn run_episode<E, A>(env: &mut E, agent: &mut A, epsilon: f32, max_t: usize, mode: Mode) -> Result<EpisodeSummary>
where
    E: Environment + ?Sized,
    A: Agent + ?Sized,
{
    let mut state = env.reset()?;
    let mut summary = EpisodeSummary {
        score: 0.0,
        steps: 0,
        done: false,
    };

    while summary.steps < max_t {
        let action = agent.act(state.view(), epsilon)?;
        let StepOutcome { next_state, reward, done } = env.step(action)?;
        if mode == Mode::Learn {
            agent.step(&state, action, reward, &next_state, done)?;
        }
        state = next_state;
        summary.score += reward;
        summary.steps += 1;
        if done {
            summary.done = true;
            break;
        }
    }
    Ok(summary)
}
