//! Greedy replays of a trained or untrained policy. Nothing here calls
//! [`Agent::step`], so no learning happens.

use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::agent::Agent;
use crate::environment::Environment;
use crate::episode::{run_episode, Mode};
use crate::error::{DqnError, Result};
use crate::visualization;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct EvaluationConfig {
    /// Number of evaluation episodes
    pub episodes: usize,
    /// Maximum number of steps per episode
    pub max_t: usize,
    /// Step budget when watching an untrained agent
    pub watch_steps: usize,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        EvaluationConfig {
            episodes: 100,
            max_t: 1000,
            watch_steps: 200,
        }
    }
}

impl EvaluationConfig {
    pub fn validate(&self) -> Result<()> {
        if self.episodes == 0 {
            return Err(DqnError::invalid_parameter("episodes", "must be positive"));
        }
        Ok(())
    }
}

/// Play `episodes` greedy episodes with the agent's current weights.
pub fn run_episodes<E, A>(env: &mut E, agent: &mut A, episodes: usize, max_t: usize) -> Result<Vec<f32>>
where
    E: Environment + ?Sized,
    A: Agent + ?Sized,
{
    let mut scores = Vec::with_capacity(episodes);
    for _ in 0..episodes {
        let episode = run_episode(env, agent, 0.0, max_t, Mode::Act)?;
        scores.push(episode.score);
    }
    Ok(scores)
}

/// Load `checkpoint` into the agent and score it over
/// `config.episodes` greedy episodes.
pub fn evaluate<E, A>(env: &mut E, agent: &mut A, checkpoint: &Path, config: &EvaluationConfig) -> Result<Vec<f32>>
where
    E: Environment + ?Sized,
    A: Agent + ?Sized,
{
    config.validate()?;
    agent.load_checkpoint(checkpoint)?;
    info!("Evaluating {} episodes of at most {} steps", config.episodes, config.max_t);
    run_episodes(env, agent, config.episodes, config.max_t)
}

/// [`evaluate`], then plot the scores and close the environment.
pub fn run_evaluation<E, A>(
    env: &mut E,
    agent: &mut A,
    checkpoint: &Path,
    plot_path: &Path,
    config: &EvaluationConfig,
) -> Result<Vec<f32>>
where
    E: Environment + ?Sized,
    A: Agent + ?Sized,
{
    let scores = evaluate(env, agent, checkpoint, config)?;
    visualization::report(&scores, plot_path)?;
    env.close()?;
    Ok(scores)
}

/// Watch the agent act greedily for at most `max_steps` steps, then reset
/// the environment. Returns the score collected.
pub fn watch<E, A>(env: &mut E, agent: &mut A, max_steps: usize) -> Result<f32>
where
    E: Environment + ?Sized,
    A: Agent + ?Sized,
{
    let episode = run_episode(env, agent, 0.0, max_steps, Mode::Act)?;
    info!("Watched {} steps, score {}", episode.steps, episode.score);
    env.reset()?;
    Ok(episode.score)
}
