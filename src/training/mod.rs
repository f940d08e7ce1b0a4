//! # Training Loop
//!
//! Runs epsilon-greedy episodes against an [`Environment`], forwarding every
//! transition to the [`Agent`], decaying epsilon once per episode and keeping
//! both the full score history and a trailing 100-episode window for the
//! running average. Weights are saved to the checkpoint path when the run
//! ends.

use std::io::{self, Write};
use std::path::Path;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::agent::Agent;
use crate::environment::Environment;
use crate::episode::{run_episode, Mode};
use crate::error::{DqnError, Result};
use crate::metrics::ScoreWindow;
use crate::visualization;

mod schedule;

pub use schedule::EpsilonSchedule;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct TrainingConfig {
    /// Maximum number of training episodes
    pub n_episodes: usize,
    /// Maximum number of steps per episode
    pub max_t: usize,
    pub eps_start: f32,
    pub eps_end: f32,
    /// Multiplicative per-episode epsilon decay
    pub eps_decay: f32,
    /// Stop early once the trailing average reaches this score. Disabled
    /// unless set.
    pub solve_score: Option<f32>,
    /// Size of the running-average window
    pub window: usize,
    /// Print a persistent summary line every this many episodes
    pub summary_every: usize,
    /// Print the per-episode progress line
    pub progress: bool,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        TrainingConfig {
            n_episodes: 1000,
            max_t: 1000,
            eps_start: 1.0,
            eps_end: 0.01,
            eps_decay: 0.995,
            solve_score: None,
            window: ScoreWindow::DEFAULT_CAPACITY,
            summary_every: 100,
            progress: true,
        }
    }
}

impl TrainingConfig {
    pub fn validate(&self) -> Result<()> {
        if self.n_episodes == 0 {
            return Err(DqnError::invalid_parameter("n_episodes", "must be positive"));
        }
        if self.window == 0 {
            return Err(DqnError::invalid_parameter("window", "must be positive"));
        }
        if self.summary_every == 0 {
            return Err(DqnError::invalid_parameter("summary_every", "must be positive"));
        }
        self.schedule().map(|_| ())
    }

    pub fn schedule(&self) -> Result<EpsilonSchedule> {
        EpsilonSchedule::new(self.eps_start, self.eps_end, self.eps_decay)
    }
}

/// Everything recorded over one call to [`train`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrainingHistory {
    /// Score of every episode, in order
    pub scores: Vec<f32>,
    /// Transitions taken in every episode
    pub episode_lengths: Vec<usize>,
    /// Epsilon used during every episode
    pub epsilons: Vec<f32>,
    /// Trailing-window average after every episode
    pub averages: Vec<f32>,
    /// Episode (1-based) at which `solve_score` was reached
    pub solved_at: Option<usize>,
}

/// Deep Q-Learning.
///
/// Plays up to `config.n_episodes` episodes of at most `config.max_t` steps,
/// then saves the agent's weights to `checkpoint` regardless of how the run
/// ended.
pub fn train<E, A>(env: &mut E, agent: &mut A, config: &TrainingConfig, checkpoint: &Path) -> Result<TrainingHistory>
where
    E: Environment + ?Sized,
    A: Agent + ?Sized,
{
    config.validate()?;
    let mut schedule = config.schedule()?;
    let mut window = ScoreWindow::new(config.window);
    let mut history = TrainingHistory::default();
    let mut stdout = io::stdout();

    info!(
        "Training for up to {} episodes ({} steps each), epsilon {} -> {} by {}",
        config.n_episodes, config.max_t, config.eps_start, config.eps_end, config.eps_decay
    );

    for i_episode in 1..=config.n_episodes {
        let epsilon = schedule.value();
        let episode = run_episode(env, agent, epsilon, config.max_t, Mode::Learn)?;

        window.push(episode.score);
        history.scores.push(episode.score);
        history.episode_lengths.push(episode.steps);
        history.epsilons.push(epsilon);
        let average = window.mean().unwrap_or(episode.score);
        history.averages.push(average);

        let eps = schedule.advance();
        if config.progress {
            write!(stdout, "\rEpisode {}\tAverage Score: {:.2}\tEpsilon: {:.2}", i_episode, average, eps)?;
            if i_episode % config.summary_every == 0 {
                writeln!(stdout, "\rEpisode {}\tAverage Score: {:.2}", i_episode, average)?;
            }
            stdout.flush()?;
        }

        if let Some(target) = config.solve_score {
            if window.is_full() && average >= target {
                let solved_in = i_episode - window.capacity();
                if config.progress {
                    writeln!(
                        stdout,
                        "\nEnvironment solved in {} episodes!\tAverage Score: {:.2}",
                        solved_in, average
                    )?;
                }
                warn!("Stopping early: average {:.2} reached target {:.2}", average, target);
                history.solved_at = Some(i_episode);
                break;
            }
        }
    }
    if config.progress {
        writeln!(stdout)?;
    }

    agent.save_checkpoint(checkpoint)?;
    info!(
        "Training finished after {} episodes, final average {:.2}",
        history.scores.len(),
        history.averages.last().copied().unwrap_or(0.0)
    );
    Ok(history)
}

/// Train, then plot the score trajectory and print its mean.
pub fn train_and_report<E, A>(
    env: &mut E,
    agent: &mut A,
    config: &TrainingConfig,
    checkpoint: &Path,
    plot_path: &Path,
) -> Result<TrainingHistory>
where
    E: Environment + ?Sized,
    A: Agent + ?Sized,
{
    let history = train(env, agent, config, checkpoint)?;
    visualization::report(&history.scores, plot_path)?;
    Ok(history)
}
