use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{error, info};

use banana_dqn::agent::DqnAgent;
use banana_dqn::config::RunConfig;
use banana_dqn::environment::{BananaCollector, Environment};
use banana_dqn::error::Result;
use banana_dqn::evaluation;
use banana_dqn::training;
use banana_dqn::visualization;

/// Train and evaluate a Deep Q-Network on the banana collection task.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Path to a JSON run configuration. Defaults are used when omitted.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    /// Checkpoint file to write (train) or read (eval).
    #[arg(long, global = true)]
    checkpoint: Option<PathBuf>,
    /// Where to write the score plot.
    #[arg(long, global = true)]
    plot: Option<PathBuf>,
    /// Seed for the agent and the environment.
    #[arg(long, global = true)]
    seed: Option<u64>,
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Train a fresh agent, save its weights and plot the training scores.
    #[command(alias = "t")]
    Train {
        /// Maximum number of training episodes.
        #[arg(short, long)]
        episodes: Option<usize>,
        /// Stop once the 100-episode average reaches this score.
        #[arg(long)]
        solve_score: Option<f32>,
    },
    /// Load saved weights and score them over greedy episodes.
    #[command(alias = "e")]
    Eval {
        /// Number of evaluation episodes.
        #[arg(short, long)]
        episodes: Option<usize>,
    },
    /// Watch an untrained agent for a short while.
    #[command(alias = "w")]
    Watch {
        /// Step budget.
        #[arg(short, long)]
        steps: Option<usize>,
    },
}

impl Cli {
    fn load_config(&self) -> Result<RunConfig> {
        let mut config = match &self.config {
            Some(path) => RunConfig::from_file(path)?,
            None => RunConfig::default(),
        };
        if let Some(path) = &self.checkpoint {
            config.checkpoint_path = path.clone();
        }
        if let Some(path) = &self.plot {
            config.plot_path = path.clone();
        }
        if let Some(seed) = self.seed {
            config.agent.seed = seed;
            config.environment.seed = seed;
        }
        match self.command {
            Command::Train { episodes, solve_score } => {
                if let Some(n) = episodes {
                    config.training.n_episodes = n;
                }
                if solve_score.is_some() {
                    config.training.solve_score = solve_score;
                }
            }
            Command::Eval { episodes: Some(n) } => config.evaluation.episodes = n,
            Command::Watch { steps: Some(n) } => config.evaluation.watch_steps = n,
            _ => {}
        }
        config.validate()?;
        Ok(config)
    }

    fn run(self) -> Result<()> {
        let config = self.load_config()?;
        let mut env = BananaCollector::new(config.environment.clone())?;
        let mut agent = DqnAgent::new(env.state_size(), env.action_size(), config.agent.clone())?;
        info!(
            "Banana arena: state size {}, {} actions",
            env.state_size(),
            env.action_size()
        );

        match self.command {
            Command::Train { .. } => {
                let history = training::train_and_report(
                    &mut env,
                    &mut agent,
                    &config.training,
                    &config.checkpoint_path,
                    &config.plot_path,
                )?;
                println!("{}", visualization::plot_scores(&history.averages, "Average Score", 60, 12));
                env.close()?;
            }
            Command::Eval { .. } => {
                let scores = evaluation::run_evaluation(
                    &mut env,
                    &mut agent,
                    &config.checkpoint_path,
                    &config.plot_path,
                    &config.evaluation,
                )?;
                println!("{}", visualization::scores_summary(&scores));
                println!("{}", visualization::histogram(&scores, 10));
            }
            Command::Watch { .. } => {
                let score = evaluation::watch(&mut env, &mut agent, config.evaluation.watch_steps)?;
                println!("Untrained agent scored {}", score);
                env.close()?;
            }
        }
        Ok(())
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match Cli::parse().run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
