//! Run configuration, read from JSON. Every field has a default, so a config
//! file only needs the values it changes:
//!
//! ```json
//! { "training": { "n_episodes": 500 }, "agent": { "seed": 7 } }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::agent::AgentConfig;
use crate::checkpoint::DEFAULT_CHECKPOINT;
use crate::environment::BananaConfig;
use crate::error::Result;
use crate::evaluation::EvaluationConfig;
use crate::training::TrainingConfig;
use crate::visualization::DEFAULT_PLOT_PATH;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct RunConfig {
    pub agent: AgentConfig,
    pub training: TrainingConfig,
    pub evaluation: EvaluationConfig,
    pub environment: BananaConfig,
    pub checkpoint_path: PathBuf,
    pub plot_path: PathBuf,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            agent: AgentConfig::default(),
            training: TrainingConfig::default(),
            evaluation: EvaluationConfig::default(),
            environment: BananaConfig::default(),
            checkpoint_path: PathBuf::from(DEFAULT_CHECKPOINT),
            plot_path: PathBuf::from(DEFAULT_PLOT_PATH),
        }
    }
}

impl RunConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.agent.validate()?;
        self.training.validate()?;
        self.evaluation.validate()?;
        self.environment.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimizer::OptimizerKind;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = RunConfig::from_json(r#"{ "training": { "n_episodes": 5 }, "agent": { "seed": 9 } }"#).unwrap();
        assert_eq!(config.training.n_episodes, 5);
        assert_eq!(config.training.eps_decay, 0.995);
        assert_eq!(config.agent.seed, 9);
        assert_eq!(config.agent.batch_size, 64);
        assert_eq!(config.checkpoint_path, PathBuf::from("checkpoint.bin"));
        assert_eq!(config.training.solve_score, None);
    }

    #[test]
    fn optimizer_is_chosen_by_name() {
        let config = RunConfig::from_json(r#"{ "agent": { "optimizer": "sgd" } }"#).unwrap();
        assert_eq!(config.agent.optimizer, OptimizerKind::Sgd);
        assert_eq!(RunConfig::default().agent.optimizer, OptimizerKind::Adam);
        assert!(RunConfig::from_json(r#"{ "agent": { "optimizer": "rmsprop" } }"#).is_err());
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(RunConfig::from_json(r#"{ "training": { "eps_end": 2.0 } }"#).is_err());
        assert!(RunConfig::from_json(r#"{ "agent": { "batch_size": 0 } }"#).is_err());
        assert!(RunConfig::from_json("not json").is_err());
    }

    #[test]
    fn round_trips_through_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.json");
        let mut config = RunConfig::default();
        config.training.solve_score = Some(13.0);
        config.save(&path).unwrap();
        assert_eq!(RunConfig::from_file(&path).unwrap(), config);
    }
}
