use banana_dqn::{
    agent::{Agent, AgentConfig, DqnAgent},
    config::RunConfig,
    environment::banana::{ACTION_SIZE, STATE_SIZE},
    environment::{BananaCollector, BananaConfig, Environment},
    error::DqnError,
    evaluation::{self, EvaluationConfig},
    training::{self, TrainingConfig},
};

fn short_arena(seed: u64) -> BananaCollector {
    BananaCollector::new(BananaConfig {
        episode_length: 40,
        seed,
        ..BananaConfig::default()
    })
    .unwrap()
}

fn small_agent(seed: u64) -> DqnAgent {
    DqnAgent::new(
        STATE_SIZE,
        ACTION_SIZE,
        AgentConfig {
            batch_size: 16,
            hidden_layers: vec![32, 32],
            seed,
            ..AgentConfig::default()
        },
    )
    .unwrap()
}

#[test]
fn test_banana_state_layout() {
    let mut env = short_arena(0);
    assert_eq!(env.state_size(), 37);
    assert_eq!(env.action_size(), 4);
    let state = env.reset().unwrap();
    assert_eq!(state.len(), 37);
    assert!(state.iter().all(|v| v.is_finite()));
    assert!(env.step(4).is_err());
}

#[test]
fn test_end_to_end_training_then_evaluation() {
    let dir = tempfile::tempdir().unwrap();
    let checkpoint = dir.path().join("checkpoint.bin");
    let plot = dir.path().join("eval_plot.png");

    let mut env = short_arena(1);
    let mut agent = small_agent(1);
    let config = TrainingConfig {
        n_episodes: 6,
        max_t: 40,
        progress: false,
        ..TrainingConfig::default()
    };
    let history = training::train(&mut env, &mut agent, &config, &checkpoint).unwrap();
    assert_eq!(history.scores.len(), 6);
    assert!(history.episode_lengths.iter().all(|&n| n <= 40));
    assert!(history.epsilons.windows(2).all(|w| w[1] <= w[0]));
    assert!(agent.learn_steps > 0);
    assert!(checkpoint.exists());
    env.close().unwrap();

    let mut eval_env = short_arena(2);
    let mut fresh = small_agent(7);
    let eval_config = EvaluationConfig {
        episodes: 3,
        max_t: 40,
        ..EvaluationConfig::default()
    };
    let scores = evaluation::run_evaluation(&mut eval_env, &mut fresh, &checkpoint, &plot, &eval_config).unwrap();
    assert_eq!(scores.len(), 3);
    assert!(plot.exists());
    assert!(matches!(eval_env.reset(), Err(DqnError::EnvironmentClosed)));

    // the evaluated weights are exactly what training produced
    let state = short_arena(3).reset().unwrap();
    assert_eq!(
        agent.q_values(state.view()).unwrap(),
        fresh.q_values(state.view()).unwrap()
    );
}

#[test]
fn test_watching_an_untrained_agent() {
    let mut env = short_arena(4);
    let mut agent = small_agent(4);
    let score = evaluation::watch(&mut env, &mut agent, 25).unwrap();
    assert!(score.is_finite());
    assert_eq!(env.steps(), 0);
    assert_eq!(agent.memory.len(), 0);
    agent.act(env.reset().unwrap().view(), 0.0).unwrap();
}

#[test]
fn test_run_config_drives_components() {
    let config = RunConfig::from_json(
        r#"{
            "agent": { "hidden_layers": [16], "seed": 3 },
            "environment": { "episode_length": 20, "seed": 3 },
            "training": { "n_episodes": 2, "progress": false }
        }"#,
    )
    .unwrap();
    let mut env = BananaCollector::new(config.environment.clone()).unwrap();
    let mut agent = DqnAgent::new(env.state_size(), env.action_size(), config.agent.clone()).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let history = training::train(&mut env, &mut agent, &config.training, &dir.path().join("c.bin")).unwrap();
    assert_eq!(history.scores.len(), 2);
    assert!(history.episode_lengths.iter().all(|&n| n == 20));
}
