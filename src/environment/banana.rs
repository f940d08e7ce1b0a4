use std::f32::consts::PI;

use log::debug;
use ndarray::Array1;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::{Environment, StepOutcome};
use crate::error::{DqnError, Result};

/// Ray directions in degrees; 90 points straight ahead.
const RAY_ANGLES: [f32; 7] = [20.0, 90.0, 160.0, 45.0, 135.0, 70.0, 110.0];
/// Per ray: one-hot [yellow, wall, blue, nothing] followed by distance.
const RAY_FEATURES: usize = 5;

pub const STATE_SIZE: usize = RAY_ANGLES.len() * RAY_FEATURES + 2;
pub const ACTION_SIZE: usize = 4;

const AGENT_RADIUS: f32 = 0.5;
const BANANA_RADIUS: f32 = 0.5;
const ACCELERATION: f32 = 0.4;
const MAX_SPEED: f32 = 1.0;
const DRAG: f32 = 0.7;
const TURN_RATE: f32 = 0.3;
const SPAWN_ATTEMPTS: usize = 100;

/// Discrete actions of the collector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Move {
    Forward,
    Backward,
    TurnLeft,
    TurnRight,
}

impl TryFrom<usize> for Move {
    type Error = DqnError;

    fn try_from(action: usize) -> Result<Self> {
        match action {
            0 => Ok(Move::Forward),
            1 => Ok(Move::Backward),
            2 => Ok(Move::TurnLeft),
            3 => Ok(Move::TurnRight),
            _ => Err(DqnError::InvalidAction {
                action,
                max_actions: ACTION_SIZE,
            }),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct BananaConfig {
    /// Side length of the square arena
    pub arena_size: f32,
    pub num_bananas: usize,
    /// Probability that a spawned banana is yellow
    pub yellow_fraction: f64,
    /// Steps after which an episode is done
    pub episode_length: usize,
    pub ray_length: f32,
    pub seed: u64,
}

impl Default for BananaConfig {
    fn default() -> Self {
        BananaConfig {
            arena_size: 20.0,
            num_bananas: 30,
            yellow_fraction: 0.5,
            episode_length: 300,
            ray_length: 10.0,
            seed: 0,
        }
    }
}

impl BananaConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.arena_size.is_finite() {
            return Err(DqnError::invalid_parameter("arena_size", "must be finite"));
        }
        if !(self.arena_size > 4.0 * (AGENT_RADIUS + BANANA_RADIUS)) {
            return Err(DqnError::invalid_parameter("arena_size", "arena is too small"));
        }
        if !(0.0..=1.0).contains(&self.yellow_fraction) {
            return Err(DqnError::invalid_parameter("yellow_fraction", "must be within [0, 1]"));
        }
        if self.episode_length == 0 {
            return Err(DqnError::invalid_parameter("episode_length", "must be positive"));
        }
        if !(self.ray_length > 0.0 && self.ray_length.is_finite()) {
            return Err(DqnError::invalid_parameter("ray_length", "must be a positive finite length"));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Hit {
    Yellow,
    Wall,
    Blue,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Banana {
    x: f32,
    y: f32,
    yellow: bool,
}

/// Simulated banana collection arena with ray-cast perception.
///
/// The state is 37 values: seven rays of five features each, then forward
/// speed and turning rate. Actions are forward, backward, turn left and turn
/// right. Episodes last a fixed number of steps. All randomness comes from a
/// generator seeded by [`BananaConfig::seed`], so two collectors built from
/// the same config produce identical episodes for identical actions.
#[derive(Clone, Debug)]
pub struct BananaCollector {
    config: BananaConfig,
    x: f32,
    y: f32,
    heading: f32,
    speed: f32,
    angular: f32,
    bananas: Vec<Banana>,
    steps: usize,
    closed: bool,
    rng: StdRng,
}

impl BananaCollector {
    pub fn new(config: BananaConfig) -> Result<Self> {
        config.validate()?;
        let rng = StdRng::seed_from_u64(config.seed);
        let centre = config.arena_size / 2.0;
        let mut env = BananaCollector {
            config,
            x: centre,
            y: centre,
            heading: PI / 2.0,
            speed: 0.0,
            angular: 0.0,
            bananas: Vec::new(),
            steps: 0,
            closed: false,
            rng,
        };
        env.populate();
        Ok(env)
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    fn populate(&mut self) {
        self.bananas.clear();
        for _ in 0..self.config.num_bananas {
            let banana = self.spawn_banana();
            self.bananas.push(banana);
        }
    }

    fn spawn_banana(&mut self) -> Banana {
        let lo = BANANA_RADIUS;
        let hi = self.config.arena_size - BANANA_RADIUS;
        let clearance = AGENT_RADIUS + BANANA_RADIUS + 1.0;
        let (mut x, mut y) = (lo, lo);
        for _ in 0..SPAWN_ATTEMPTS {
            x = self.rng.gen_range(lo..hi);
            y = self.rng.gen_range(lo..hi);
            if (x - self.x).hypot(y - self.y) > clearance {
                break;
            }
        }
        let yellow = self.rng.gen_bool(self.config.yellow_fraction);
        Banana { x, y, yellow }
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            Err(DqnError::EnvironmentClosed)
        } else {
            Ok(())
        }
    }

    /// Distance along the unit ray `(dx, dy)` to the nearest wall.
    fn wall_distance(&self, dx: f32, dy: f32) -> f32 {
        let size = self.config.arena_size;
        let along = |pos: f32, d: f32| {
            if d > f32::EPSILON {
                (size - pos) / d
            } else if d < -f32::EPSILON {
                -pos / d
            } else {
                f32::INFINITY
            }
        };
        along(self.x, dx).min(along(self.y, dy)).max(0.0)
    }

    /// Nearest object hit by the ray, within `ray_length`.
    fn cast(&self, dx: f32, dy: f32) -> Option<(Hit, f32)> {
        let mut nearest = (Hit::Wall, self.wall_distance(dx, dy));
        for banana in &self.bananas {
            let (mx, my) = (banana.x - self.x, banana.y - self.y);
            let b = mx * dx + my * dy;
            let c = mx * mx + my * my - BANANA_RADIUS * BANANA_RADIUS;
            let disc = b * b - c;
            if disc < 0.0 {
                continue;
            }
            let t = if c <= 0.0 { 0.0 } else { b - disc.sqrt() };
            if t >= 0.0 && t < nearest.1 {
                let kind = if banana.yellow { Hit::Yellow } else { Hit::Blue };
                nearest = (kind, t);
            }
        }
        if nearest.1 <= self.config.ray_length {
            Some(nearest)
        } else {
            None
        }
    }

    fn observe(&self) -> Array1<f32> {
        let mut state = Array1::zeros(STATE_SIZE);
        for (i, angle) in RAY_ANGLES.iter().enumerate() {
            let direction = self.heading + (angle - 90.0).to_radians();
            let (dy, dx) = direction.sin_cos();
            let base = i * RAY_FEATURES;
            match self.cast(dx, dy) {
                Some((hit, distance)) => {
                    let slot = match hit {
                        Hit::Yellow => 0,
                        Hit::Wall => 1,
                        Hit::Blue => 2,
                    };
                    state[base + slot] = 1.0;
                    state[base + 4] = distance / self.config.ray_length;
                }
                None => {
                    state[base + 3] = 1.0;
                    state[base + 4] = 1.0;
                }
            }
        }
        state[STATE_SIZE - 2] = self.speed / MAX_SPEED;
        state[STATE_SIZE - 1] = self.angular / TURN_RATE;
        state
    }

    fn apply_move(&mut self, action: Move) {
        self.angular = 0.0;
        match action {
            Move::Forward => self.speed += ACCELERATION,
            Move::Backward => self.speed -= ACCELERATION,
            Move::TurnLeft => self.angular = TURN_RATE,
            Move::TurnRight => self.angular = -TURN_RATE,
        }
        self.heading = (self.heading + self.angular).rem_euclid(2.0 * PI);
        self.speed = (self.speed * DRAG).clamp(-MAX_SPEED, MAX_SPEED);

        let (sin, cos) = self.heading.sin_cos();
        let lo = AGENT_RADIUS;
        let hi = self.config.arena_size - AGENT_RADIUS;
        let nx = self.x + self.speed * cos;
        let ny = self.y + self.speed * sin;
        let (cx, cy) = (nx.clamp(lo, hi), ny.clamp(lo, hi));
        if cx != nx || cy != ny {
            self.speed = 0.0;
        }
        self.x = cx;
        self.y = cy;
    }

    /// Remove touched bananas, respawn replacements and return the reward.
    fn collect(&mut self) -> f32 {
        let reach = AGENT_RADIUS + BANANA_RADIUS;
        let mut reward = 0.0;
        for i in 0..self.bananas.len() {
            let banana = self.bananas[i];
            if (banana.x - self.x).hypot(banana.y - self.y) <= reach {
                reward += if banana.yellow { 1.0 } else { -1.0 };
                self.bananas[i] = self.spawn_banana();
            }
        }
        reward
    }
}

impl Environment for BananaCollector {
    fn state_size(&self) -> usize {
        STATE_SIZE
    }

    fn action_size(&self) -> usize {
        ACTION_SIZE
    }

    fn reset(&mut self) -> Result<Array1<f32>> {
        self.ensure_open()?;
        let lo = AGENT_RADIUS;
        let hi = self.config.arena_size - AGENT_RADIUS;
        self.x = self.rng.gen_range(lo..hi);
        self.y = self.rng.gen_range(lo..hi);
        self.heading = self.rng.gen_range(0.0..2.0 * PI);
        self.speed = 0.0;
        self.angular = 0.0;
        self.steps = 0;
        self.populate();
        debug!("banana arena reset: agent at ({:.2}, {:.2})", self.x, self.y);
        Ok(self.observe())
    }

    fn step(&mut self, action: usize) -> Result<StepOutcome> {
        self.ensure_open()?;
        let action = Move::try_from(action)?;
        self.apply_move(action);
        let reward = self.collect();
        self.steps += 1;
        Ok(StepOutcome {
            next_state: self.observe(),
            reward,
            done: self.steps >= self.config.episode_length,
        })
    }

    fn close(&mut self) -> Result<()> {
        if !self.closed {
            debug!("banana arena closed after {} steps", self.steps);
        }
        self.closed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collector() -> BananaCollector {
        BananaCollector::new(BananaConfig::default()).unwrap()
    }

    #[test]
    fn state_has_seven_rays_and_velocity() {
        let mut env = collector();
        let state = env.reset().unwrap();
        assert_eq!(state.len(), 37);
        for ray in 0..RAY_ANGLES.len() {
            let one_hot: f32 = (0..4).map(|k| state[ray * RAY_FEATURES + k]).sum();
            assert_eq!(one_hot, 1.0);
            let distance = state[ray * RAY_FEATURES + 4];
            assert!((0.0..=1.0).contains(&distance));
        }
    }

    #[test]
    fn touching_bananas_sums_their_colours() {
        let mut env = collector();
        env.reset().unwrap();
        env.bananas = vec![
            Banana { x: env.x, y: env.y, yellow: true },
            Banana { x: env.x + 0.3, y: env.y, yellow: false },
        ];
        assert_eq!(env.collect(), 0.0);
        assert_eq!(env.bananas.len(), 2);
        // replacements spawn out of reach
        assert_eq!(env.collect(), 0.0);
    }

    #[test]
    fn yellow_banana_ahead_is_collected_when_driving_forward() {
        let mut env = collector();
        env.reset().unwrap();
        env.x = 10.0;
        env.y = 10.0;
        env.heading = 0.0;
        env.bananas = vec![Banana { x: 11.0, y: 10.0, yellow: true }];
        let state = env.observe();
        // straight-ahead ray sees the yellow banana
        assert_eq!(state[RAY_FEATURES], 1.0);
        let outcome = env.step(0).unwrap();
        assert_eq!(outcome.reward, 1.0);
    }

    #[test]
    fn episodes_end_after_episode_length() {
        let config = BananaConfig { episode_length: 5, ..BananaConfig::default() };
        let mut env = BananaCollector::new(config).unwrap();
        env.reset().unwrap();
        for i in 1..=5 {
            let outcome = env.step(i % ACTION_SIZE).unwrap();
            assert_eq!(outcome.done, i == 5);
        }
    }

    #[test]
    fn same_seed_gives_same_trajectory() {
        let run = || {
            let mut env = collector();
            let mut states = vec![env.reset().unwrap()];
            for t in 0..50 {
                states.push(env.step(t % ACTION_SIZE).unwrap().next_state);
            }
            states
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn rejects_unknown_actions() {
        let mut env = collector();
        env.reset().unwrap();
        assert_eq!(
            env.step(4).unwrap_err(),
            DqnError::InvalidAction { action: 4, max_actions: 4 }
        );
    }

    #[test]
    fn closed_environment_refuses_work() {
        let mut env = collector();
        env.close().unwrap();
        env.close().unwrap();
        assert_eq!(env.reset().unwrap_err(), DqnError::EnvironmentClosed);
        assert_eq!(env.step(0).unwrap_err(), DqnError::EnvironmentClosed);
    }

    #[test]
    fn unbounded_geometry_is_rejected_up_front() {
        for config in [
            BananaConfig { arena_size: f32::INFINITY, ..BananaConfig::default() },
            BananaConfig { arena_size: f32::NAN, ..BananaConfig::default() },
            BananaConfig { ray_length: f32::INFINITY, ..BananaConfig::default() },
        ] {
            assert!(matches!(
                BananaCollector::new(config),
                Err(DqnError::InvalidParameter { .. })
            ));
        }
    }

    #[test]
    fn agent_stays_inside_the_walls() {
        let mut env = collector();
        env.reset().unwrap();
        for _ in 0..200 {
            env.step(0).unwrap();
        }
        let size = env.config.arena_size;
        assert!(env.x >= AGENT_RADIUS && env.x <= size - AGENT_RADIUS);
        assert!(env.y >= AGENT_RADIUS && env.y <= size - AGENT_RADIUS);
    }
}
