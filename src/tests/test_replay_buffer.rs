use ndarray::array;

use crate::error::DqnError;
use crate::replay_buffer::{Experience, ReplayBuffer};

fn numbered(i: usize) -> Experience {
    Experience {
        state: array![i as f32],
        action: i % 4,
        reward: i as f32,
        next_state: array![(i + 1) as f32],
        done: false,
    }
}

#[test]
fn test_replay_buffer_add_and_sample() {
    let mut replay_buffer = ReplayBuffer::new(10, 0);
    let experience = Experience {
        state: array![0.5, -0.5],
        action: 0,
        reward: 1.0,
        next_state: array![0.6, -0.4],
        done: false,
    };
    replay_buffer.add(experience.clone());
    assert_eq!(replay_buffer.len(), 1);
    let sample = replay_buffer.sample(1).unwrap();
    assert_eq!(sample[0], &experience);
}

#[test]
fn test_replay_buffer_capacity() {
    let mut buffer = ReplayBuffer::new(3, 0);
    for i in 0..5 {
        buffer.add(numbered(i));
    }

    // Should only keep last 3
    assert_eq!(buffer.len(), 3);
    let mut rewards: Vec<f32> = buffer.sample(3).unwrap().iter().map(|e| e.reward).collect();
    rewards.sort_by(|a, b| a.partial_cmp(b).unwrap());
    assert_eq!(rewards, vec![2.0, 3.0, 4.0]);
}

#[test]
fn test_sample_is_without_replacement() {
    let mut buffer = ReplayBuffer::new(50, 3);
    for i in 0..20 {
        buffer.add(numbered(i));
    }
    let mut rewards: Vec<f32> = buffer.sample(20).unwrap().iter().map(|e| e.reward).collect();
    rewards.sort_by(|a, b| a.partial_cmp(b).unwrap());
    rewards.dedup();
    assert_eq!(rewards.len(), 20);

    // asking for more than stored returns everything once
    assert_eq!(buffer.sample(64).unwrap().len(), 20);
}

#[test]
fn test_empty_buffer_sample_is_an_error() {
    let mut buffer = ReplayBuffer::new(8, 0);
    assert!(buffer.is_empty());
    assert!(matches!(buffer.sample(4), Err(DqnError::EmptyBuffer(_))));
}

#[test]
fn test_same_seed_same_samples() {
    let mut a = ReplayBuffer::new(100, 42);
    let mut b = ReplayBuffer::new(100, 42);
    for i in 0..100 {
        a.add(numbered(i));
        b.add(numbered(i));
    }
    for _ in 0..5 {
        let left: Vec<f32> = a.sample(8).unwrap().iter().map(|e| e.reward).collect();
        let right: Vec<f32> = b.sample(8).unwrap().iter().map(|e| e.reward).collect();
        assert_eq!(left, right);
    }
}
