#[cfg(test)]
mod property_tests {
    use banana_dqn::metrics::{mean, ScoreWindow};
    use banana_dqn::replay_buffer::{Experience, ReplayBuffer};
    use banana_dqn::training::EpsilonSchedule;
    use ndarray::array;
    use proptest::prelude::*;

    fn scores_strategy() -> impl Strategy<Value = Vec<f32>> {
        prop::collection::vec(-50.0f32..50.0, 0..400)
    }

    proptest! {
        #[test]
        fn test_window_holds_the_most_recent_scores(scores in scores_strategy(), capacity in 1usize..150) {
            let mut window = ScoreWindow::new(capacity);
            for &score in &scores {
                window.push(score);
            }
            let start = scores.len().saturating_sub(capacity);
            let expected = &scores[start..];
            prop_assert_eq!(window.len(), expected.len());
            prop_assert_eq!(window.iter().collect::<Vec<_>>(), expected.to_vec());
            match (window.mean(), mean(expected)) {
                (Some(got), Some(want)) => prop_assert!((got - want).abs() < 1e-3),
                (None, None) => {}
                other => prop_assert!(false, "mismatched means {:?}", other),
            }
        }

        #[test]
        fn test_epsilon_stays_within_bounds(
            start in 0.0f32..=1.0,
            floor_fraction in 0.0f32..=1.0,
            decay in 0.01f32..=1.0,
            episodes in 0usize..3000,
        ) {
            let end = start * floor_fraction;
            let mut schedule = EpsilonSchedule::new(start, end, decay).unwrap();
            let mut previous = schedule.value();
            for _ in 0..episodes {
                let eps = schedule.advance();
                prop_assert!(eps <= previous);
                prop_assert!(eps >= end && eps <= start);
                previous = eps;
            }
        }

        #[test]
        fn test_replay_buffer_never_exceeds_capacity(capacity in 1usize..64, adds in 0usize..200, batch in 1usize..80) {
            let mut buffer = ReplayBuffer::new(capacity, 0);
            for i in 0..adds {
                buffer.add(Experience {
                    state: array![i as f32],
                    action: 0,
                    reward: i as f32,
                    next_state: array![i as f32 + 1.0],
                    done: false,
                });
            }
            let stored = buffer.len();
            prop_assert_eq!(stored, adds.min(capacity));
            if adds > 0 {
                let sample = buffer.sample(batch).unwrap();
                prop_assert_eq!(sample.len(), batch.min(stored));
                let oldest_kept = adds.saturating_sub(capacity) as f32;
                prop_assert!(sample.iter().all(|e| e.reward >= oldest_kept));
            } else {
                prop_assert!(buffer.sample(batch).is_err());
            }
        }
    }
}
