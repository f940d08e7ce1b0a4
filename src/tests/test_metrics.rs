use crate::metrics::{mean, ScoreWindow, Statistics};

#[test]
fn test_window_evicts_oldest_first() {
    let mut window = ScoreWindow::new(3);
    assert_eq!(window.push(1.0), None);
    assert_eq!(window.push(2.0), None);
    assert_eq!(window.push(3.0), None);
    assert!(window.is_full());
    assert_eq!(window.push(4.0), Some(1.0));
    assert_eq!(window.push(5.0), Some(2.0));
    assert_eq!(window.iter().collect::<Vec<_>>(), vec![3.0, 4.0, 5.0]);
    assert_eq!(window.len(), 3);
}

#[test]
fn test_window_mean_matches_recomputation() {
    let mut window = ScoreWindow::default();
    let scores: Vec<f32> = (0..250).map(|i| ((i * 7) % 23) as f32 - 5.0).collect();
    for (i, &score) in scores.iter().enumerate() {
        window.push(score);
        let start = (i + 1).saturating_sub(100);
        let expected = mean(&scores[start..=i]).unwrap();
        assert!((window.mean().unwrap() - expected).abs() < 1e-4);
    }
    assert_eq!(window.capacity(), 100);
}

#[test]
fn test_empty_window() {
    let mut window = ScoreWindow::new(4);
    assert!(window.is_empty());
    assert_eq!(window.mean(), None);
    assert_eq!(window.iter().count(), 0);
    window.push(2.0);
    assert!(!window.is_empty());
    assert_eq!(window.mean(), Some(2.0));
}

#[test]
fn test_statistics() {
    let stats = Statistics::from_slice(&[1.0, 2.0, 3.0, 4.0]);
    assert_eq!(stats.count, 4);
    assert!((stats.mean - 2.5).abs() < 1e-6);
    assert_eq!(stats.min, 1.0);
    assert_eq!(stats.max, 4.0);
    assert!((stats.std - 1.118034).abs() < 1e-5);

    let empty = Statistics::from_slice(&[]);
    assert_eq!(empty.count, 0);
    assert_eq!(mean(&[]), None);
}
