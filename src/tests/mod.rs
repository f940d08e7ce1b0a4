// Test modules for all components
pub mod fixtures;
pub mod test_metrics;
pub mod test_replay_buffer;
