pub mod score_window;
pub mod statistics;

pub use score_window::ScoreWindow;
pub use statistics::{mean, Statistics};
