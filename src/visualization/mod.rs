//! Score reporting: PNG line plots, terminal plots and the mean reward line.

use std::path::Path;

use crate::error::Result;
use crate::metrics;

pub mod plot;
pub mod text_plots;

pub use plot::{render_scores, save_score_plot, DEFAULT_PLOT_PATH};
pub use text_plots::{histogram, plot_scores, scores_summary};

/// Plot `scores` to `path` and print their mean.
///
/// An empty score list still writes an (empty) plot and prints `NaN`.
pub fn report<P: AsRef<Path>>(scores: &[f32], path: P) -> Result<()> {
    save_score_plot(scores, path)?;
    println!("Mean reward: {}", metrics::mean(scores).unwrap_or(f32::NAN));
    Ok(())
}
