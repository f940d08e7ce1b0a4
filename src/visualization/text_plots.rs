use crate::metrics::Statistics;

/// Plot a score series as ASCII art for the terminal.
pub fn plot_scores(values: &[f32], title: &str, width: usize, height: usize) -> String {
    if values.is_empty() || width < 10 || height < 5 {
        return format!("{}: Invalid data or dimensions", title);
    }

    let min_val = values.iter().copied().fold(f32::INFINITY, f32::min);
    let max_val = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);

    if (max_val - min_val).abs() < f32::EPSILON {
        return format!("{}: All values are {:.4}", title, min_val);
    }

    let mut plot = vec![vec![' '; width]; height];

    for row in plot.iter_mut() {
        row[0] = '|';
    }
    for cell in plot[height - 1].iter_mut() {
        *cell = '-';
    }
    plot[height - 1][0] = '+';

    let x_scale = (values.len() - 1).max(1) as f32 / (width - 3) as f32;
    let y_scale = (height - 3) as f32 / (max_val - min_val);

    for (i, &value) in values.iter().enumerate() {
        let x = ((i as f32 / x_scale) as usize + 2).min(width - 1);
        let rise = ((value - min_val) * y_scale) as usize;
        let y = (height - 3).saturating_sub(rise).min(height - 2);
        plot[y][x] = '*';
    }

    let mut output = format!("{}\n", title);
    output.push_str(&format!("Max: {:.4}\n", max_val));
    for row in plot.iter() {
        output.push_str(&row.iter().collect::<String>());
        output.push('\n');
    }
    output.push_str(&format!("Min: {:.4}\n", min_val));
    output.push_str(&format!("Points: {}\n", values.len()));
    output
}

/// Bucketed counts of the scores
pub fn histogram(values: &[f32], bins: usize) -> String {
    if values.is_empty() || bins == 0 {
        return "No data for histogram".to_string();
    }

    let min_val = values.iter().copied().fold(f32::INFINITY, f32::min);
    let max_val = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);

    if (max_val - min_val).abs() < f32::EPSILON {
        return format!("All values are {:.4}", min_val);
    }

    let bin_width = (max_val - min_val) / bins as f32;
    let mut counts = vec![0usize; bins];
    for &value in values {
        let bin = (((value - min_val) / bin_width).floor() as usize).min(bins - 1);
        counts[bin] += 1;
    }

    let max_count = counts.iter().copied().max().unwrap_or(1).max(1);
    let scale = 40.0 / max_count as f32;

    let mut output = String::from("Histogram:\n");
    for (i, &count) in counts.iter().enumerate() {
        let bin_start = min_val + i as f32 * bin_width;
        let bin_end = bin_start + bin_width;
        let bar = "#".repeat((count as f32 * scale) as usize);
        output.push_str(&format!("[{:>7.2}, {:>7.2}): {:>4} {}\n", bin_start, bin_end, count, bar));
    }
    output
}

/// One-paragraph summary of a score list
pub fn scores_summary(values: &[f32]) -> String {
    let stats = Statistics::from_slice(values);
    format!(
        "Episodes: {} | Mean: {:.2} | Std: {:.2} | Min: {:.2} | Max: {:.2}",
        stats.count, stats.mean, stats.std, stats.min, stats.max
    )
}
