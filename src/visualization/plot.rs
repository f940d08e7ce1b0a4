use std::path::Path;

use image::{ImageFormat, Rgb, RgbImage};
use log::info;

use crate::error::Result;
use crate::metrics::ScoreWindow;

/// Default output path of the score plot.
pub const DEFAULT_PLOT_PATH: &str = "eval_plot.png";

const WIDTH: u32 = 640;
const HEIGHT: u32 = 480;
const MARGIN: u32 = 40;
const TICK: u32 = 4;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const AXIS: Rgb<u8> = Rgb([0, 0, 0]);
const GRID: Rgb<u8> = Rgb([225, 225, 225]);
const SCORE: Rgb<u8> = Rgb([31, 119, 180]);
const AVERAGE: Rgb<u8> = Rgb([255, 127, 14]);

/// Maps data coordinates onto the plot area.
struct Frame {
    x_max: f32,
    y_min: f32,
    y_max: f32,
}

impl Frame {
    fn new(scores: &[f32]) -> Self {
        let finite = scores.iter().copied().filter(|s| s.is_finite());
        let (mut y_min, mut y_max) = finite.fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), s| {
            (lo.min(s), hi.max(s))
        });
        if !y_min.is_finite() {
            y_min = 0.0;
            y_max = 1.0;
        }
        if (y_max - y_min).abs() < f32::EPSILON {
            y_min -= 1.0;
            y_max += 1.0;
        }
        Frame {
            x_max: scores.len().saturating_sub(1).max(1) as f32,
            y_min,
            y_max,
        }
    }

    fn to_pixel(&self, index: usize, value: f32) -> (i64, i64) {
        let plot_w = (WIDTH - 2 * MARGIN) as f32;
        let plot_h = (HEIGHT - 2 * MARGIN) as f32;
        let x = MARGIN as f32 + index as f32 / self.x_max * plot_w;
        let y = (HEIGHT - MARGIN) as f32 - (value - self.y_min) / (self.y_max - self.y_min) * plot_h;
        (x.round() as i64, y.round() as i64)
    }
}

fn put(img: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>) {
    if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
        img.put_pixel(x as u32, y as u32, color);
    }
}

/// Bresenham line between two pixel coordinates.
fn draw_line(img: &mut RgbImage, from: (i64, i64), to: (i64, i64), color: Rgb<u8>) {
    let (mut x0, mut y0) = from;
    let (x1, y1) = to;
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        put(img, x0, y0, color);
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

fn draw_series(img: &mut RgbImage, frame: &Frame, values: &[f32], offset: usize, color: Rgb<u8>) {
    let points: Vec<(i64, i64)> = values
        .iter()
        .enumerate()
        .filter(|(_, v)| v.is_finite())
        .map(|(i, &v)| frame.to_pixel(i + offset, v))
        .collect();
    match points.as_slice() {
        [] => {}
        [single] => put(img, single.0, single.1, color),
        _ => {
            for pair in points.windows(2) {
                draw_line(img, pair[0], pair[1], color);
            }
        }
    }
}

fn draw_axes(img: &mut RgbImage, frame: &Frame) {
    let left = MARGIN as i64;
    let right = (WIDTH - MARGIN) as i64;
    let top = MARGIN as i64;
    let bottom = (HEIGHT - MARGIN) as i64;

    for k in 0..=4 {
        let y = bottom - (bottom - top) * k / 4;
        draw_line(img, (left, y), (right, y), GRID);
        draw_line(img, (left - TICK as i64, y), (left, y), AXIS);
    }
    for k in 0..=4 {
        let x = left + (right - left) * k / 4;
        draw_line(img, (x, bottom), (x, bottom + TICK as i64), AXIS);
    }
    if frame.y_min < 0.0 && frame.y_max > 0.0 {
        let (_, zero) = frame.to_pixel(0, 0.0);
        draw_line(img, (left, zero), (right, zero), Rgb([180, 180, 180]));
    }
    draw_line(img, (left, top), (left, bottom), AXIS);
    draw_line(img, (left, bottom), (right, bottom), AXIS);
}

/// Render the score trajectory (x = episode index, y = score) together with
/// its trailing 100-episode average.
pub fn render_scores(scores: &[f32]) -> RgbImage {
    let mut img = RgbImage::from_pixel(WIDTH, HEIGHT, BACKGROUND);
    let frame = Frame::new(scores);
    draw_axes(&mut img, &frame);
    draw_series(&mut img, &frame, scores, 0, SCORE);

    if scores.len() > 1 {
        let mut window = ScoreWindow::default();
        let averages: Vec<f32> = scores
            .iter()
            .map(|&s| {
                window.push(s);
                window.mean().unwrap_or(s)
            })
            .collect();
        draw_series(&mut img, &frame, &averages, 0, AVERAGE);
    }
    img
}

/// Write the score plot as PNG to `path`, replacing any existing file.
pub fn save_score_plot<P: AsRef<Path>>(scores: &[f32], path: P) -> Result<()> {
    let img = render_scores(scores);
    img.save_with_format(path.as_ref(), ImageFormat::Png)?;
    info!("Wrote score plot ({} episodes) to {}", scores.len(), path.as_ref().display());
    Ok(())
}
