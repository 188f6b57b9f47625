// src/renderer.rs

use crate::error::{HistoryError, HistoryResult};
use crate::model::AlignedSeries;
use image::{Rgb, RgbImage};
use indicatif::{ParallelProgressIterator, ProgressBar};
use log::info;
use palette::{FromColor, Lch, Srgb};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::path::Path;

pub const DEFAULT_WIDTH: u32 = 1280;
pub const DEFAULT_HEIGHT: u32 = 720;

const MARGIN: u32 = 40;
const SWATCH: u32 = 12;
const BACKGROUND: Rgb<u8> = Rgb([8, 8, 12]);
const AXIS: Rgb<u8> = Rgb([90, 90, 100]);

#[derive(Debug, Clone, Copy)]
pub struct ChartOptions {
    pub width: u32,
    pub height: u32,
    pub show_progress: bool,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            show_progress: true,
        }
    }
}

/// Colour assigned to each language, in stacking order
#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub language: String,
    pub color: Rgb<u8>,
}

impl LegendEntry {
    pub fn hex(&self) -> String {
        let Rgb([r, g, b]) = self.color;
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    }
}

pub fn legend(series: &AlignedSeries) -> Vec<LegendEntry> {
    series
        .languages()
        .zip(generate_language_colors(series.series.len()))
        .map(|(language, color)| LegendEntry {
            language: language.to_string(),
            color,
        })
        .collect()
}

/// Renders and writes the chart as a PNG, returning the legend that goes with it.
pub fn save_chart(
    series: &AlignedSeries,
    options: &ChartOptions,
    path: &Path,
) -> HistoryResult<Vec<LegendEntry>> {
    let image = render_chart(series, options)?;
    image.save(path)?;
    info!("Wrote {}x{} chart to {}", options.width, options.height, path.display());
    Ok(legend(series))
}

/// Draws a stacked area chart: time on x, stacked line counts on y, languages
/// stacked bottom-up in series order. Values between samples are interpolated.
pub fn render_chart(series: &AlignedSeries, options: &ChartOptions) -> HistoryResult<RgbImage> {
    if series.is_empty() {
        return Err(HistoryError::EmptyStore);
    }
    if options.width <= 2 * MARGIN || options.height <= 2 * MARGIN {
        return Err(HistoryError::configuration(format!(
            "chart must be larger than {}x{} pixels",
            2 * MARGIN,
            2 * MARGIN
        )));
    }

    let plot_width = options.width - 2 * MARGIN;
    let plot_height = options.height - 2 * MARGIN;
    let colors = generate_language_colors(series.series.len());
    let times: Vec<f64> = series.timestamps.iter().map(|ts| ts.timestamp() as f64).collect();
    let start = times[0];
    let span = times[times.len() - 1] - start;
    let max_total = series.totals().into_iter().max().unwrap_or(0).max(1) as f64;

    let bar = if options.show_progress {
        ProgressBar::new(plot_width as u64)
    } else {
        ProgressBar::hidden()
    };
    bar.set_message("Rendering chart");

    let columns: Vec<Vec<Rgb<u8>>> = (0..plot_width)
        .into_par_iter()
        .progress_with(bar)
        .map(|x| {
            let t = if plot_width > 1 {
                start + span * x as f64 / (plot_width - 1) as f64
            } else {
                start
            };
            let values = values_at(series, &times, t);
            render_column(&values, max_total, plot_height, &colors)
        })
        .collect();

    let mut image = RgbImage::from_pixel(options.width, options.height, BACKGROUND);
    for (x, column) in columns.iter().enumerate() {
        for (y, pixel) in column.iter().enumerate() {
            image.put_pixel(MARGIN + x as u32, MARGIN + y as u32, *pixel);
        }
    }
    draw_axes(&mut image, plot_width, plot_height);
    draw_legend(&mut image, &colors);

    Ok(image)
}

/// Per-language values at time `t`, linearly interpolated between the
/// surrounding samples and clamped to the first and last one.
fn values_at(series: &AlignedSeries, times: &[f64], t: f64) -> Vec<f64> {
    let after = times.partition_point(|&s| s <= t);
    if after == 0 || after == times.len() {
        let i = if after == 0 { 0 } else { times.len() - 1 };
        return series.series.iter().map(|s| s.counts[i] as f64).collect();
    }

    let (i0, i1) = (after - 1, after);
    let width = times[i1] - times[i0];
    let frac = if width > 0.0 { (t - times[i0]) / width } else { 0.0 };
    series
        .series
        .iter()
        .map(|s| {
            let (a, b) = (s.counts[i0] as f64, s.counts[i1] as f64);
            a + (b - a) * frac
        })
        .collect()
}

/// One pixel column of the plot area, top to bottom
fn render_column(
    values: &[f64],
    max_total: f64,
    plot_height: u32,
    colors: &[Rgb<u8>],
) -> Vec<Rgb<u8>> {
    (0..plot_height)
        .map(|y| {
            let level = (plot_height - y) as f64 / plot_height as f64 * max_total;
            let mut cumulative = 0.0;
            for (value, color) in values.iter().zip(colors) {
                cumulative += value;
                if cumulative >= level {
                    return *color;
                }
            }
            BACKGROUND
        })
        .collect()
}

fn draw_axes(image: &mut RgbImage, plot_width: u32, plot_height: u32) {
    let bottom = MARGIN + plot_height;
    for x in MARGIN - 1..=MARGIN + plot_width {
        image.put_pixel(x, bottom, AXIS);
    }
    for y in MARGIN..=bottom {
        image.put_pixel(MARGIN - 1, y, AXIS);
    }
}

// Swatches along the top margin, in stacking order; the names go to stdout.
fn draw_legend(image: &mut RgbImage, colors: &[Rgb<u8>]) {
    let top = (MARGIN - SWATCH) / 2;
    for (i, color) in colors.iter().enumerate() {
        let left = MARGIN + i as u32 * (SWATCH + 4);
        if left + SWATCH > image.width() {
            break;
        }
        for x in left..left + SWATCH {
            for y in top..top + SWATCH {
                image.put_pixel(x, y, *color);
            }
        }
    }
}

fn generate_language_colors(num_languages: usize) -> Vec<Rgb<u8>> {
    let mut rng = StdRng::seed_from_u64(42); // Seed for deterministic colors
    (0..num_languages)
        .map(|_| {
            let hue = rng.gen_range(0.0f32..360.0f32);
            let color = Lch::new(70.0f32, 80.0f32, hue); // Bright, saturated colors
            let srgb: Srgb<f32> = Srgb::from_color(color);
            let (r, g, b) = srgb.into_components();
            Rgb([
                (r.clamp(0.0, 1.0) * 255.0) as u8,
                (g.clamp(0.0, 1.0) * 255.0) as u8,
                (b.clamp(0.0, 1.0) * 255.0) as u8,
            ])
        })
        .collect()
}
