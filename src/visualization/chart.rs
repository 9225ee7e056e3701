//! Grouped bar chart rendered in memory with plotters' SVG backend

use crate::error::{InsightError, Result};
use base64::Engine;
use plotters::prelude::*;
use plotters::coord::ranged1d::{DefaultFormatting, KeyPointHint};
use plotters::coord::types::RangedCoordf64;
use plotters::style::text_anchor::{HPos, Pos, VPos};

const CHART_WIDTH: u32 = 600;
const CHART_HEIGHT: u32 = 400;

/// Viridis endpoints and midpoint
const PALETTE: [RGBColor; 3] = [
    RGBColor(68, 1, 84),
    RGBColor(33, 145, 140),
    RGBColor(253, 231, 37),
];

/// Row counts per (category, group) pair. Categories and groups keep the
/// order in which they were first seen.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedCounts {
    pub categories: Vec<String>,
    pub groups: Vec<String>,
    /// `counts[category][group]`
    pub counts: Vec<Vec<usize>>,
}

impl GroupedCounts {
    /// Count rows by category and group. Both slices are per row.
    pub fn tally(categories: &[String], groups: &[String]) -> Result<Self> {
        if categories.len() != groups.len() {
            return Err(InsightError::ShapeError {
                expected: format!("{} group labels", categories.len()),
                actual: format!("{} group labels", groups.len()),
            });
        }

        let mut cat_keys: Vec<String> = Vec::new();
        let mut group_keys: Vec<String> = Vec::new();
        for g in groups {
            if !group_keys.contains(g) {
                group_keys.push(g.clone());
            }
        }

        let mut counts: Vec<Vec<usize>> = Vec::new();
        for (cat, group) in categories.iter().zip(groups) {
            let ci = match cat_keys.iter().position(|c| c == cat) {
                Some(i) => i,
                None => {
                    cat_keys.push(cat.clone());
                    counts.push(vec![0; group_keys.len()]);
                    cat_keys.len() - 1
                }
            };
            if let Some(gi) = group_keys.iter().position(|g| g == group) {
                counts[ci][gi] += 1;
            }
        }

        Ok(Self {
            categories: cat_keys,
            groups: group_keys,
            counts,
        })
    }

    pub fn max_count(&self) -> usize {
        self.counts
            .iter()
            .flat_map(|row| row.iter().copied())
            .max()
            .unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.iter().flat_map(|row| row.iter()).sum()
    }
}

fn chart_err<E: std::fmt::Display>(e: E) -> InsightError {
    InsightError::ChartError(e.to_string())
}

fn group_color(idx: usize, n_groups: usize) -> RGBColor {
    if n_groups <= 1 {
        return RGBColor(128, 128, 128);
    }
    // spread groups across the palette ends first
    let pos = idx * (PALETTE.len() - 1) / (n_groups - 1).max(1);
    PALETTE[pos.min(PALETTE.len() - 1)]
}

/// `RangedCoordf64` opts out of default formatting, which leaves
/// `WithKeyPoints<RangedCoordf64>` without a `ValueFormatter`; this thin
/// delegate restores it so the mesh can be configured.
struct SlotAxis(RangedCoordf64);

impl Ranged for SlotAxis {
    type ValueType = f64;
    type FormatOption = DefaultFormatting;

    fn range(&self) -> std::ops::Range<f64> {
        self.0.range()
    }

    fn map(&self, value: &f64, limit: (i32, i32)) -> i32 {
        self.0.map(value, limit)
    }

    fn key_points<Hint: KeyPointHint>(&self, hint: Hint) -> Vec<f64> {
        self.0.key_points(hint)
    }

    fn axis_pixel_range(&self, limit: (i32, i32)) -> std::ops::Range<i32> {
        self.0.axis_pixel_range(limit)
    }
}

/// Render a grouped bar chart as an SVG document
pub fn render_grouped_bars(title: &str, x_desc: &str, data: &GroupedCounts) -> Result<String> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (CHART_WIDTH, CHART_HEIGHT)).into_drawing_area();
        root.fill(&WHITE).map_err(chart_err)?;

        let n_cat = data.categories.len().max(1);
        let n_groups = data.groups.len().max(1);
        let y_max = (data.max_count().max(1) * 6).div_ceil(5) as u32;

        // one unit-wide slot per category, labelled at its center
        let centers: Vec<f64> = (0..data.categories.len()).map(|ci| ci as f64 + 0.5).collect();
        let x_range = SlotAxis((0f64..n_cat as f64).into()).with_key_points(centers);

        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 20).into_font())
            .margin(10)
            .x_label_area_size(35)
            .y_label_area_size(45)
            .build_cartesian_2d(x_range, 0u32..y_max)
            .map_err(chart_err)?;

        let category_at = |x: &f64| {
            data.categories
                .get(x.floor() as usize)
                .cloned()
                .unwrap_or_default()
        };
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_label_formatter(&category_at)
            .y_labels((y_max as usize).min(10) + 1)
            .x_desc(x_desc)
            .y_desc("count")
            .draw()
            .map_err(chart_err)?;

        // bars of one category share 80% of its slot
        let bar_width = 0.8 / n_groups as f64;
        for (gi, group) in data.groups.iter().enumerate() {
            let color = group_color(gi, n_groups);
            let bars = data.categories.iter().enumerate().map(|(ci, _)| {
                let x0 = ci as f64 + 0.1 + gi as f64 * bar_width;
                let count = data.counts[ci][gi] as u32;
                Rectangle::new([(x0, 0), (x0 + bar_width, count)], color.filled())
            });
            chart
                .draw_series(bars)
                .map_err(chart_err)?
                .label(group.clone())
                .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));

            let value_style = TextStyle::from(("sans-serif", 12).into_font())
                .pos(Pos::new(HPos::Center, VPos::Bottom));
            let labels = data.categories.iter().enumerate().map(|(ci, _)| {
                let x = ci as f64 + 0.1 + (gi as f64 + 0.5) * bar_width;
                let count = data.counts[ci][gi] as u32;
                Text::new(count.to_string(), (x, count), value_style.clone())
            });
            chart.draw_series(labels).map_err(chart_err)?;
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(chart_err)?;

        root.present().map_err(chart_err)?;
    }
    Ok(svg)
}

/// Base64 transport encoding for a rendered chart
pub fn encode_base64(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}
