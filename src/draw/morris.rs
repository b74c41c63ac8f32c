use std::path::Path;

use anyhow::Result;
use plotters::coord::Shift;
use plotters::prelude::*;

use super::config::PlotConfig;
use super::{category_label, rgb};
use crate::sim::sensitivity::MorrisIndices;

const UNIT: &str = "°C SET";

/// Stroke pattern of a reference line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineDash {
    Solid,
    Dashed,
    DashDot,
}

impl LineDash {
    /// Alternating on/off lengths as fractions of the line length.
    fn pattern(self) -> &'static [f64] {
        match self {
            LineDash::Solid => &[1.0],
            LineDash::Dashed => &[0.05, 0.03],
            LineDash::DashDot => &[0.05, 0.025, 0.01, 0.025],
        }
    }
}

/// Reference slopes `sigma / mu_star` of the covariance plot with their stroke.
pub const COVARIANCE_RATIOS: [(f64, LineDash, RGBColor); 3] = [
    (1.0, LineDash::Solid, RGBColor(0, 0, 0)),
    (0.5, LineDash::Dashed, RGBColor(90, 90, 90)),
    (0.1, LineDash::DashDot, RGBColor(150, 150, 150)),
];

/// Draws the Morris bar plot and covariance plot side by side into a PNG file.
pub fn draw_morris(path: &Path, indices: &MorrisIndices, config: &PlotConfig) -> Result<()> {
    let root = BitMapBackend::new(path, (config.width, config.height)).into_drawing_area();
    root.fill(&WHITE)?;
    let panels = root.split_evenly((1, 2));

    draw_bars(&panels[0], indices, config)?;
    draw_covariance(&panels[1], indices, config)?;

    root.present()?;
    Ok(())
}

/// Horizontal bars of `mu_star` with confidence intervals, largest on top.
fn draw_bars(
    area: &DrawingArea<BitMapBackend<'_>, Shift>,
    indices: &MorrisIndices,
    config: &PlotConfig,
) -> Result<()> {
    let order = indices.sorted_by_mu_star();
    let n = order.len();
    // Category k is drawn at y = k, counted from the bottom
    let names: Vec<String> = order.iter().rev().map(|&i| indices.names[i].clone()).collect();

    let x_max = order
        .iter()
        .map(|&i| indices.mu_star[i] + indices.mu_star_conf[i])
        .fold(0.0_f64, f64::max)
        .max(1e-9)
        * 1.1;

    let mut chart = ChartBuilder::on(area)
        .caption("Morris mu*", (config.font_family.as_str(), config.caption_size))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(80)
        .build_cartesian_2d(0.0..x_max, -0.5..(n as f64 - 0.5))?;

    chart
        .configure_mesh()
        .disable_y_mesh()
        .light_line_style(BLACK.mix(config.grid_alpha))
        .x_desc(format!("mu* ({UNIT})"))
        .y_labels(n)
        .y_label_formatter(&|v| category_label(&names, *v))
        .draw()?;

    let bar = rgb(config.bar_color);
    for (rank, &i) in order.iter().enumerate() {
        let y = (n - 1 - rank) as f64;
        let (mu_star, conf) = (indices.mu_star[i], indices.mu_star_conf[i]);
        chart.draw_series(std::iter::once(Rectangle::new(
            [(0.0, y - 0.35), (mu_star, y + 0.35)],
            bar.filled(),
        )))?;

        let lo = (mu_star - conf).max(0.0);
        let hi = mu_star + conf;
        chart.draw_series([
            PathElement::new(vec![(lo, y), (hi, y)], BLACK),
            PathElement::new(vec![(lo, y - 0.1), (lo, y + 0.1)], BLACK),
            PathElement::new(vec![(hi, y - 0.1), (hi, y + 0.1)], BLACK),
        ])?;
    }

    Ok(())
}

/// `sigma` against `mu_star` with the reference ratio lines.
fn draw_covariance(
    area: &DrawingArea<BitMapBackend<'_>, Shift>,
    indices: &MorrisIndices,
    config: &PlotConfig,
) -> Result<()> {
    let x_max = indices.mu_star.iter().copied().fold(0.0_f64, f64::max).max(1e-9) * 1.1;
    let y_max = indices.sigma.iter().copied().fold(0.0_f64, f64::max).max(1e-9) * 1.1;

    let mut chart = ChartBuilder::on(area)
        .caption("Morris covariance", (config.font_family.as_str(), config.caption_size))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..x_max, 0.0..y_max)?;

    chart
        .configure_mesh()
        .light_line_style(BLACK.mix(config.grid_alpha))
        .x_desc(format!("mu* ({UNIT})"))
        .y_desc(format!("sigma ({UNIT})"))
        .draw()?;

    for ((ratio, [from, to]), &(_, dash, color)) in
        covariance_lines(x_max, y_max).into_iter().zip(&COVARIANCE_RATIOS)
    {
        let style = color.stroke_width(2);
        chart
            .draw_series(
                dash_segments(from, to, dash)
                    .into_iter()
                    .map(move |piece| PathElement::new(piece.to_vec(), style)),
            )?
            .label(format!("sigma / mu* = {ratio:.1}"))
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));
    }

    let marker = rgb(config.line_color);
    for i in 0..indices.names.len() {
        let point = (indices.mu_star[i], indices.sigma[i]);
        chart.draw_series(std::iter::once(Circle::new(point, 4, marker.filled())))?;
        chart.draw_series(std::iter::once(Text::new(
            indices.names[i].clone(),
            point,
            (config.font_family.as_str(), 14.0),
        )))?;
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    Ok(())
}

/// Segments `sigma = ratio * mu_star` from the origin to the edge of the
/// `[0, x_max] x [0, y_max]` plot area.
pub fn covariance_lines(x_max: f64, y_max: f64) -> Vec<(f64, [(f64, f64); 2])> {
    COVARIANCE_RATIOS
        .iter()
        .map(|&(r, _, _)| {
            let x_end = x_max.min(y_max / r);
            (r, [(0.0, 0.0), (x_end, r * x_end)])
        })
        .collect()
}

/// Splits the segment `from -> to` into the visible pieces of `dash`.
pub fn dash_segments(from: (f64, f64), to: (f64, f64), dash: LineDash) -> Vec<[(f64, f64); 2]> {
    let at = |t: f64| (from.0 + t * (to.0 - from.0), from.1 + t * (to.1 - from.1));
    let pattern = dash.pattern();
    let mut pieces = Vec::new();
    let mut t = 0.0;
    let mut k = 0;
    while t < 1.0 {
        let end = (t + pattern[k % pattern.len()]).min(1.0);
        if k % 2 == 0 {
            pieces.push([at(t), at(end)]);
        }
        t = end;
        k += 1;
    }
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_covariance_lines() {
        let lines = covariance_lines(2.0, 10.0);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], (1.0, [(0.0, 0.0), (2.0, 2.0)]));
        assert_eq!(lines[1].1[1], (2.0, 1.0));
        assert!((lines[2].1[1].1 - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_covariance_lines_stay_in_plot_area() {
        for (x_max, y_max) in [(2.0, 10.0), (10.0, 0.5), (5.5, 2.2), (1e-9, 1e-9)] {
            for (ratio, [from, to]) in covariance_lines(x_max, y_max) {
                for (x, y) in [from, to] {
                    assert!((0.0..=x_max).contains(&x), "ratio {ratio}: x = {x}");
                    assert!(y >= 0.0 && y <= y_max * (1.0 + 1e-12), "ratio {ratio}: y = {y}");
                }
                assert!((to.1 - ratio * to.0).abs() < 1e-12);
            }
        }
        // Steep line clipped at the top edge
        let lines = covariance_lines(10.0, 0.5);
        assert_eq!(lines[0].1[1], (0.5, 0.5));
        assert_eq!(lines[1].1[1], (1.0, 0.5));
    }

    #[test]
    fn test_reference_lines_have_distinct_strokes() {
        for i in 0..COVARIANCE_RATIOS.len() {
            for j in i + 1..COVARIANCE_RATIOS.len() {
                assert_ne!(COVARIANCE_RATIOS[i].1, COVARIANCE_RATIOS[j].1);
            }
        }
    }

    #[test]
    fn test_dash_segments() {
        let solid = dash_segments((0.0, 0.0), (2.0, 1.0), LineDash::Solid);
        assert_eq!(solid, vec![[(0.0, 0.0), (2.0, 1.0)]]);

        let dashed = dash_segments((0.0, 0.0), (1.0, 0.0), LineDash::Dashed);
        assert!(dashed.len() > 1);
        assert!((dashed[0][1].0 - 0.05).abs() < 1e-12);
        assert!((dashed[1][0].0 - 0.08).abs() < 1e-12);
        let drawn: f64 = dashed.iter().map(|[a, b]| b.0 - a.0).sum();
        assert!(drawn > 0.5 && drawn < 0.7, "drawn fraction {drawn}");
        for [a, b] in &dashed {
            assert!(a.0 < b.0 && b.0 <= 1.0);
        }

        let dash_dot = dash_segments((0.0, 0.0), (1.0, 0.0), LineDash::DashDot);
        assert!((dash_dot[1][1].0 - dash_dot[1][0].0 - 0.01).abs() < 1e-12);
    }
}
