use std::path::Path;

use anyhow::Result;
use ndarray::Array2;
use plotters::coord::Shift;
use plotters::prelude::*;

use super::config::PlotConfig;
use super::rgb;
use crate::sim::surrogate::SurrogateResult;

/// Draws SET, the metamodel prediction and their difference as three heatmaps.
pub fn draw_surrogate(path: &Path, result: &SurrogateResult, config: &PlotConfig) -> Result<()> {
    anyhow::ensure!(
        result.tdb.len() >= 2 && result.tr.len() >= 2,
        "Heatmaps need at least 2 grid points per axis"
    );
    let root = BitMapBackend::new(path, (config.width, config.height)).into_drawing_area();
    root.fill(&WHITE)?;
    let panels = root.split_evenly((1, 3));

    // SET and metamodel share one color range
    let (lo, hi) = value_range(result.set_grid.iter().chain(result.meta_grid.iter()));
    let levels = contour_levels(lo, hi, config.contour_levels);
    draw_heatmap(&panels[0], "SET [°C]", result, &result.set_grid, (lo, hi), &levels, config)?;
    let meta_title = "Metamodel SET [°C]";
    draw_heatmap(&panels[1], meta_title, result, &result.meta_grid, (lo, hi), &levels, config)?;

    let diff = result.difference();
    let bound = diff.iter().fold(0.0_f64, |m, d| m.max(d.abs())).max(1e-9);
    let title = format!("Difference, mean error {:.2} [K]", result.mean_abs_error);
    let (heat, bar) = panels[2].split_horizontally(panels[2].dim_in_pixel().0 as i32 - 90);
    draw_heatmap(&heat, &title, result, &diff, (-bound, bound), &[], config)?;
    draw_colorbar(&bar, (-bound, bound), config)?;

    root.present()?;
    Ok(())
}

fn draw_heatmap(
    area: &DrawingArea<BitMapBackend<'_>, Shift>,
    caption: &str,
    result: &SurrogateResult,
    values: &Array2<f64>,
    (lo, hi): (f64, f64),
    levels: &[f64],
    config: &PlotConfig,
) -> Result<()> {
    let x_edges = cell_edges(&result.tdb);
    let y_edges = cell_edges(&result.tr);
    let x_range = x_edges[0]..x_edges[x_edges.len() - 1];
    let y_range = y_edges[0]..y_edges[y_edges.len() - 1];

    let mut chart = ChartBuilder::on(area)
        .caption(caption, (config.font_family.as_str(), config.caption_size * 0.8))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(x_range, y_range)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("T_air [°C]")
        .y_desc("T_rad [°C]")
        .draw()?;

    chart.draw_series(values.indexed_iter().map(|((i, j), &v)| {
        let color = rgb(config.heatmap_color(v, lo, hi));
        Rectangle::new(
            [(x_edges[i], y_edges[j]), (x_edges[i + 1], y_edges[j + 1])],
            color.filled(),
        )
    }))?;

    let isoline = BLACK.mix(0.6).stroke_width(1);
    for &level in levels {
        let segments = contour_segments(&result.tdb, &result.tr, values, level);
        chart.draw_series(segments.into_iter().map(|s| PathElement::new(s.to_vec(), isoline)))?;
    }

    Ok(())
}

fn draw_colorbar(
    area: &DrawingArea<BitMapBackend<'_>, Shift>,
    (lo, hi): (f64, f64),
    config: &PlotConfig,
) -> Result<()> {
    let mut chart = ChartBuilder::on(area)
        .margin_top(40)
        .margin_bottom(50)
        .margin_right(10)
        .y_label_area_size(50)
        .build_cartesian_2d(0.0..1.0, lo..hi)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .disable_x_axis()
        .y_label_style((config.font_family.as_str(), config.colorbar_label_size))
        .y_label_formatter(&|v| format!("{v:.2}"))
        .draw()?;

    let steps = config.colorbar_steps.max(2);
    let dy = (hi - lo) / steps as f64;
    chart.draw_series((0..steps).map(|k| {
        let y0 = lo + dy * k as f64;
        let color = rgb(config.heatmap_color(y0 + 0.5 * dy, lo, hi));
        Rectangle::new([(0.0, y0), (1.0, y0 + dy)], color.filled())
    }))?;

    Ok(())
}

/// `n` evenly spaced levels strictly inside `(lo, hi)`.
fn contour_levels(lo: f64, hi: f64, n: usize) -> Vec<f64> {
    if hi <= lo {
        return Vec::new();
    }
    let step = (hi - lo) / (n + 1) as f64;
    (1..=n).map(|k| lo + step * k as f64).collect()
}

/// Marching squares isoline of `z` at `level`, where `z[(i, j)]` is the
/// value at `(x[i], y[j])`. Cells with non-finite corners are skipped.
fn contour_segments(x: &[f64], y: &[f64], z: &Array2<f64>, level: f64) -> Vec<[(f64, f64); 2]> {
    let mut segments = Vec::new();
    if x.len() < 2 || y.len() < 2 || z.dim() != (x.len(), y.len()) {
        return segments;
    }
    for i in 0..x.len() - 1 {
        for j in 0..y.len() - 1 {
            // Corners counter-clockwise from the lower left
            let corners = [
                (x[i], y[j], z[(i, j)]),
                (x[i + 1], y[j], z[(i + 1, j)]),
                (x[i + 1], y[j + 1], z[(i + 1, j + 1)]),
                (x[i], y[j + 1], z[(i, j + 1)]),
            ];
            if corners.iter().any(|c| !c.2.is_finite()) {
                continue;
            }
            let above = corners.map(|c| c.2 >= level);
            let mut crossings = Vec::with_capacity(4);
            for e in 0..4 {
                let (a, b) = (corners[e], corners[(e + 1) % 4]);
                if above[e] != above[(e + 1) % 4] {
                    let t = (level - a.2) / (b.2 - a.2);
                    crossings.push((a.0 + t * (b.0 - a.0), a.1 + t * (b.1 - a.1)));
                }
            }
            match crossings.len() {
                2 => segments.push([crossings[0], crossings[1]]),
                4 => {
                    // Saddle: the cell mean decides which corners connect
                    let mean = corners.iter().map(|c| c.2).sum::<f64>() / 4.0;
                    if (mean >= level) == above[0] {
                        segments.push([crossings[0], crossings[1]]);
                        segments.push([crossings[2], crossings[3]]);
                    } else {
                        segments.push([crossings[3], crossings[0]]);
                        segments.push([crossings[1], crossings[2]]);
                    }
                }
                _ => {}
            }
        }
    }
    segments
}

/// Min and max of finite values; `(0, 1)` when there are none.
fn value_range<'a>(values: impl Iterator<Item = &'a f64>) -> (f64, f64) {
    let (lo, hi) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    if lo.is_finite() { (lo, hi) } else { (0.0, 1.0) }
}

/// Boundaries of the cells centred on the sorted grid points `centers`.
fn cell_edges(centers: &[f64]) -> Vec<f64> {
    let n = centers.len();
    let mut edges = Vec::with_capacity(n + 1);
    edges.push(centers[0] - 0.5 * (centers[1] - centers[0]));
    for w in centers.windows(2) {
        edges.push(0.5 * (w[0] + w[1]));
    }
    edges.push(centers[n - 1] + 0.5 * (centers[n - 1] - centers[n - 2]));
    edges
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_edges() {
        let edges = cell_edges(&[10.0, 20.0, 30.0]);
        assert_eq!(edges, vec![5.0, 15.0, 25.0, 35.0]);
    }

    #[test]
    fn test_contour_levels() {
        assert_eq!(contour_levels(0.0, 6.0, 5), vec![1.0, 2.0, 3.0, 4.0, 5.0]);
        assert!(contour_levels(2.0, 2.0, 5).is_empty());
        assert!(contour_levels(0.0, 1.0, 0).is_empty());
    }

    #[test]
    fn test_contour_of_plane() {
        let x = [0.0, 1.0, 2.0, 3.0];
        let y = [0.0, 1.0, 2.0];
        let z = Array2::from_shape_fn((4, 3), |(i, _)| x[i]);
        let segments = contour_segments(&x, &y, &z, 1.5);
        assert_eq!(segments.len(), 2);
        for [a, b] in &segments {
            assert!((a.0 - 1.5).abs() < 1e-12 && (b.0 - 1.5).abs() < 1e-12);
            assert!((a.1 - b.1).abs() == 1.0);
        }
        assert!(contour_segments(&x, &y, &z, 10.0).is_empty());
    }

    #[test]
    fn test_contour_saddle_and_gaps() {
        let x = [0.0, 1.0];
        let y = [0.0, 1.0];
        // High on one diagonal, low on the other
        let z = Array2::from_shape_vec((2, 2), vec![1.0, 0.0, 0.0, 1.0]).unwrap();
        assert_eq!(contour_segments(&x, &y, &z, 0.5).len(), 2);

        let gap = Array2::from_shape_vec((2, 2), vec![1.0, f64::NAN, 0.0, 1.0]).unwrap();
        assert!(contour_segments(&x, &y, &gap, 0.5).is_empty());
    }

    #[test]
    fn test_value_range_skips_nan() {
        let values = [3.0, f64::NAN, -1.0, 2.0];
        assert_eq!(value_range(values.iter()), (-1.0, 3.0));
        assert_eq!(value_range([f64::NAN].iter()), (0.0, 1.0));
    }
}
