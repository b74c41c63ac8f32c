use std::path::Path;

use anyhow::Result;
use plotters::prelude::*;

use super::config::PlotConfig;
use super::{category_label, rgb};
use crate::sim::radiosity::{FACE_NAMES, RadiosityResult};

/// Bar chart of the radiant temperature seen by each face.
pub fn draw_radiosity(path: &Path, result: &RadiosityResult, config: &PlotConfig) -> Result<()> {
    let names: Vec<String> = FACE_NAMES.iter().map(|s| s.to_string()).collect();
    let temps = &result.radiant_temperature_c;

    let y_min = temps.iter().copied().fold(0.0_f64, f64::min);
    let y_max = temps.iter().copied().fold(0.0_f64, f64::max);
    let pad = 0.1 * (y_max - y_min).max(1.0);

    let root = BitMapBackend::new(path, (config.width, config.height)).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(
            "Radiant temperature per face",
            (config.font_family.as_str(), config.caption_size),
        )
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(-0.5..(names.len() as f64 - 0.5), (y_min - pad)..(y_max + pad))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .light_line_style(BLACK.mix(config.grid_alpha))
        .x_labels(names.len())
        .x_label_formatter(&|v| category_label(&names, *v))
        .y_desc("Radiant temperature [°C]")
        .draw()?;

    let bar = rgb(config.bar_color);
    chart.draw_series(temps.iter().enumerate().map(|(i, &t)| {
        let x = i as f64;
        Rectangle::new([(x - 0.35, 0.0), (x + 0.35, t)], bar.filled())
    }))?;
    chart.draw_series(temps.iter().enumerate().map(|(i, &t)| {
        Text::new(
            format!("{t:.2}"),
            (i as f64 - 0.2, t + 0.5 * pad * t.signum()),
            (config.font_family.as_str(), 14.0),
        )
    }))?;

    root.present()?;
    Ok(())
}
