use std::path::Path;

use anyhow::Result;
use plotters::prelude::*;

use super::config::PlotConfig;
use super::rgb;
use crate::sim::spectral::SpectralResult;

/// Symmetric log transform, linear within `threshold` of zero.
pub fn symlog(y: f64, threshold: f64) -> f64 {
    y.signum() * (1.0 + y.abs() / threshold).log10()
}

/// Inverse of [`symlog`].
pub fn symlog_inverse(s: f64, threshold: f64) -> f64 {
    s.signum() * threshold * (10f64.powf(s.abs()) - 1.0)
}

/// Draws the measured spectrum and its interpolation on a log wavelength
/// axis and a symmetric-log irradiance axis.
pub fn draw_spectrum(path: &Path, result: &SpectralResult, config: &PlotConfig) -> Result<()> {
    let spectrum = &result.spectrum;
    let c = config.symlog_threshold;
    anyhow::ensure!(c > 0.0, "Symlog threshold must be positive, got {c}");

    let x_lo = spectrum.wavelength_um.iter().copied().fold(f64::INFINITY, f64::min);
    let x_hi = spectrum.wavelength_um.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    anyhow::ensure!(
        x_lo > 0.0 && x_hi > x_lo,
        "Log wavelength axis needs a positive range, got [{x_lo}, {x_hi}]"
    );

    let measured: Vec<(f64, f64)> = spectrum
        .wavelength_um
        .iter()
        .zip(&spectrum.irradiance)
        .map(|(&x, &y)| (x, symlog(y, c)))
        .collect();
    let interpolated: Vec<(f64, f64)> = spectrum
        .wavelength_um
        .iter()
        .zip(&result.interpolated)
        .map(|(&x, &y)| (x, symlog(y, c)))
        .collect();

    let y_min = measured.iter().map(|p| p.1).fold(0.0_f64, f64::min);
    let y_max = measured.iter().map(|p| p.1).fold(0.0_f64, f64::max).max(1e-9);
    let pad = 0.05 * (y_max - y_min);

    let root = BitMapBackend::new(path, (config.width, config.height)).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!(
                "Spectral irradiance ({:.0} W/m2 integrated)",
                result.integrated_irradiance
            ),
            (config.font_family.as_str(), config.caption_size),
        )
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d((x_lo..x_hi).log_scale(), (y_min - pad)..(y_max + pad))?;

    chart
        .configure_mesh()
        .light_line_style(BLACK.mix(config.grid_alpha))
        .bold_line_style(BLACK.mix(2.0 * config.grid_alpha))
        .x_desc("Wavelength [um]")
        .y_desc("Irradiance [W/m2/um]")
        .y_label_formatter(&|s| format!("{:.0}", symlog_inverse(*s, c)))
        .draw()?;

    let fill = rgb(config.fill_color);
    chart
        .draw_series(
            AreaSeries::new(measured, 0.0, fill.mix(config.fill_alpha)).border_style(fill),
        )?
        .label("Measured")
        .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 20, y + 5)], fill.filled()));

    let line = rgb(config.line_color);
    chart
        .draw_series(LineSeries::new(interpolated, line.stroke_width(2)))?
        .label("Interpolated")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symlog_is_odd_and_monotone() {
        assert_eq!(symlog(0.0, 1.0), 0.0);
        assert!((symlog(9.0, 1.0) - 1.0).abs() < 1e-12);
        assert!((symlog(-9.0, 1.0) + 1.0).abs() < 1e-12);
        assert!(symlog(1000.0, 1.0) > symlog(100.0, 1.0));
    }

    #[test]
    fn test_symlog_inverse() {
        for y in [-1500.0, -2.0, 0.0, 0.5, 42.0, 2000.0] {
            let s = symlog(y, 10.0);
            assert!((symlog_inverse(s, 10.0) - y).abs() < 1e-9, "y = {y}");
        }
    }
}
