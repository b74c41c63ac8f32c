use anyhow::{Context, Result};
use tracing::info;

use super::config::SpectralConfig;
use super::interpolate::LinearInterpolator;
use super::spectrum::Spectrum;

/// Measured spectrum and its interpolation at the measured wavelengths.
#[derive(Debug, Clone)]
pub struct SpectralResult {
    pub spectrum: Spectrum,
    /// Interpolated irradiance at `spectrum.wavelength_um`.
    pub interpolated: Vec<f64>,
    /// Broadband irradiance in W/m².
    pub integrated_irradiance: f64,
}

/// Loads the spectral table named in `config` and interpolates it.
pub fn run_spectral(config: &SpectralConfig) -> Result<SpectralResult> {
    let spectrum = Spectrum::from_file(&config.input, config)
        .with_context(|| format!("Failed to load spectrum from {}", config.input.display()))?;
    interpolate_spectrum(spectrum)
}

/// Builds the linear interpolant of `spectrum` and evaluates it at the
/// measured wavelengths.
pub fn interpolate_spectrum(spectrum: Spectrum) -> Result<SpectralResult> {
    let interp = LinearInterpolator::new(&spectrum.wavelength_um, &spectrum.irradiance)?;
    let interpolated = interp.eval_many(&spectrum.wavelength_um)?;
    let integrated_irradiance = spectrum.integrated_irradiance();
    let (lo, hi) = interp.x_range();
    info!(
        samples = spectrum.len(),
        lambda_min_um = lo,
        lambda_max_um = hi,
        integrated_irradiance,
        "Interpolated spectrum"
    );

    Ok(SpectralResult {
        spectrum,
        interpolated,
        integrated_irradiance,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpolation_reproduces_data() {
        let spectrum = Spectrum::new(vec![0.3, 0.5, 0.8, 1.2], vec![0.0, 1500.0, 1000.0, 400.0])
            .unwrap();
        let result = interpolate_spectrum(spectrum.clone()).unwrap();
        assert_eq!(result.interpolated, spectrum.irradiance);
        assert!(result.integrated_irradiance > 0.0);
    }

    #[test]
    fn test_missing_input_file() {
        let config = SpectralConfig {
            input: "missing/ASTMed.xls".into(),
            ..SpectralConfig::new()
        };
        assert!(run_spectral(&config).is_err());
    }
}
