use std::path::Path;

use anyhow::Result;

use super::config::SpectralConfig;
use crate::io::spreadsheet::read_columns;

/// Spectral irradiance samples.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    /// Wavelength in µm.
    pub wavelength_um: Vec<f64>,
    /// Spectral irradiance in W/(m² µm).
    pub irradiance: Vec<f64>,
}

impl Spectrum {
    pub fn new(wavelength_um: Vec<f64>, irradiance: Vec<f64>) -> Result<Self> {
        anyhow::ensure!(
            wavelength_um.len() == irradiance.len(),
            "Wavelength and irradiance lengths differ: {} vs {}",
            wavelength_um.len(),
            irradiance.len()
        );
        anyhow::ensure!(!wavelength_um.is_empty(), "Spectrum is empty");
        Ok(Self {
            wavelength_um,
            irradiance,
        })
    }

    /// Loads a table file and converts its units.
    ///
    /// Wavelengths are multiplied by `config.wavelength_scale` (nm → µm) and
    /// irradiance by `config.irradiance_scale` (W/(m² nm) → W/(m² µm)).
    pub fn from_file(path: &Path, config: &SpectralConfig) -> Result<Self> {
        let mut columns = read_columns(
            path,
            &[config.lambda_column.as_str(), config.irradiance_column.as_str()],
            config.sheet.as_deref(),
        )?;
        let irradiance = columns.pop().unwrap_or_default();
        let wavelength = columns.pop().unwrap_or_default();
        Self::new(
            wavelength
                .iter()
                .map(|l| l * config.wavelength_scale)
                .collect(),
            irradiance
                .iter()
                .map(|e| e * config.irradiance_scale)
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.wavelength_um.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wavelength_um.is_empty()
    }

    /// Broadband irradiance in W/m² (trapezoidal rule over the samples in
    /// wavelength order).
    pub fn integrated_irradiance(&self) -> f64 {
        let mut pairs: Vec<(f64, f64)> = self
            .wavelength_um
            .iter()
            .copied()
            .zip(self.irradiance.iter().copied())
            .collect();
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
        pairs
            .windows(2)
            .map(|w| 0.5 * (w[0].1 + w[1].1) * (w[1].0 - w[0].0))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integrated_irradiance() {
        // Constant 1000 W/(m² µm) over 1 µm
        let s = Spectrum::new(vec![0.5, 1.0, 1.5], vec![1000.0; 3]).unwrap();
        assert!((s.integrated_irradiance() - 1000.0).abs() < 1e-9);
        // Triangle
        let s = Spectrum::new(vec![2.0, 0.0, 1.0], vec![0.0, 0.0, 10.0]).unwrap();
        assert!((s.integrated_irradiance() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_length_mismatch() {
        assert!(Spectrum::new(vec![1.0], vec![]).is_err());
        assert!(Spectrum::new(vec![], vec![]).is_err());
    }

    #[test]
    fn test_unit_conversion_from_csv() {
        let dir = std::env::temp_dir().join(format!("comfortsim_spectrum_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("astm.csv");
        std::fs::write(&path, "lambda,global\n500,1.5\n1000,0.5\n").unwrap();

        let s = Spectrum::from_file(&path, &SpectralConfig::new()).unwrap();
        assert_eq!(s.wavelength_um, vec![0.5, 1.0]);
        assert_eq!(s.irradiance, vec![1500.0, 500.0]);
        std::fs::remove_dir_all(&dir).ok();
    }
}
