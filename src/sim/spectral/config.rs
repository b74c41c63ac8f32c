use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Where the spectral table lives and how to read it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpectralConfig {
    /// Spreadsheet or CSV file.
    pub input: PathBuf,
    /// Worksheet name. The first sheet when `None`.
    pub sheet: Option<String>,
    /// Header of the wavelength column.
    pub lambda_column: String,
    /// Header of the spectral irradiance column.
    pub irradiance_column: String,
    /// Factor applied to wavelengths (nm → µm).
    pub wavelength_scale: f64,
    /// Factor applied to irradiance (W/(m² nm) → W/(m² µm)).
    pub irradiance_scale: f64,
}

impl SpectralConfig {
    pub fn new() -> Self {
        Self {
            input: PathBuf::from("ASTMed.xls"),
            sheet: None,
            lambda_column: "lambda".to_string(),
            irradiance_column: "global".to_string(),
            wavelength_scale: 1e-3,
            irradiance_scale: 1e3,
        }
    }
}

impl Default for SpectralConfig {
    fn default() -> Self {
        Self::new()
    }
}
