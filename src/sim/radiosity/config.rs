use serde::{Deserialize, Serialize};

use super::N_FACES;
use crate::sim::linalg::NewtonOptions;

/// Source of the enclosure view factors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewFactorSource {
    /// `f_adjacent` / `f_opposite` from the config.
    Fixed,
    /// Closed-form plate formulas.
    Analytic,
    /// Ray casting with the given number of rays per face.
    MonteCarlo { rays_per_face: usize, seed: u64 },
}

/// Configuration of the cube radiosity calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadiosityConfig {
    pub view_factors: ViewFactorSource,
    /// View factor between adjacent faces.
    pub f_adjacent: f64,
    /// View factor between opposite faces.
    pub f_opposite: f64,
    /// Emissivity of every face.
    pub emissivity: f64,
    /// Face temperatures in °C.
    pub temperature_c: [f64; N_FACES],
    /// Starting radiosity of the Newton iteration [W/m²].
    pub initial_radiosity: f64,
    pub solver: NewtonOptions,
}

impl RadiosityConfig {
    /// Faces at +10 °C, the bottom at -10 °C.
    pub fn new() -> Self {
        Self {
            view_factors: ViewFactorSource::Fixed,
            f_adjacent: 0.200044,
            f_opposite: 0.199824,
            emissivity: 0.9,
            temperature_c: [-10.0, 10.0, 10.0, 10.0, 10.0, 10.0],
            initial_radiosity: 100.0,
            solver: NewtonOptions::new(),
        }
    }
}

impl Default for RadiosityConfig {
    fn default() -> Self {
        Self::new()
    }
}
