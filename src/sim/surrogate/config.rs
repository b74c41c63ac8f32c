use serde::{Deserialize, Serialize};

use super::kriging::KrigingConfig;
use super::sampling::LhsCriterion;

/// Configuration of the SET kriging metamodel study.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurrogateConfig {
    /// Air temperature range in °C.
    pub t_air: (f64, f64),
    /// Mean radiant temperature range in °C.
    pub t_rad: (f64, f64),
    /// Number of training evaluations.
    pub samples: usize,
    pub criterion: LhsCriterion,
    /// Fixed air speed in m/s.
    pub v: f64,
    /// Fixed relative humidity in %.
    pub rh: f64,
    pub met: f64,
    pub clo: f64,
    /// Points per axis of the comparison grid.
    pub grid: usize,
    pub kriging: KrigingConfig,
    /// RNG seed. `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl SurrogateConfig {
    pub fn new() -> Self {
        Self {
            t_air: (10.0, 40.0),
            t_rad: (20.0, 40.0),
            samples: 100,
            criterion: LhsCriterion::Center,
            v: 0.15,
            rh: 55.0,
            met: 1.2,
            clo: 0.5,
            grid: 10,
            kriging: KrigingConfig::new(),
            seed: None,
        }
    }
}

impl Default for SurrogateConfig {
    fn default() -> Self {
        Self::new()
    }
}
