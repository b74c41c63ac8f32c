use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::draw::PlotConfig;
use crate::sim::radiosity::RadiosityConfig;
use crate::sim::sensitivity::MorrisConfig;
use crate::sim::spectral::SpectralConfig;
use crate::sim::surrogate::SurrogateConfig;

/// Settings of all four analyses plus the plot output.
///
/// Every field has a default, so a JSON file only needs the keys it changes:
///
/// ```json
/// { "output_dir": "plots", "morris": { "trajectories": 20, "seed": 7 } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Directory receiving the plot files.
    pub output_dir: PathBuf,
    pub morris: MorrisConfig,
    pub surrogate: SurrogateConfig,
    pub spectral: SpectralConfig,
    pub radiosity: RadiosityConfig,
    pub plot: PlotConfig,
}

impl AnalysisConfig {
    pub fn new() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            morris: MorrisConfig::new(),
            surrogate: SurrogateConfig::new(),
            spectral: SpectralConfig::new(),
            radiosity: RadiosityConfig::new(),
            plot: PlotConfig::new(),
        }
    }

    /// Loads the configuration from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        crate::io::read_config(path)
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AnalysisConfig::new();
        assert_eq!(config.output_dir, PathBuf::from("output"));
        assert_eq!(config.morris.trajectories, 50);
        assert_eq!(config.surrogate.samples, 100);
        assert_eq!(config.radiosity.emissivity, 0.9);
    }

    #[test]
    fn test_partial_json() {
        let json = r#"{ "output_dir": "plots", "morris": { "trajectories": 20, "seed": 7 } }"#;
        let config: AnalysisConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.output_dir, PathBuf::from("plots"));
        assert_eq!(config.morris.trajectories, 20);
        assert_eq!(config.morris.seed, Some(7));
        assert_eq!(config.morris.num_levels, 4);
        assert_eq!(config.surrogate, SurrogateConfig::new());
    }
}
