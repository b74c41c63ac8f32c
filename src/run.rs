//! Runs the analyses and writes their plots.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::config::AnalysisConfig;
use crate::draw::{draw_morris, draw_radiosity, draw_spectrum, draw_surrogate};
use crate::sim::radiosity::run_radiosity;
use crate::sim::sensitivity::run_morris;
use crate::sim::spectral::run_spectral;
use crate::sim::surrogate::run_surrogate;

/// One of the four analyses, or all of them in turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Analysis {
    Morris,
    Kriging,
    Spectrum,
    Radiosity,
    All,
}

impl Analysis {
    const SINGLE: [Analysis; 4] = [
        Analysis::Morris,
        Analysis::Kriging,
        Analysis::Spectrum,
        Analysis::Radiosity,
    ];

    /// The individual analyses this selection runs.
    pub fn expand(self) -> Vec<Analysis> {
        match self {
            Analysis::All => Self::SINGLE.to_vec(),
            single => vec![single],
        }
    }
}

impl FromStr for Analysis {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "morris" => Ok(Analysis::Morris),
            "kriging" => Ok(Analysis::Kriging),
            "spectrum" => Ok(Analysis::Spectrum),
            "radiosity" => Ok(Analysis::Radiosity),
            "all" => Ok(Analysis::All),
            other => anyhow::bail!(
                "Unknown analysis '{other}', expected one of: morris, kriging, spectrum, radiosity, all"
            ),
        }
    }
}

impl fmt::Display for Analysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Analysis::Morris => "morris",
            Analysis::Kriging => "kriging",
            Analysis::Spectrum => "spectrum",
            Analysis::Radiosity => "radiosity",
            Analysis::All => "all",
        };
        write!(f, "{name}")
    }
}

/// Runs `analysis` with `config` and writes each plot into `config.output_dir`.
///
/// Every selected analysis runs even when an earlier one fails. Returns the
/// paths of the written plots, or an error listing each failed analysis after
/// the successful plots have been written.
pub fn run_analysis(analysis: Analysis, config: &AnalysisConfig) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(&config.output_dir).with_context(|| {
        format!("Failed to create output directory: {}", config.output_dir.display())
    })?;

    let selected = analysis.expand();
    let mut written = Vec::new();
    let mut failures = Vec::new();
    for &single in &selected {
        let path = config.output_dir.join(format!("{single}.png"));
        info!(analysis = %single, "Running analysis");
        match run_single(single, config, &path) {
            Ok(()) => {
                info!(path = %path.display(), "Wrote plot");
                written.push(path);
            }
            Err(err) => {
                warn!(analysis = %single, "Analysis failed: {err:#}");
                failures.push(format!("{single}: {err:#}"));
            }
        }
    }

    if !failures.is_empty() {
        anyhow::bail!(
            "{} of {} analyses failed\n{}",
            failures.len(),
            selected.len(),
            failures.join("\n")
        );
    }
    Ok(written)
}

fn run_single(analysis: Analysis, config: &AnalysisConfig, path: &Path) -> Result<()> {
    match analysis {
        Analysis::Morris => {
            let result = run_morris(&config.morris)?;
            draw_morris(path, &result.indices, &config.plot)
        }
        Analysis::Kriging => {
            let result = run_surrogate(&config.surrogate)?;
            draw_surrogate(path, &result, &config.plot)
        }
        Analysis::Spectrum => {
            let result = run_spectral(&config.spectral)?;
            draw_spectrum(path, &result, &config.plot)
        }
        Analysis::Radiosity => {
            let result = run_radiosity(&config.radiosity)?;
            draw_radiosity(path, &result, &config.plot)
        }
        Analysis::All => anyhow::bail!("Analysis selection was not expanded"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!("morris".parse::<Analysis>().unwrap(), Analysis::Morris);
        assert_eq!("Radiosity".parse::<Analysis>().unwrap(), Analysis::Radiosity);
        assert_eq!("all".parse::<Analysis>().unwrap(), Analysis::All);
        assert!("sobol".parse::<Analysis>().is_err());
    }

    #[test]
    fn test_display_parses_back() {
        for a in Analysis::All.expand() {
            assert_eq!(a.to_string().parse::<Analysis>().unwrap(), a);
        }
    }

    #[test]
    fn test_expand_all() {
        assert_eq!(Analysis::All.expand().len(), 4);
        assert_eq!(Analysis::Kriging.expand(), vec![Analysis::Kriging]);
    }
}
