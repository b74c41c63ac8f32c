//! JSON configuration files.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use crate::config::AnalysisConfig;

/// Writes the analysis configuration to a JSON file.
///
/// # Example
/// ```no_run
/// use comfortsim::AnalysisConfig;
/// use comfortsim::io::write_config;
/// use std::path::Path;
///
/// write_config(Path::new("comfortsim.json"), &AnalysisConfig::default()).unwrap();
/// ```
pub fn write_config(path: &Path, config: &AnalysisConfig) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create file: {}", path.display()))?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, config)
        .with_context(|| format!("Failed to serialize configuration to: {}", path.display()))?;

    Ok(())
}

/// Reads the analysis configuration from a JSON file.
///
/// Missing keys fall back to their defaults.
pub fn read_config(path: &Path) -> Result<AnalysisConfig> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open file: {}", path.display()))?;
    let reader = BufReader::new(file);

    let config: AnalysisConfig = serde_json::from_reader(reader)
        .with_context(|| format!("Failed to parse configuration from: {}", path.display()))?;

    Ok(config)
}
