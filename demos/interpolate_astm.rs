//! Interpolates the ASTM reference spectrum.
//!
//! Usage: `cargo run --example interpolate_astm [ASTMed.xls]`

use std::path::{Path, PathBuf};

use anyhow::Result;
use comfortsim::draw::draw_spectrum;
use comfortsim::{PlotConfig, SpectralConfig, run_spectral};

fn main() -> Result<()> {
    let mut config = SpectralConfig::default();
    if let Some(path) = std::env::args().nth(1) {
        config.input = PathBuf::from(path);
    }

    let result = run_spectral(&config)?;
    println!("{} samples", result.spectrum.len());
    println!("Integrated irradiance {:.1} W/m2", result.integrated_irradiance);

    draw_spectrum(Path::new("spectrum.png"), &result, &PlotConfig::default())?;
    Ok(())
}
