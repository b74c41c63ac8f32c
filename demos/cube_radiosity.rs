//! Radiosity exchange in a cube with a cold floor.

use std::path::Path;

use anyhow::Result;
use comfortsim::draw::draw_radiosity;
use comfortsim::sim::radiosity::{FACE_NAMES, ViewFactorSource};
use comfortsim::{PlotConfig, RadiosityConfig, run_radiosity};

fn main() -> Result<()> {
    let result = run_radiosity(&RadiosityConfig::default())?;

    // Cross check with exact view factors
    let analytic = run_radiosity(&RadiosityConfig {
        view_factors: ViewFactorSource::Analytic,
        ..RadiosityConfig::default()
    })?;
    for (i, name) in FACE_NAMES.iter().enumerate() {
        println!(
            "{name:>6}: net flux {:8.3} W/m2 (analytic view factors {:8.3})",
            result.net_flux[i], analytic.net_flux[i]
        );
    }

    draw_radiosity(Path::new("radiosity.png"), &result, &PlotConfig::default())?;
    Ok(())
}
