//! Morris screening of SET over air temperature, radiant temperature,
//! air speed and relative humidity.

use std::path::Path;

use anyhow::Result;
use comfortsim::draw::draw_morris;
use comfortsim::{MorrisConfig, PlotConfig, run_morris};

fn main() -> Result<()> {
    let config = MorrisConfig {
        seed: Some(42),
        ..MorrisConfig::default()
    };
    let result = run_morris(&config)?;

    for i in result.indices.sorted_by_mu_star() {
        println!("{:>4}: mu* = {:.3}", result.indices.names[i], result.indices.mu_star[i]);
    }

    draw_morris(Path::new("morris.png"), &result.indices, &PlotConfig::default())?;
    Ok(())
}
