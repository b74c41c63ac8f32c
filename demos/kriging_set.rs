//! Kriging metamodel of SET as a function of air and radiant temperature.

use std::path::Path;

use anyhow::Result;
use comfortsim::draw::draw_surrogate;
use comfortsim::{PlotConfig, SurrogateConfig, run_surrogate};

fn main() -> Result<()> {
    let config = SurrogateConfig {
        seed: Some(1),
        ..SurrogateConfig::default()
    };
    let result = run_surrogate(&config)?;
    println!("theta = {:?}", result.theta);
    println!("Mean absolute error {:.2} K", result.mean_abs_error);

    draw_surrogate(Path::new("kriging.png"), &result, &PlotConfig::default())?;
    Ok(())
}
