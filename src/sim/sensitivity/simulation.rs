use anyhow::Result;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;

use super::analyze::{MorrisIndices, analyze};
use super::config::MorrisConfig;
use super::problem::Problem;
use super::sample::{MorrisSample, sample};
use crate::sim::comfort::set_tmp;
use crate::sim::evaluate::evaluate_rows;

/// Outcome of the SET Morris screening.
#[derive(Debug, Clone)]
pub struct MorrisResult {
    pub problem: Problem,
    pub sample: MorrisSample,
    /// SET at each sample row [°C].
    pub outputs: Vec<f64>,
    pub indices: MorrisIndices,
}

/// Screens the influence of air temperature, radiant temperature, air speed
/// and humidity on SET at fixed activity and clothing.
pub fn run_morris(config: &MorrisConfig) -> Result<MorrisResult> {
    let problem = config.problem.clone();
    problem.validate()?;
    anyhow::ensure!(
        problem.num_vars() == 4,
        "SET screening expects 4 factors [T_a, T_r, v, RH], got {}",
        problem.num_vars()
    );

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    println!("Total evaluations {}", config.total_evaluations());
    let sample = sample(&problem, config.trajectories, config.num_levels, &mut rng)?;

    let (met, clo) = (config.met, config.clo);
    let outputs = evaluate_rows(&sample.scaled, |x| set_tmp(x[0], x[1], x[2], x[3], met, clo))?;
    info!(evaluations = outputs.len(), "Evaluated SET over Morris trajectories");

    let indices = analyze(
        &problem,
        &sample,
        &outputs,
        config.conf_level,
        config.num_resamples,
        &mut rng,
    )?;
    if config.print_to_console {
        print!("{indices}");
    }

    Ok(MorrisResult {
        problem,
        sample,
        outputs,
        indices,
    })
}
