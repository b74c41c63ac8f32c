use anyhow::Result;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;

use super::config::{RadiosityConfig, ViewFactorSource};
use super::enclosure::{CubeEnclosure, radiant_temperature_k};
use super::view_factors::{
    analytic_cube_view_factors, cube_view_factors, monte_carlo_cube_view_factors,
};
use super::{N_FACES, ViewFactorMatrix};

/// Solved radiosity balance.
#[derive(Debug, Clone)]
pub struct RadiosityResult {
    pub view_factors: ViewFactorMatrix,
    /// Radiosity of each face [W/m²].
    pub radiosity: [f64; N_FACES],
    /// Total radiation incident on each face [W/m²].
    pub incident: [f64; N_FACES],
    /// Fictitious radiant temperature seen by each face [°C].
    pub radiant_temperature_c: [f64; N_FACES],
    /// Net radiative flux leaving each face, `J - E` [W/m²].
    pub net_flux: [f64; N_FACES],
    pub iterations: usize,
}

/// Builds the view factor matrix selected in `config`.
pub fn enclosure_view_factors(config: &RadiosityConfig) -> Result<ViewFactorMatrix> {
    match config.view_factors {
        ViewFactorSource::Fixed => Ok(cube_view_factors(config.f_adjacent, config.f_opposite)),
        ViewFactorSource::Analytic => Ok(analytic_cube_view_factors()),
        ViewFactorSource::MonteCarlo {
            rays_per_face,
            seed,
        } => {
            let mut rng = StdRng::seed_from_u64(seed);
            monte_carlo_cube_view_factors(rays_per_face, &mut rng)
        }
    }
}

/// Solves for the face radiosities and derives incident radiation and
/// radiant temperatures.
pub fn run_radiosity(config: &RadiosityConfig) -> Result<RadiosityResult> {
    let view_factors = enclosure_view_factors(config)?;
    let temperature_k = config.temperature_c.map(|t| t + 273.15);
    let enclosure = CubeEnclosure::new(view_factors, [config.emissivity; N_FACES], temperature_k)?;

    let report = enclosure.solve(&[config.initial_radiosity; N_FACES], &config.solver)?;
    info!(
        iterations = report.iterations,
        residual = report.residual_norm,
        "Solved radiosity balance"
    );

    let radiosity: [f64; N_FACES] = std::array::from_fn(|i| report.x[i]);
    let incident = enclosure.incident(&radiosity);
    let radiant_temperature_c = incident.map(|e| radiant_temperature_k(e) - 273.15);
    let net_flux = std::array::from_fn(|i| radiosity[i] - incident[i]);

    println!("Radiosities [W/m2] {}", format_row(&radiosity));
    println!("Total radiation  {}", format_row(&incident));
    println!("Radiant temperatures  {}", format_row(&radiant_temperature_c));

    Ok(RadiosityResult {
        view_factors,
        radiosity,
        incident,
        radiant_temperature_c,
        net_flux,
        iterations: report.iterations,
    })
}

fn format_row(values: &[f64]) -> String {
    let cells: Vec<String> = values.iter().map(|v| format!("{v:.3}")).collect();
    format!("[{}]", cells.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_case() {
        let result = run_radiosity(&RadiosityConfig::new()).unwrap();
        assert!((result.radiosity[0] - 280.967).abs() < 0.01, "J0 = {}", result.radiosity[0]);
        for i in 1..5 {
            assert!((result.radiosity[i] - 362.644).abs() < 0.01);
            assert!((result.radiant_temperature_c[i] - 6.406).abs() < 0.01);
        }
        assert!((result.radiant_temperature_c[0] - 9.647).abs() < 0.01);
        // The cold bottom face absorbs net radiation.
        assert!(result.net_flux[0] < 0.0);
        assert!(result.net_flux[1..].iter().all(|q| *q > 0.0));
    }

    #[test]
    fn test_energy_conservation() {
        let result = run_radiosity(&RadiosityConfig::new()).unwrap();
        let total: f64 = result.net_flux.iter().sum();
        assert!(total.abs() < 1e-3, "Net exchange = {total} W");
    }

    #[test]
    fn test_analytic_view_factors_agree() {
        let fixed = run_radiosity(&RadiosityConfig::new()).unwrap();
        let config = RadiosityConfig {
            view_factors: ViewFactorSource::Analytic,
            ..RadiosityConfig::new()
        };
        let analytic = run_radiosity(&config).unwrap();
        for i in 0..N_FACES {
            assert!((fixed.radiosity[i] - analytic.radiosity[i]).abs() < 0.01);
        }
    }
}
