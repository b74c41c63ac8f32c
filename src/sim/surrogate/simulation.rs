use std::time::Instant;

use anyhow::Result;
use ndarray::Array2;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;

use super::config::SurrogateConfig;
use super::kriging::Kriging;
use super::sampling::LatinHypercube;
use crate::sim::comfort::set_tmp;
use crate::sim::evaluate::evaluate_rows;

/// Training set, comparison grid and error of the SET metamodel.
#[derive(Debug, Clone)]
pub struct SurrogateResult {
    /// Training inputs `[T_air, T_rad]`.
    pub xt: Array2<f64>,
    /// SET at the training inputs.
    pub yt: Vec<f64>,
    /// Air temperature axis of the comparison grid.
    pub tdb: Vec<f64>,
    /// Radiant temperature axis of the comparison grid.
    pub tr: Vec<f64>,
    /// `set_grid[[i, j]]` is SET at `(tdb[i], tr[j])`.
    pub set_grid: Array2<f64>,
    /// Metamodel prediction on the same grid.
    pub meta_grid: Array2<f64>,
    /// Tuned kriging correlation parameters.
    pub theta: Vec<f64>,
    /// Mean absolute error on the grid, rounded to 0.01 K.
    pub mean_abs_error: f64,
    /// Largest kriging prediction variance on the grid [K²].
    pub max_variance: f64,
}

impl SurrogateResult {
    /// `meta_grid - set_grid`.
    pub fn difference(&self) -> Array2<f64> {
        &self.meta_grid - &self.set_grid
    }
}

/// `n` evenly spaced values over `[start, stop]`.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => vec![],
        1 => vec![start],
        _ => (0..n)
            .map(|i| start + (stop - start) * i as f64 / (n - 1) as f64)
            .collect(),
    }
}

/// Fits a kriging metamodel of SET(T_air, T_rad) and compares it with the
/// full model on a regular grid.
pub fn run_surrogate(config: &SurrogateConfig) -> Result<SurrogateResult> {
    anyhow::ensure!(config.grid >= 2, "Comparison grid needs at least 2 points per axis");
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let sampling = LatinHypercube::new(vec![config.t_air, config.t_rad], config.criterion)?;
    let xt = sampling.sample(config.samples, &mut rng)?;

    let (v, rh, met, clo) = (config.v, config.rh, config.met, config.clo);
    let set = move |x: &[f64]| set_tmp(x[0], x[1], v, rh, met, clo);
    let yt = evaluate_rows(&xt, set)?;
    info!(samples = yt.len(), "Evaluated SET at training points");

    let mut sm = Kriging::new(config.kriging.clone());
    sm.set_training_values(&xt, &yt)?;
    let started = Instant::now();
    sm.train()?;
    info!(
        elapsed_ms = started.elapsed().as_millis() as u64,
        theta = ?sm.theta(),
        "Trained kriging metamodel"
    );

    let n = config.grid;
    let tdb = linspace(config.t_air.0, config.t_air.1, n);
    let tr = linspace(config.t_rad.0, config.t_rad.1, n);
    let points = Array2::from_shape_fn((n * n, 2), |(k, c)| {
        if c == 0 { tdb[k / n] } else { tr[k % n] }
    });

    let set_values = evaluate_rows(&points, set)?;
    let meta_values = sm.predict_values(&points)?;
    let set_grid = Array2::from_shape_vec((n, n), set_values)?;
    let meta_grid = Array2::from_shape_vec((n, n), meta_values)?;

    let mae = (&meta_grid - &set_grid).mapv(f64::abs).mean().unwrap_or(f64::NAN);
    let mean_abs_error = (mae * 100.0).round() / 100.0;
    let max_variance = sm
        .predict_variances(&points)?
        .into_iter()
        .fold(0.0_f64, f64::max);
    info!(mean_abs_error, max_variance, "Compared metamodel with SET");

    Ok(SurrogateResult {
        xt,
        yt,
        tdb,
        tr,
        set_grid,
        meta_grid,
        theta: sm.theta().to_vec(),
        mean_abs_error,
        max_variance,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linspace() {
        assert_eq!(linspace(10.0, 40.0, 4), vec![10.0, 20.0, 30.0, 40.0]);
        assert_eq!(linspace(1.0, 2.0, 1), vec![1.0]);
        assert!(linspace(0.0, 1.0, 0).is_empty());
    }

    #[test]
    fn test_grid_too_small() {
        let config = SurrogateConfig {
            grid: 1,
            ..SurrogateConfig::new()
        };
        assert!(run_surrogate(&config).is_err());
    }
}
