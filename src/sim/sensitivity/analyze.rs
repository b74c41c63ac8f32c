use std::fmt;

use anyhow::Result;
use rand::Rng;
use statrs::distribution::{ContinuousCDF, Normal};

use super::problem::Problem;
use super::sample::{MorrisSample, grid_jump};

/// Morris sensitivity measures for each factor.
#[derive(Debug, Clone, PartialEq)]
pub struct MorrisIndices {
    pub names: Vec<String>,
    /// Mean elementary effect.
    pub mu: Vec<f64>,
    /// Mean absolute elementary effect.
    pub mu_star: Vec<f64>,
    /// Standard deviation of the elementary effects.
    pub sigma: Vec<f64>,
    /// Bootstrap confidence half-width of `mu_star`.
    pub mu_star_conf: Vec<f64>,
}

impl MorrisIndices {
    /// Factor indices ordered by decreasing `mu_star`.
    pub fn sorted_by_mu_star(&self) -> Vec<usize> {
        let mut idx: Vec<usize> = (0..self.names.len()).collect();
        idx.sort_by(|&a, &b| self.mu_star[b].total_cmp(&self.mu_star[a]));
        idx
    }
}

impl fmt::Display for MorrisIndices {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<20} {:>10} {:>10} {:>15} {:>10}",
            "Parameter", "Mu_Star", "Mu", "Mu_Star_Conf", "Sigma"
        )?;
        for i in 0..self.names.len() {
            writeln!(
                f,
                "{:<20} {:>10.3} {:>10.3} {:>15.3} {:>10.3}",
                self.names[i], self.mu_star[i], self.mu[i], self.mu_star_conf[i], self.sigma[i]
            )?;
        }
        Ok(())
    }
}

/// Computes Morris indices from outputs `y` evaluated at `sample.scaled`.
///
/// Elementary effects are measured per unit-scale grid jump, so a factor
/// with a linear effect `a` over bounds `[lb, ub]` has `mu = a (ub - lb)`.
pub fn analyze<R: Rng + ?Sized>(
    problem: &Problem,
    sample: &MorrisSample,
    y: &[f64],
    conf_level: f64,
    num_resamples: usize,
    rng: &mut R,
) -> Result<MorrisIndices> {
    problem.validate()?;
    let k = problem.num_vars();
    anyhow::ensure!(
        sample.unit.ncols() == k,
        "Sample has {} columns, problem has {k} variables",
        sample.unit.ncols()
    );
    anyhow::ensure!(
        y.len() == sample.len(),
        "Got {} outputs for {} sample rows",
        y.len(),
        sample.len()
    );
    anyhow::ensure!(
        sample.trajectories >= 2,
        "At least two trajectories are needed to estimate sigma"
    );
    anyhow::ensure!(
        conf_level > 0.0 && conf_level < 1.0,
        "Confidence level must be in (0, 1), got {conf_level}"
    );
    anyhow::ensure!(num_resamples >= 2, "Need at least two bootstrap resamples");
    anyhow::ensure!(y.iter().all(|v| v.is_finite()), "Outputs contain non-finite values");

    let delta = grid_jump(sample.num_levels);
    let n = sample.trajectories;

    // ee[j][t]: elementary effect of factor j in trajectory t
    let mut ee = vec![vec![0.0; n]; k];
    for t in 0..n {
        let offset = t * sample.trajectory_size();
        let mut seen = vec![false; k];
        for i in 0..k {
            let a = sample.unit.row(offset + i);
            let b = sample.unit.row(offset + i + 1);
            let mut changed = None;
            for j in 0..k {
                if (b[j] - a[j]).abs() > 1e-12 {
                    anyhow::ensure!(
                        changed.is_none(),
                        "Trajectory {t} step {i} changes more than one factor"
                    );
                    changed = Some(j);
                }
            }
            let Some(j) = changed else {
                anyhow::bail!("Trajectory {t} step {i} changes no factor");
            };
            anyhow::ensure!(!seen[j], "Trajectory {t} moves factor {j} twice");
            seen[j] = true;

            let dy = y[offset + i + 1] - y[offset + i];
            ee[j][t] = if b[j] > a[j] { dy / delta } else { -dy / delta };
        }
    }

    let z = Normal::new(0.0, 1.0)?.inverse_cdf(0.5 + conf_level / 2.0);

    let mut indices = MorrisIndices {
        names: problem.names.clone(),
        mu: Vec::with_capacity(k),
        mu_star: Vec::with_capacity(k),
        sigma: Vec::with_capacity(k),
        mu_star_conf: Vec::with_capacity(k),
    };
    for effects in &ee {
        let abs: Vec<f64> = effects.iter().map(|e| e.abs()).collect();
        indices.mu.push(mean(effects));
        indices.mu_star.push(mean(&abs));
        indices.sigma.push(std_dev(effects));
        indices
            .mu_star_conf
            .push(z * bootstrap_mean_std(&abs, num_resamples, rng));
    }

    Ok(indices)
}

fn mean(v: &[f64]) -> f64 {
    v.iter().sum::<f64>() / v.len() as f64
}

/// Sample standard deviation (`ddof = 1`).
fn std_dev(v: &[f64]) -> f64 {
    let m = mean(v);
    let ss: f64 = v.iter().map(|x| (x - m).powi(2)).sum();
    (ss / (v.len() as f64 - 1.0)).sqrt()
}

/// Standard deviation of the mean of `values` over bootstrap resamples.
fn bootstrap_mean_std<R: Rng + ?Sized>(values: &[f64], num_resamples: usize, rng: &mut R) -> f64 {
    let n = values.len();
    let means: Vec<f64> = (0..num_resamples)
        .map(|_| (0..n).map(|_| values[rng.gen_range(0..n)]).sum::<f64>() / n as f64)
        .collect();
    std_dev(&means)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::sensitivity::sample::sample;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn linear_problem() -> Problem {
        Problem::new(
            vec!["a".into(), "b".into(), "c".into()],
            vec![(0.0, 1.0), (0.0, 10.0), (-2.0, 2.0)],
        )
        .unwrap()
    }

    #[test]
    fn test_linear_model_effects() {
        let problem = linear_problem();
        let mut rng = StdRng::seed_from_u64(42);
        let s = sample(&problem, 10, 4, &mut rng).unwrap();
        let y: Vec<f64> = s
            .scaled
            .outer_iter()
            .map(|x| 3.0 * x[0] - 0.5 * x[1] + 0.0 * x[2])
            .collect();
        let si = analyze(&problem, &s, &y, 0.95, 500, &mut rng).unwrap();

        let expected = [3.0, -5.0, 0.0];
        for j in 0..3 {
            assert!((si.mu[j] - expected[j]).abs() < 1e-9, "mu[{j}] = {}", si.mu[j]);
            assert!((si.mu_star[j] - expected[j].abs()).abs() < 1e-9);
            assert!(si.sigma[j].abs() < 1e-9, "sigma[{j}] = {}", si.sigma[j]);
            assert!(si.mu_star_conf[j].abs() < 1e-9);
        }
        assert_eq!(si.sorted_by_mu_star(), vec![1, 0, 2]);
    }

    #[test]
    fn test_nonlinear_model_has_spread() {
        let problem = linear_problem();
        let mut rng = StdRng::seed_from_u64(5);
        let s = sample(&problem, 30, 4, &mut rng).unwrap();
        let y: Vec<f64> = s.scaled.outer_iter().map(|x| x[0] * x[1] + x[2].powi(2)).collect();
        let si = analyze(&problem, &s, &y, 0.95, 1000, &mut rng).unwrap();
        for j in 0..3 {
            assert!(si.mu_star[j] >= si.mu[j].abs() - 1e-12);
            assert!(si.mu_star_conf[j] >= 0.0);
            assert!(si.sigma[j] > 0.0, "sigma[{j}] should be positive");
        }
    }

    #[test]
    fn test_output_length_mismatch() {
        let problem = linear_problem();
        let mut rng = StdRng::seed_from_u64(1);
        let s = sample(&problem, 4, 4, &mut rng).unwrap();
        let y = vec![0.0; s.len() - 1];
        assert!(analyze(&problem, &s, &y, 0.95, 100, &mut rng).is_err());
    }

    #[test]
    fn test_display_table() {
        let si = MorrisIndices {
            names: vec!["T_a".into()],
            mu: vec![1.0],
            mu_star: vec![2.0],
            sigma: vec![0.5],
            mu_star_conf: vec![0.1],
        };
        let text = si.to_string();
        assert!(text.starts_with("Parameter"));
        assert!(text.contains("T_a"));
        assert!(text.contains("2.000"));
    }
}
