//! Ordinary kriging (Gaussian process regression with a constant trend).
//!
//! Inputs and outputs are standardized before fitting. The correlation
//! length parameters `theta` are tuned by maximizing the reduced likelihood
//! `-sigma2 * det(R)^(1/n)` in log10 space with a pattern search.

use anyhow::{Context, Result};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::sim::linalg::Cholesky;

/// Spatial correlation kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Correlation {
    /// `exp(-sum(theta_l * |dx_l|))`
    AbsExp,
    /// `exp(-sum(theta_l * dx_l^2))`
    SquarExp,
}

impl Correlation {
    fn eval(self, theta: &[f64], a: &[f64], b: &[f64]) -> f64 {
        let s: f64 = match self {
            Self::AbsExp => theta
                .iter()
                .zip(a.iter().zip(b))
                .map(|(t, (x, y))| t * (x - y).abs())
                .sum(),
            Self::SquarExp => theta
                .iter()
                .zip(a.iter().zip(b))
                .map(|(t, (x, y))| t * (x - y).powi(2))
                .sum(),
        };
        (-s).exp()
    }
}

/// Kriging hyperparameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KrigingConfig {
    /// Initial correlation parameters. A single value applies to every input.
    pub theta0: Vec<f64>,
    pub corr: Correlation,
    /// Added to the diagonal of the correlation matrix.
    pub nugget: f64,
    /// Search box for `theta`.
    pub theta_bounds: (f64, f64),
    /// Tune `theta` by likelihood maximization; otherwise keep `theta0`.
    pub optimize: bool,
    /// Budget of likelihood evaluations for the tuning.
    pub max_evaluations: usize,
}

impl KrigingConfig {
    pub fn new() -> Self {
        Self {
            theta0: vec![1e-3],
            corr: Correlation::AbsExp,
            nugget: 100.0 * f64::EPSILON,
            theta_bounds: (1e-6, 20.0),
            optimize: true,
            max_evaluations: 400,
        }
    }
}

impl Default for KrigingConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Factorized model for one `theta`.
#[derive(Debug, Clone)]
struct Fit {
    theta: Vec<f64>,
    chol: Cholesky,
    beta: f64,
    gamma: Vec<f64>,
    sigma2: f64,
    /// `L^-1 F` for the constant trend `F = 1`.
    ft: Vec<f64>,
    ft_norm: f64,
    reduced_likelihood: f64,
}

/// Ordinary kriging surrogate.
#[derive(Debug, Clone)]
pub struct Kriging {
    config: KrigingConfig,
    /// Standardized training inputs, one row per sample.
    x_norm: Vec<Vec<f64>>,
    y_norm: Vec<f64>,
    x_mean: Vec<f64>,
    x_std: Vec<f64>,
    y_mean: f64,
    y_std: f64,
    fit: Option<Fit>,
}

impl Kriging {
    pub fn new(config: KrigingConfig) -> Self {
        Self {
            config,
            x_norm: Vec::new(),
            y_norm: Vec::new(),
            x_mean: Vec::new(),
            x_std: Vec::new(),
            y_mean: 0.0,
            y_std: 1.0,
            fit: None,
        }
    }

    /// Stores (and standardizes) the training set. Invalidates a previous fit.
    pub fn set_training_values(&mut self, xt: &Array2<f64>, yt: &[f64]) -> Result<()> {
        let (n, d) = xt.dim();
        anyhow::ensure!(n >= 2, "Kriging needs at least two training points, got {n}");
        anyhow::ensure!(d >= 1, "Training inputs have no columns");
        anyhow::ensure!(
            yt.len() == n,
            "Got {} training outputs for {n} inputs",
            yt.len()
        );
        anyhow::ensure!(
            xt.iter().chain(yt).all(|v| v.is_finite()),
            "Training data contain non-finite values"
        );

        self.x_mean = (0..d).map(|j| mean(xt.column(j).iter().copied())).collect();
        self.x_std = (0..d)
            .map(|j| std_or_one(xt.column(j).iter().copied(), self.x_mean[j]))
            .collect();
        self.y_mean = mean(yt.iter().copied());
        self.y_std = std_or_one(yt.iter().copied(), self.y_mean);

        self.x_norm = xt
            .outer_iter()
            .map(|row| self.normalize_input(row.iter().copied()))
            .collect();
        self.y_norm = yt.iter().map(|y| (y - self.y_mean) / self.y_std).collect();
        self.fit = None;
        Ok(())
    }

    /// Fits the model, tuning `theta` when enabled.
    pub fn train(&mut self) -> Result<()> {
        anyhow::ensure!(!self.x_norm.is_empty(), "No training values set");
        let d = self.x_mean.len();
        let theta0 = match self.config.theta0.len() {
            1 => vec![self.config.theta0[0]; d],
            len if len == d => self.config.theta0.clone(),
            len => anyhow::bail!("theta0 has {len} values for {d} inputs"),
        };
        let (lo, hi) = self.config.theta_bounds;
        anyhow::ensure!(
            lo > 0.0 && lo < hi,
            "Invalid theta bounds [{lo}, {hi}]"
        );
        anyhow::ensure!(
            theta0.iter().all(|t| *t > 0.0 && t.is_finite()),
            "theta0 must be positive"
        );

        let theta = if self.config.optimize {
            self.optimize_theta(&theta0)
        } else {
            theta0
        };
        let fit = self
            .fit_theta(&theta)
            .with_context(|| format!("Kriging fit failed for theta = {theta:?}"))?;
        debug!(theta = ?fit.theta, likelihood = fit.reduced_likelihood, "Kriging trained");
        self.fit = Some(fit);
        Ok(())
    }

    /// Tuned correlation parameters (empty before training).
    pub fn theta(&self) -> &[f64] {
        self.fit.as_ref().map(|f| f.theta.as_slice()).unwrap_or(&[])
    }

    /// Predicted mean at each row of `x`.
    pub fn predict_values(&self, x: &Array2<f64>) -> Result<Vec<f64>> {
        let fit = self.trained(x)?;
        Ok(x.outer_iter()
            .map(|row| {
                let xn = self.normalize_input(row.iter().copied());
                let r = self.correlation_vector(&fit.theta, &xn);
                let y: f64 = fit.beta + r.iter().zip(&fit.gamma).map(|(a, b)| a * b).sum::<f64>();
                self.y_mean + self.y_std * y
            })
            .collect())
    }

    /// Predicted mean squared error at each row of `x`.
    pub fn predict_variances(&self, x: &Array2<f64>) -> Result<Vec<f64>> {
        let fit = self.trained(x)?;
        Ok(x.outer_iter()
            .map(|row| {
                let xn = self.normalize_input(row.iter().copied());
                let r = self.correlation_vector(&fit.theta, &xn);
                let rt = fit.chol.solve_lower(&r);
                let rt2: f64 = rt.iter().map(|v| v * v).sum();
                let u = (fit.ft.iter().zip(&rt).map(|(a, b)| a * b).sum::<f64>() - 1.0)
                    / fit.ft_norm;
                let mse = fit.sigma2 * (1.0 - rt2 + u * u);
                (mse * self.y_std * self.y_std).max(0.0)
            })
            .collect())
    }

    fn trained(&self, x: &Array2<f64>) -> Result<&Fit> {
        let fit = self.fit.as_ref().context("Kriging model is not trained")?;
        anyhow::ensure!(
            x.ncols() == self.x_mean.len(),
            "Prediction inputs have {} columns, model has {}",
            x.ncols(),
            self.x_mean.len()
        );
        Ok(fit)
    }

    fn normalize_input(&self, row: impl Iterator<Item = f64>) -> Vec<f64> {
        row.zip(self.x_mean.iter().zip(&self.x_std))
            .map(|(v, (m, s))| (v - m) / s)
            .collect()
    }

    fn correlation_vector(&self, theta: &[f64], x: &[f64]) -> Vec<f64> {
        self.x_norm
            .iter()
            .map(|xi| self.config.corr.eval(theta, xi, x))
            .collect()
    }

    fn fit_theta(&self, theta: &[f64]) -> Result<Fit> {
        let n = self.x_norm.len();
        let mut r = vec![vec![0.0; n]; n];
        for i in 0..n {
            r[i][i] = 1.0 + self.config.nugget;
            for j in 0..i {
                let c = self.config.corr.eval(theta, &self.x_norm[i], &self.x_norm[j]);
                r[i][j] = c;
                r[j][i] = c;
            }
        }
        let chol = Cholesky::factor(&r)?;

        // Generalized least squares for the constant trend.
        let ft = chol.solve_lower(&vec![1.0; n]);
        let yt = chol.solve_lower(&self.y_norm);
        let ft_ft: f64 = ft.iter().map(|v| v * v).sum();
        let ft_norm = ft_ft.sqrt();
        let beta = ft.iter().zip(&yt).map(|(a, b)| a * b).sum::<f64>() / ft_ft;
        let rho: Vec<f64> = yt.iter().zip(&ft).map(|(y, f)| y - f * beta).collect();
        let sigma2 = rho.iter().map(|v| v * v).sum::<f64>() / n as f64;
        let gamma = chol.solve_upper(&rho);

        let det_r_root_n = (chol.log_det() / n as f64).exp();
        let reduced_likelihood = -sigma2 * det_r_root_n;
        anyhow::ensure!(
            reduced_likelihood.is_finite() && beta.is_finite(),
            "Non-finite likelihood"
        );

        Ok(Fit {
            theta: theta.to_vec(),
            chol,
            beta,
            gamma,
            sigma2,
            ft,
            ft_norm,
            reduced_likelihood,
        })
    }

    fn likelihood(&self, log_theta: &[f64]) -> f64 {
        let theta: Vec<f64> = log_theta.iter().map(|l| 10f64.powf(*l)).collect();
        self.fit_theta(&theta)
            .map(|f| f.reduced_likelihood)
            .unwrap_or(f64::NEG_INFINITY)
    }

    /// Compass search over `log10(theta)` inside the bounds.
    fn optimize_theta(&self, theta0: &[f64]) -> Vec<f64> {
        let (lo, hi) = self.config.theta_bounds;
        let (lo, hi) = (lo.log10(), hi.log10());
        let d = theta0.len();
        let budget = self.config.max_evaluations.max(1);
        let mut evaluations = 0;

        // Starting point: theta0, or the best isotropic decade if that is better.
        let mut best: Vec<f64> = theta0.iter().map(|t| t.log10().clamp(lo, hi)).collect();
        let mut best_value = self.likelihood(&best);
        evaluations += 1;
        let mut decade = lo.ceil();
        while decade <= hi && evaluations < budget {
            let candidate = vec![decade; d];
            let value = self.likelihood(&candidate);
            evaluations += 1;
            if value > best_value {
                best = candidate;
                best_value = value;
            }
            decade += 1.0;
        }

        let mut step = 1.0;
        while step > 1e-3 && evaluations < budget {
            let mut improved = false;
            for j in 0..d {
                for sign in [1.0, -1.0] {
                    if evaluations >= budget {
                        break;
                    }
                    let mut candidate = best.clone();
                    candidate[j] = (candidate[j] + sign * step).clamp(lo, hi);
                    if candidate[j] == best[j] {
                        continue;
                    }
                    let value = self.likelihood(&candidate);
                    evaluations += 1;
                    if value > best_value {
                        best = candidate;
                        best_value = value;
                        improved = true;
                    }
                }
            }
            if !improved {
                step *= 0.5;
            }
        }

        debug!(evaluations, likelihood = best_value, "Theta search finished");
        best.iter().map(|l| 10f64.powf(*l)).collect()
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    sum / count as f64
}

/// Sample standard deviation (`ddof = 1`), or 1 for constant data.
fn std_or_one(values: impl Iterator<Item = f64>, mean: f64) -> f64 {
    let (ss, count) = values.fold((0.0, 0usize), |(s, c), v| (s + (v - mean).powi(2), c + 1));
    let std = (ss / (count as f64 - 1.0)).sqrt();
    if std > 0.0 && std.is_finite() { std } else { 1.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn grid_1d(n: usize, lo: f64, hi: f64) -> Array2<f64> {
        Array2::from_shape_fn((n, 1), |(i, _)| lo + (hi - lo) * i as f64 / (n - 1) as f64)
    }

    #[test]
    fn test_interpolates_training_points() {
        let xt = grid_1d(8, 0.0, 3.0);
        let yt: Vec<f64> = xt.column(0).iter().map(|x| x.sin()).collect();
        let mut sm = Kriging::new(KrigingConfig::new());
        sm.set_training_values(&xt, &yt).unwrap();
        sm.train().unwrap();

        let pred = sm.predict_values(&xt).unwrap();
        for (p, y) in pred.iter().zip(&yt) {
            assert!((p - y).abs() < 1e-5, "prediction {p} vs training value {y}");
        }
        let var = sm.predict_variances(&xt).unwrap();
        assert!(var.iter().all(|v| *v < 1e-6), "variances {var:?}");
        assert_eq!(sm.theta().len(), 1);
    }

    #[test]
    fn test_smooth_function_accuracy() {
        let xt = grid_1d(12, 0.0, 3.0);
        let yt: Vec<f64> = xt.column(0).iter().map(|x| x.sin()).collect();
        let config = KrigingConfig {
            theta0: vec![0.1],
            corr: Correlation::SquarExp,
            ..KrigingConfig::new()
        };
        let mut sm = Kriging::new(config);
        sm.set_training_values(&xt, &yt).unwrap();
        sm.train().unwrap();

        let xe = Array2::from_shape_fn((11, 1), |(i, _)| 0.1 + 0.28 * i as f64);
        let pred = sm.predict_values(&xe).unwrap();
        for (x, p) in xe.column(0).iter().zip(&pred) {
            assert!((p - x.sin()).abs() < 0.05, "f({x}) = {p}, expected {}", x.sin());
        }
        let var = sm.predict_variances(&xe).unwrap();
        assert!(var.iter().all(|v| *v >= 0.0));
    }

    #[test]
    fn test_variance_grows_away_from_data() {
        let xt = grid_1d(5, 0.0, 1.0);
        let yt: Vec<f64> = xt.column(0).iter().map(|x| x * x).collect();
        let config = KrigingConfig {
            theta0: vec![1.0],
            optimize: false,
            ..KrigingConfig::new()
        };
        let mut sm = Kriging::new(config);
        sm.set_training_values(&xt, &yt).unwrap();
        sm.train().unwrap();
        let near = Array2::from_elem((1, 1), 0.5);
        let far = Array2::from_elem((1, 1), 4.0);
        let v_near = sm.predict_variances(&near).unwrap()[0];
        let v_far = sm.predict_variances(&far).unwrap()[0];
        assert!(v_far > v_near, "near {v_near}, far {v_far}");
        assert_eq!(sm.theta(), &[1.0]);
    }

    #[test]
    fn test_untrained_and_shape_errors() {
        let mut sm = Kriging::new(KrigingConfig::new());
        let x = Array2::zeros((1, 2));
        assert!(sm.predict_values(&x).is_err());
        assert!(sm.train().is_err());

        let xt = Array2::from_shape_vec((3, 2), vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0]).unwrap();
        assert!(sm.set_training_values(&xt, &[1.0, 2.0]).is_err());
        sm.set_training_values(&xt, &[1.0, 2.0, 3.0]).unwrap();
        sm.train().unwrap();
        assert!(sm.predict_values(&Array2::zeros((1, 3))).is_err());
        assert_eq!(sm.theta().len(), 2);
    }
}
