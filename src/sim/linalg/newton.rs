use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::lu::Lu;

/// Stopping criteria for [`newton_solve`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewtonOptions {
    /// Maximum number of Newton steps.
    pub max_iterations: usize,
    /// Relative step tolerance: stop when `|dx| <= xtol * (|x| + xtol)`.
    pub xtol: f64,
    /// Absolute residual tolerance (max norm).
    pub ftol: f64,
}

impl NewtonOptions {
    pub fn new() -> Self {
        Self {
            max_iterations: 100,
            xtol: 1.49012e-8,
            ftol: 1e-10,
        }
    }
}

impl Default for NewtonOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of a converged Newton solve.
#[derive(Debug, Clone)]
pub struct NewtonReport {
    pub x: Vec<f64>,
    pub iterations: usize,
    /// Max-norm of the residual at `x`.
    pub residual_norm: f64,
}

/// Finds a root of `f(x) = 0` with Newton's method starting from `x0`.
///
/// The Jacobian is approximated by forward differences and every step is a
/// dense linear solve, so this is intended for small systems.
pub fn newton_solve<F>(f: F, x0: &[f64], options: &NewtonOptions) -> Result<NewtonReport>
where
    F: Fn(&[f64]) -> Vec<f64>,
{
    let n = x0.len();
    anyhow::ensure!(n > 0, "Newton solve needs at least one unknown");

    let mut x = x0.to_vec();
    let mut fx = f(&x);
    anyhow::ensure!(
        fx.len() == n,
        "Residual length {} does not match unknowns {n}",
        fx.len()
    );

    for iteration in 0..options.max_iterations {
        let residual_norm = max_norm(&fx);
        anyhow::ensure!(
            residual_norm.is_finite(),
            "Non-finite residual at iteration {iteration}"
        );
        if residual_norm <= options.ftol {
            return Ok(NewtonReport {
                x,
                iterations: iteration,
                residual_norm,
            });
        }

        let jac = jacobian_fd(&f, &x, &fx);
        let rhs: Vec<f64> = fx.iter().map(|v| -v).collect();
        let dx = Lu::factor(n, jac)?.solve(&rhs)?;

        for (xi, dxi) in x.iter_mut().zip(&dx) {
            *xi += dxi;
        }
        fx = f(&x);

        let step = l2_norm(&dx);
        let scale = l2_norm(&x);
        debug!(iteration, step, residual = max_norm(&fx), "Newton step");
        if step <= options.xtol * (scale + options.xtol) {
            return Ok(NewtonReport {
                residual_norm: max_norm(&fx),
                x,
                iterations: iteration + 1,
            });
        }
    }

    anyhow::bail!(
        "Newton solve did not converge in {} iterations",
        options.max_iterations
    )
}

/// Row-major forward-difference Jacobian.
fn jacobian_fd<F>(f: &F, x: &[f64], fx: &[f64]) -> Vec<f64>
where
    F: Fn(&[f64]) -> Vec<f64>,
{
    let n = x.len();
    let eps = f64::EPSILON.sqrt();
    let mut jac = vec![0.0; n * n];
    let mut xh = x.to_vec();
    for j in 0..n {
        let h = eps * x[j].abs().max(1.0);
        xh[j] = x[j] + h;
        let fh = f(&xh);
        for i in 0..n {
            jac[i * n + j] = (fh[i] - fx[i]) / h;
        }
        xh[j] = x[j];
    }
    jac
}

fn max_norm(v: &[f64]) -> f64 {
    v.iter().fold(0.0_f64, |acc, x| acc.max(x.abs()))
}

fn l2_norm(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_system_converges_fast() {
        // 3x + y = 9, x + 2y = 8 -> (2, 3)
        let f = |x: &[f64]| vec![3.0 * x[0] + x[1] - 9.0, x[0] + 2.0 * x[1] - 8.0];
        let report = newton_solve(f, &[0.0, 0.0], &NewtonOptions::default()).unwrap();
        assert!((report.x[0] - 2.0).abs() < 1e-6);
        assert!((report.x[1] - 3.0).abs() < 1e-6);
        assert!(report.iterations <= 3);
    }

    #[test]
    fn test_nonlinear_root() {
        // x^2 = 2, y^3 = 27
        let f = |x: &[f64]| vec![x[0] * x[0] - 2.0, x[1] * x[1] * x[1] - 27.0];
        let report = newton_solve(f, &[1.0, 1.0], &NewtonOptions::default()).unwrap();
        assert!((report.x[0] - 2.0_f64.sqrt()).abs() < 1e-8);
        assert!((report.x[1] - 3.0).abs() < 1e-8);
    }

    #[test]
    fn test_no_root_fails() {
        let f = |x: &[f64]| vec![x[0] * x[0] + 1.0];
        let options = NewtonOptions {
            max_iterations: 20,
            ..NewtonOptions::default()
        };
        assert!(newton_solve(f, &[0.5], &options).is_err());
    }
}
