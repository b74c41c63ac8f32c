use anyhow::Result;
use ndarray::Array2;
use rand::Rng;
use rand::seq::SliceRandom;

use super::problem::Problem;

/// Morris trajectories in unit and problem coordinates.
///
/// Rows are grouped by trajectory: rows `t * (k + 1) .. (t + 1) * (k + 1)`
/// belong to trajectory `t`, and consecutive rows in a group differ in
/// exactly one factor.
#[derive(Debug, Clone)]
pub struct MorrisSample {
    /// Trajectory points on the unit hypercube grid.
    pub unit: Array2<f64>,
    /// Same points rescaled to the problem bounds.
    pub scaled: Array2<f64>,
    pub num_levels: usize,
    pub trajectories: usize,
}

impl MorrisSample {
    /// Points per trajectory (`k + 1`).
    pub fn trajectory_size(&self) -> usize {
        self.unit.ncols() + 1
    }

    pub fn len(&self) -> usize {
        self.unit.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.unit.nrows() == 0
    }
}

/// Grid jump `Δ = p / (2 (p - 1))` on the unit scale.
pub fn grid_jump(num_levels: usize) -> f64 {
    num_levels as f64 / (2.0 * (num_levels as f64 - 1.0))
}

/// Generates `n_trajectories` Morris trajectories on a `num_levels` grid.
///
/// Each trajectory is `B* = (J x* + Δ/2 ((2B - J) D* + J)) P*` with a random
/// base point `x*`, random step directions `D*` and a random factor order `P*`.
pub fn sample<R: Rng + ?Sized>(
    problem: &Problem,
    n_trajectories: usize,
    num_levels: usize,
    rng: &mut R,
) -> Result<MorrisSample> {
    problem.validate()?;
    anyhow::ensure!(n_trajectories > 0, "Need at least one trajectory");
    anyhow::ensure!(
        num_levels >= 2 && num_levels % 2 == 0,
        "num_levels must be even and >= 2, got {num_levels}"
    );

    let k = problem.num_vars();
    let delta = grid_jump(num_levels);
    let base_grid: Vec<f64> = (0..num_levels / 2)
        .map(|i| i as f64 / (num_levels - 1) as f64)
        .collect();

    let rows = n_trajectories * (k + 1);
    let mut unit = Array2::zeros((rows, k));
    let mut order: Vec<usize> = (0..k).collect();

    for t in 0..n_trajectories {
        let x_star: Vec<f64> = (0..k)
            .map(|_| base_grid[rng.gen_range(0..base_grid.len())])
            .collect();
        let direction: Vec<f64> = (0..k)
            .map(|_| if rng.r#gen::<bool>() { 1.0 } else { -1.0 })
            .collect();
        order.shuffle(rng);

        for i in 0..=k {
            for (c, &j) in order.iter().enumerate() {
                // B is strictly lower triangular: factor j has moved once row i > j.
                let b = if i > j { 1.0 } else { 0.0 };
                let step = 0.5 * delta * ((2.0 * b - 1.0) * direction[j] + 1.0);
                unit[[t * (k + 1) + i, c]] = x_star[j] + step;
            }
        }
    }

    let mut scaled = unit.clone();
    for ((_, j), v) in scaled.indexed_iter_mut() {
        *v = problem.scale(j, *v);
    }

    Ok(MorrisSample {
        unit,
        scaled,
        num_levels,
        trajectories: n_trajectories,
    })
}
