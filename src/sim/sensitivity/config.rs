use serde::{Deserialize, Serialize};

use super::problem::Problem;

/// Configuration of the SET Morris screening.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MorrisConfig {
    /// Factors and bounds, in the order `[T_a, T_r, v, RH]`.
    pub problem: Problem,
    /// Number of trajectories (repetitions).
    pub trajectories: usize,
    /// Number of grid levels `p`.
    pub num_levels: usize,
    /// Confidence level of the `mu_star` bootstrap interval.
    pub conf_level: f64,
    pub num_resamples: usize,
    /// RNG seed. `None` draws from OS entropy.
    pub seed: Option<u64>,
    /// Fixed metabolic rate in met.
    pub met: f64,
    /// Fixed clothing insulation in clo.
    pub clo: f64,
    /// Print the indices table to stdout.
    pub print_to_console: bool,
}

impl MorrisConfig {
    pub fn new() -> Self {
        Self {
            problem: Problem::set_comfort(),
            trajectories: 50,
            num_levels: 4,
            conf_level: 0.95,
            num_resamples: 1000,
            seed: None,
            met: 1.2,
            clo: 0.5,
            print_to_console: true,
        }
    }

    /// Model evaluations needed: `N (k + 1)`.
    pub fn total_evaluations(&self) -> usize {
        self.trajectories * (self.problem.num_vars() + 1)
    }
}

impl Default for MorrisConfig {
    fn default() -> Self {
        Self::new()
    }
}
