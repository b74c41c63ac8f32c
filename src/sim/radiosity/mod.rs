//! Grey-body radiosity exchange inside a six-face cube enclosure.
//!
//! Physics:
//! - `J_i = eps_i * sigma * T_i^4 + (1 - eps_i) * E_i` (radiosity)
//! - `E_i = sum_j(F_ij * J_j)` (incident radiation)
//! - `T_r,i = (E_i / sigma)^(1/4)` (radiant temperature seen by face i)
//!
//! Faces are indexed `0..6` with opposite pairs `(0, 5)`, `(1, 2)`, `(3, 4)`.

pub mod config;
pub mod enclosure;
pub mod simulation;
pub mod view_factors;

pub use config::{RadiosityConfig, ViewFactorSource};
pub use enclosure::CubeEnclosure;
pub use simulation::{RadiosityResult, run_radiosity};
pub use view_factors::{
    FACE_NAMES, OPPOSITE_PAIRS, analytic_cube_view_factors, cube_view_factors,
    monte_carlo_cube_view_factors,
};

/// Stefan–Boltzmann constant [W/(m² K⁴)].
pub const SIGMA: f64 = 5.67e-8;

/// Number of faces of the enclosure.
pub const N_FACES: usize = 6;

/// Row-major 6×6 view factor matrix, `F[i][j]` from face `i` to face `j`.
pub type ViewFactorMatrix = [[f64; N_FACES]; N_FACES];
