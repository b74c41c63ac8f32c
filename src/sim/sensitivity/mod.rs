//! Morris elementary-effects screening.
//!
//! `sample` builds one-factor-at-a-time trajectories on a `p`-level grid and
//! `analyze` turns model outputs along those trajectories into the
//! μ, μ*, σ statistics of each factor.

pub mod analyze;
pub mod config;
pub mod problem;
pub mod sample;
pub mod simulation;

pub use analyze::{MorrisIndices, analyze};
pub use config::MorrisConfig;
pub use problem::Problem;
pub use sample::{MorrisSample, grid_jump, sample};
pub use simulation::{MorrisResult, run_morris};
