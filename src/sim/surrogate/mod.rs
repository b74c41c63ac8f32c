//! Kriging metamodel of SET over air and radiant temperature.

pub mod config;
pub mod kriging;
pub mod sampling;
pub mod simulation;

pub use config::SurrogateConfig;
pub use kriging::{Correlation, Kriging, KrigingConfig};
pub use sampling::{LatinHypercube, LhsCriterion};
pub use simulation::{SurrogateResult, linspace, run_surrogate};
