//! Spectral irradiance tables and their linear interpolation.

pub mod config;
pub mod interpolate;
pub mod simulation;
pub mod spectrum;

pub use config::SpectralConfig;
pub use interpolate::LinearInterpolator;
pub use simulation::{SpectralResult, run_spectral};
pub use spectrum::Spectrum;
