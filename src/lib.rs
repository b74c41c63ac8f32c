pub mod config;
pub mod draw;
pub mod io;
pub mod run;
pub mod sim;

// Prelude
pub use config::AnalysisConfig;
pub use draw::PlotConfig;
pub use run::{Analysis, run_analysis};
pub use sim::comfort::{ComfortInputs, set_tmp, two_node};
pub use sim::radiosity::{RadiosityConfig, RadiosityResult, run_radiosity};
pub use sim::sensitivity::{MorrisConfig, MorrisResult, run_morris};
pub use sim::spectral::{SpectralConfig, SpectralResult, run_spectral};
pub use sim::surrogate::{SurrogateConfig, SurrogateResult, run_surrogate};
