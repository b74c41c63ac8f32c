use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use comfortsim::{Analysis, AnalysisConfig, run_analysis};

#[derive(Parser, Debug)]
#[command(
    name = "comfortsim",
    version,
    about = "Thermal comfort and cube radiosity analyses with PNG plots"
)]
struct Cli {
    /// Analysis to run: morris, kriging, spectrum, radiosity or all.
    #[arg(default_value_t = Analysis::All)]
    analysis: Analysis,

    /// JSON analysis configuration; defaults are used when omitted.
    config: Option<PathBuf>,

    /// Directory for the written plots, overriding the configuration.
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AnalysisConfig::from_json_file(path)?,
        None => AnalysisConfig::default(),
    };
    if let Some(dir) = cli.output_dir {
        config.output_dir = dir;
    }

    for path in run_analysis(cli.analysis, &config)? {
        println!("Saved {}", path.display());
    }
    Ok(())
}
