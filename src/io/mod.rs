//! File I/O for analysis inputs.
//!
//! Spectral tables are read from spreadsheets or CSV files and analysis
//! settings from JSON.

pub mod config;
pub mod spreadsheet;

pub use config::{read_config, write_config};
pub use spreadsheet::read_columns;
