//! CLI Adapter
//!
//! Command-line interface for outlier-scan.
//! Uses clap derive macros for argument parsing.

mod commands;

pub use commands::{execute, resolve_config, CliApp, Command, OutputFormat, ScanCmd, ShowCmd};

/// Initialize the CLI application
pub fn init() -> CliApp {
    use clap::Parser;
    CliApp::parse()
}
