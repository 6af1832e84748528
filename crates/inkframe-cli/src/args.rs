//! Command-line argument definitions for the inkframe CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, the output format,
//! configuration file selection, the Mermaid bridge and logging verbosity.

use clap::{Parser, ValueEnum};

/// Command-line arguments for the inkframe scene compiler
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input frame or storyboard (JSON)
    #[arg(help = "Path to the input file")]
    pub input: String,

    /// Path to the output file
    #[arg(short, long, default_value = "out.json")]
    pub output: String,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Convert frames with Mermaid text through the configured bridge service
    #[arg(long)]
    pub bridge: bool,
}

/// What the CLI writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// The compiled element array
    Json,
    /// An SVG preview of the compiled scene
    Svg,
}
