//! Command-line arguments.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Inspect, render and normalize MockDraft mockup files.
#[derive(Debug, Parser)]
#[command(name = "mockdraft", version, about)]
pub struct Args {
    /// Editor configuration (JSON).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (off, error, warn, info, debug, trace).
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Summarize the widgets and groups in a mockup.
    Info {
        file: PathBuf,
    },
    /// Dump every widget's drawing instructions as JSON.
    Render {
        file: PathBuf,
        /// Pretty-print the JSON.
        #[arg(long)]
        pretty: bool,
    },
    /// Load a mockup and write it back in canonical form.
    Normalize {
        input: PathBuf,
        output: PathBuf,
    },
    /// List widget type ordinals and names.
    Palette,
}
