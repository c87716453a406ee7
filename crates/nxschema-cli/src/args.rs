//! Command-line argument definitions for the NxSchema CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments select the schema document (a file or a cached
//! version reference), the report destination, configuration file selection,
//! and logging verbosity.

use clap::Parser;

/// Command-line arguments for the NxSchema catalog tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input schema document (nxdl.xsd)
    #[arg(
        help = "Path to the input schema document",
        required_unless_present = "version_ref"
    )]
    pub input: Option<String>,

    /// Version reference (branch, release, tag or commit) to load from the
    /// snapshot cache instead of a file
    #[arg(short = 'r', long, conflicts_with = "input")]
    pub version_ref: Option<String>,

    /// Path to the report file; the report goes to stdout when omitted
    #[arg(short, long)]
    pub output: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Only report the definition root and its children
    #[arg(long)]
    pub root_only: bool,
}

impl Args {
    /// Name of the schema document for error reports.
    pub fn origin(&self) -> String {
        match (&self.input, &self.version_ref) {
            (Some(input), _) => input.clone(),
            (None, Some(version)) => format!("version {version}"),
            (None, None) => "<schema>".to_string(),
        }
    }
}
