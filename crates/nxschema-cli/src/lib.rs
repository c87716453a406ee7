//! CLI logic for the NxSchema catalog tool.
//!
//! This module builds a catalog from a schema document or a cached version
//! snapshot and writes its text report.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::{
    fs,
    io::{self, Write},
};

use log::info;

use nxschema::{NxSchemaError, SchemaBuilder, report};

/// Run the NxSchema CLI application
///
/// This function builds the catalog of the selected schema document and
/// writes the catalog report to the output file, or to stdout.
///
/// # Errors
///
/// Returns `NxSchemaError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Snapshot lookup errors
/// - Catalog build errors
pub fn run(args: &Args) -> Result<(), NxSchemaError> {
    let app_config = config::load_config(args.config.as_ref())?;
    let builder = SchemaBuilder::new(app_config);

    let catalog = match (&args.input, &args.version_ref) {
        (Some(input), _) => {
            info!(input_path = input; "Processing schema document");
            builder.load(input)?
        }
        (None, Some(version)) => {
            info!(version; "Processing schema snapshot");
            builder.load_version(version)?
        }
        (None, None) => {
            return Err(NxSchemaError::Config(
                "either an input path or a version reference is required".to_string(),
            ));
        }
    };

    let text = if args.root_only {
        report::root_report(&catalog)
    } else {
        report::catalog_report(&catalog)
    };

    match &args.output {
        Some(output) => {
            fs::write(output, text)?;
            info!(output_file = output; "Catalog report written");
        }
        None => io::stdout().lock().write_all(text.as_bytes())?,
    }

    Ok(())
}
