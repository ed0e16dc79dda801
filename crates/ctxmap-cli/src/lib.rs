//! CLI logic for the ctxmap tool.
//!
//! This module contains the core CLI logic for the ctxmap tool.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, Command};

use std::{fs, io};

use log::{info, warn};

use ctxmap::{CtxmapError, Workbench};

/// Run the ctxmap CLI application
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `CtxmapError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Parsing errors
/// - Validation errors
/// - Documents that are not in canonical form (`fmt --check`)
pub fn run(args: &Args) -> Result<(), CtxmapError> {
    let app_config = config::load_config(args.config.as_ref())?;
    let workbench = Workbench::new(app_config);

    match &args.command {
        Command::Check { input } => check(&workbench, input),
        Command::Fmt {
            input,
            output,
            check,
        } => format(&workbench, input, output.as_deref(), *check),
    }
}

fn check(workbench: &Workbench, input: &str) -> Result<(), CtxmapError> {
    info!(input_path = input; "Checking model");

    let source = fs::read_to_string(input)?;
    let model = workbench.parse(&source)?;
    let report = workbench.check(&model)?;

    for finding in report.warnings() {
        warn!("{finding}");
    }

    info!(input_path = input; "Model is valid");
    Ok(())
}

fn format(
    workbench: &Workbench,
    input: &str,
    output: Option<&str>,
    check: bool,
) -> Result<(), CtxmapError> {
    info!(input_path = input; "Formatting model");

    let source = fs::read_to_string(input)?;
    let model = workbench.parse(&source)?;
    let formatted = workbench.serialize(&model);

    if check {
        if formatted != source {
            return Err(CtxmapError::Io(io::Error::other(format!(
                "{input} is not in canonical form"
            ))));
        }
        info!(input_path = input; "Model is in canonical form");
        return Ok(());
    }

    match output {
        Some(path) => {
            fs::write(path, formatted)?;
            info!(output_file = path; "Formatted model written");
        }
        None => print!("{formatted}"),
    }

    Ok(())
}
