//! Command-line argument definitions for the ctxmap CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments select the subcommand and its paths, the
//! configuration file, and logging verbosity.

use clap::{Parser, Subcommand};

/// Command-line arguments for the ctxmap tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parse and validate a document
    Check {
        /// Path to the input file
        input: String,
    },

    /// Rewrite a document in canonical form
    Fmt {
        /// Path to the input file
        input: String,

        /// Write the result here instead of standard output
        #[arg(short, long)]
        output: Option<String>,

        /// Fail if the input is not already in canonical form
        #[arg(long, conflicts_with = "output")]
        check: bool,
    },
}
