//! # microbs CLI
//!
//! This is the binary entry point for the `microbs` command-line tool.
//!
//! Its primary responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Building the invocation context and the config and state stores.
//! - Executing the appropriate command and reporting errors.
//!
//! The stores live in the `microbs` library crate; the binary is a thin
//! wrapper around them.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
