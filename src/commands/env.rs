//! # Env Command Implementation
//!
//! Saves the state and writes every state value to a dotenv file, which
//! deployment tooling reads as secrets. Keys become upper-case variable names
//! with `.` replaced by `_`.

use anyhow::{Context as _, Result};
use clap::Args;
use std::path::PathBuf;

use microbs::session::Session;

/// Save state and write it to an env file for deployment tooling
#[derive(Args, Debug)]
pub struct EnvArgs {
    /// Where to write the env file (defaults to `.env` in the current directory)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Execute the `env` command.
pub fn execute(args: EnvArgs, session: &mut Session) -> Result<()> {
    let output = args
        .output
        .unwrap_or_else(|| session.context.cwd().join(".env"));
    let saved = session
        .stage_env(&output)
        .with_context(|| format!("Failed to write env file {}", output.display()))?;
    println!("Saved state to {}", saved.display());
    println!("Wrote {}", output.display());
    Ok(())
}
