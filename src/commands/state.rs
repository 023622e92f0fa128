//! # State Command Implementation
//!
//! Reads and changes the deployment state.
//!
//! ## Subcommands
//!
//! - **`get`**: Print one value, or the whole state merged with the config
//! - **`set`**: Store a value and save the state file
//! - **`unset`**: Remove a key (and everything below it) and save
//! - **`save`**: Write the merged state to disk, optionally to another file

use anyhow::{Context as _, Result};
use clap::{Args, Subcommand};
use std::path::PathBuf;

use microbs::session::Session;

use super::config::GetArgs;
use super::{parse_scalar, print_flat, print_found};

/// Read, change and save deployment state
#[derive(Args, Debug)]
pub struct StateArgs {
    #[command(subcommand)]
    pub command: StateSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum StateSubcommand {
    /// Print a state value, or the whole state when no key is given
    Get(GetArgs),
    /// Set a state value and save the state file
    Set(SetArgs),
    /// Remove a state value and save the state file
    Unset(UnsetArgs),
    /// Save the state file
    Save(SaveArgs),
}

/// Arguments for the state set command
#[derive(Args, Debug)]
pub struct SetArgs {
    /// Dotted key to write, e.g. `elastic.url`
    pub key: String,

    /// Value to store. Numbers and booleans keep their type; quote them in
    /// YAML style (`"'4317'"`) to store a string.
    pub value: String,
}

/// Arguments for the state unset command
#[derive(Args, Debug)]
pub struct UnsetArgs {
    /// Dotted key to remove
    pub key: String,
}

/// Arguments for the state save command
#[derive(Args, Debug)]
pub struct SaveArgs {
    /// Write to this file instead of the resolved state file
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Execute the `state` command.
pub fn execute(args: StateArgs, session: &mut Session) -> Result<()> {
    match args.command {
        StateSubcommand::Get(get) => execute_get(get, session),
        StateSubcommand::Set(set) => execute_set(set, session),
        StateSubcommand::Unset(unset) => execute_unset(unset, session),
        StateSubcommand::Save(save) => execute_save(save, session),
    }
}

fn execute_get(args: GetArgs, session: &mut Session) -> Result<()> {
    match args.key.as_deref() {
        Some(key) => {
            let value = session
                .state_get(key)
                .with_context(|| format!("Failed to read state key '{}'", key))?;
            print_found("state", key, value, args.json)
        }
        None => {
            let values = session
                .state
                .all(&session.context, &mut session.config)
                .context("Failed to load state")?;
            print_flat(values, args.json)
        }
    }
}

fn execute_set(args: SetArgs, session: &mut Session) -> Result<()> {
    session
        .state_set(&args.key, parse_scalar(&args.value))
        .with_context(|| format!("Failed to set state key '{}'", args.key))?;
    let path = session.state_save(None).context("Failed to save state")?;
    println!("Set {} in {}", args.key, path.display());
    Ok(())
}

fn execute_unset(args: UnsetArgs, session: &mut Session) -> Result<()> {
    session
        .state_set(&args.key, None)
        .with_context(|| format!("Failed to remove state key '{}'", args.key))?;
    let path = session.state_save(None).context("Failed to save state")?;
    println!("Removed {} from {}", args.key, path.display());
    Ok(())
}

fn execute_save(args: SaveArgs, session: &mut Session) -> Result<()> {
    let path = session
        .state_save(args.output.as_deref())
        .context("Failed to save state")?;
    println!("Saved state to {}", path.display());
    Ok(())
}
