//! # Config Command Implementation
//!
//! Read-only access to the config file. `microbs config get` prints the whole
//! flattened config; `microbs config get KEY` prints one value or subtree.
//! `microbs config has KEY...` fails unless every key is set.

use anyhow::{bail, Context as _, Result};
use clap::{Args, Subcommand};

use microbs::session::Session;

use super::{print_flat, print_found};

/// Read values from the config file
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigSubcommand {
    /// Print a config value, or the whole config when no key is given
    Get(GetArgs),

    /// Succeed only if every key is set to a non-empty value
    Has(HasArgs),
}

/// Arguments shared by the `get` subcommands
#[derive(Args, Debug)]
pub struct GetArgs {
    /// Dotted key to look up, e.g. `deployment.name`
    pub key: Option<String>,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `config has`
#[derive(Args, Debug)]
pub struct HasArgs {
    /// Dotted keys that must all be set
    #[arg(required = true)]
    pub keys: Vec<String>,
}

/// Execute the `config` command.
pub fn execute(args: ConfigArgs, session: &mut Session) -> Result<()> {
    match args.command {
        ConfigSubcommand::Get(get) => execute_get(get, session),
        ConfigSubcommand::Has(has) => execute_has(has, session),
    }
}

fn execute_get(args: GetArgs, session: &mut Session) -> Result<()> {
    match args.key.as_deref() {
        Some(key) => {
            let value = session
                .config_get(key)
                .with_context(|| format!("Failed to read config key '{}'", key))?;
            print_found("config", key, value, args.json)
        }
        None => {
            let values = session
                .config
                .all(&session.context)
                .context("Failed to load config")?;
            print_flat(values, args.json)
        }
    }
}

fn execute_has(args: HasArgs, session: &mut Session) -> Result<()> {
    let keys: Vec<&str> = args.keys.iter().map(String::as_str).collect();
    if !session.config_has(&keys).context("Failed to load config")? {
        bail!("Config does not set every key of: {}", keys.join(", "));
    }
    Ok(())
}
