//! # Context Command Implementation
//!
//! Prints the facts recorded for the current invocation: the resolved paths,
//! the command name and arguments, and the log level. Mostly useful to see
//! which files `microbs` is going to use.

use anyhow::Result;
use clap::Args;

use microbs::session::Session;

use super::{print_found, print_value};

/// Show the facts recorded for this invocation
#[derive(Args, Debug)]
pub struct ContextArgs {
    /// Dotted key to look up, e.g. `path.user`
    pub key: Option<String>,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Execute the `context` command.
pub fn execute(args: ContextArgs, session: &Session) -> Result<()> {
    match args.key.as_deref() {
        Some(key) => print_found("context", key, session.context.get(key), args.json),
        None => print_value(&session.context.get("").unwrap_or_default(), args.json),
    }
}
