//! CLI argument parsing and command dispatch

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use log::debug;
use serde_yaml::{Mapping, Value as YamlValue};

use microbs::context::Context;
use microbs::defaults::path_value;
use microbs::session::Session;

use crate::commands;

/// microbs - Deployment config and state for observable microservices
#[derive(Parser, Debug)]
#[command(name = "microbs")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Path to the config file.
    ///
    /// Defaults to `config.yaml` in the current directory, then in the
    /// microbs home directory.
    #[arg(long, global = true, value_name = "FILE", env = "MICROBS_CONFIG")]
    config: Option<PathBuf>,

    /// Path to the state file.
    ///
    /// Defaults to `state.yaml` in the current directory, then in the
    /// microbs home directory, where it is created if missing.
    #[arg(long, global = true, value_name = "FILE", env = "MICROBS_STATE")]
    state: Option<PathBuf>,

    /// The microbs home directory (defaults to `~/.microbs`)
    #[arg(long, global = true, value_name = "DIR", env = "MICROBS_HOME")]
    home: Option<PathBuf>,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "info")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Read values from the config file
    Config(commands::config::ConfigArgs),

    /// Read, change and save deployment state
    State(commands::state::StateArgs),

    /// Show the facts recorded for this invocation
    Context(commands::context::ContextArgs),

    /// Save state and write it to an env file for deployment tooling
    Env(commands::env::EnvArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Config(_) => "config",
            Commands::State(_) => "state",
            Commands::Context(_) => "context",
            Commands::Env(_) => "env",
            Commands::Completions(_) => "completions",
        }
    }
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        let mut context = Context::with_defaults(self.context_overrides()?);
        init_logging(&context.log_level());
        context.freeze();
        debug!("Running '{}'", self.command.name());

        let mut session = Session::new(context);
        match self.command {
            Commands::Config(args) => commands::config::execute(args, &mut session),
            Commands::State(args) => commands::state::execute(args, &mut session),
            Commands::Context(args) => commands::context::execute(args, &session),
            Commands::Env(args) => commands::env::execute(args, &mut session),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }

    /// Invocation facts registered in the context at start-up.
    ///
    /// Arguments are recorded lossily since they are informational. Paths
    /// are not: a path that is not valid UTF-8 is rejected.
    fn context_overrides(&self) -> Result<Mapping> {
        let args: Vec<YamlValue> = std::env::args_os()
            .skip(1)
            .map(|arg| YamlValue::from(arg.to_string_lossy().into_owned()))
            .collect();

        let mut overrides = Mapping::new();
        overrides.insert("command".into(), self.command.name().into());
        overrides.insert("args".into(), YamlValue::Sequence(args));

        let mut log = Mapping::new();
        log.insert("level".into(), self.log_level.as_str().into());
        overrides.insert("log".into(), YamlValue::Mapping(log));

        let mut path = Mapping::new();
        for (key, flag, value) in [
            ("config", "--config", &self.config),
            ("state", "--state", &self.state),
            ("user", "--home", &self.home),
        ] {
            if let Some(value) = value {
                let value =
                    path_value(value).with_context(|| format!("Invalid {} path", flag))?;
                path.insert(key.into(), value);
            }
        }
        if !path.is_empty() {
            overrides.insert("path".into(), YamlValue::Mapping(path));
        }
        Ok(overrides)
    }
}

/// Initialize `env_logger`. `RUST_LOG` takes precedence over `level`.
fn init_logging(level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}
