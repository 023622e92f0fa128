//! # microbs
//!
//! Configuration, state and invocation context for the `microbs` deployment
//! tool. This library is used by the `microbs` command-line binary, but the
//! stores can be embedded by anything that needs the same file layout.
//!
//! ## Quick Example
//!
//! ```
//! use microbs::config::ConfigStore;
//! use microbs::flatten::FlatMap;
//!
//! let mut values = FlatMap::new();
//! values.insert("deployment.name".to_string(), "demo".into());
//! let store = ConfigStore::from_map(values);
//! assert!(store.is_initialized());
//! ```
//!
//! ## Core Concepts
//!
//! - **Context (`context`)**: write-once facts about the current invocation,
//!   such as the command name, the log level and the resolved file paths.
//! - **Config (`config`)**: the operator's declared intent, loaded once from
//!   `config.yaml` and frozen for the rest of the command.
//! - **State (`state`)**: durable deployment facts in `state.yaml`. State is
//!   mutable and saved back to disk; on load the config is merged over it.
//! - **Flattening (`flatten`)**: both files are held in memory as maps from
//!   dotted keys (`otlp.receiver.port`) to leaf values.
//! - **Resolution (`path`)**: which file backs each store. An explicit path
//!   wins, then the context, then the working directory, then `~/.microbs`.
//!
//! A [`session::Session`] bundles the three stores for one command.

pub mod config;
pub mod context;
pub mod defaults;
pub mod envfile;
pub mod error;
pub mod flatten;
pub mod merge;
pub mod path;
pub mod session;
pub mod state;

#[cfg(test)]
mod flatten_proptest;
