//! # agentctl: command-line access to the agent platform database
//!
//! `agentctl` maintains the relational dataset of an AI-agent marketplace: users who are agent
//! creators or agent clients, the base models creators publish, client customizations of those
//! models, client configurations, and the internet services (LLM or data storage) a base model
//! depends on. Each invocation performs exactly one command and exits.
//!
//! ## Commands
//!
//! | Command | Effect |
//! |---|---|
//! | `import <folder>` | Drop and recreate the schema, then load every table from `<folder>/*.csv` |
//! | `insertAgentClient uid username email cardno cardholder expire cvv zip interests` | Create a user and its client record |
//! | `addCustomizedModel mid bmid` | Add a customization of a base model |
//! | `deleteBaseModel bmid` | Delete a base model together with everything hanging off it |
//! | `listInternetService bmid` | Services a base model uses, ordered by provider |
//! | `countCustomizedModel bmid...` | Customization count per existing base model |
//! | `topNDurationConfig uid n` | A client's `n` longest running configurations |
//! | `listBaseModelKeyWord keyword` | Base models using an LLM service whose domain contains `keyword` |
//! | `printNL2SQLresult` | Echo the NL2SQL experiment results file |
//!
//! Mutations print `Success` or `Fail`. Queries print one comma-joined line per row. The process
//! exits with status 1 on any failure. Diagnostics go to standard error through `tracing`.
//!
//! ## Architecture
//!
//! - [`cli`] turns the positional arguments into a validated [`cli::Command`].
//! - [`commands`] opens a single PostgreSQL connection and dispatches to the repositories.
//! - [`db`] holds the schema, the models and one repository per entity.
//! - [`import`] implements the bulk CSV load as a single transaction.
//!
//! ```no_run
//! use clap::Parser;
//! use agentctl::commands;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let args = agentctl::config::Args::parse();
//!
//! let mut out = std::io::stdout();
//! let succeeded = commands::invoke(&args, &mut out).await?;
//! # let _ = succeeded;
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration
//!
//! See the [`config`] module for configuration options.

pub mod cli;
pub mod commands;
pub mod config;
pub mod db;
pub mod errors;
pub mod import;
pub mod telemetry;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

#[cfg(test)]
mod test;

pub use config::Config;
