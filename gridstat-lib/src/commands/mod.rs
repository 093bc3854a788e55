//! Command-line interface and orchestration for gridstat
//!
//! This module implements the CLI commands and wires the dataset, the metric registry,
//! the result cache and the engine together for each invocation. It handles argument
//! parsing, configuration management, and report output.
//!
//! # Implementation Model
//!
//! ## Commands
//!
//! - **list**: Show the metric catalog for drivers or constructors, optionally limited
//!   to one category
//! - **get**: Compute one or more metrics for a single driver or constructor
//! - **compare**: Compute metrics for two or more subjects of the same kind and score
//!   them against each other
//! - **cache**: Show cache statistics, or clear all cached results or those of one metric
//! - **init**: Generate a default configuration file
//! - **validate**: Load the configuration and dataset and summarize what was loaded
//!
//! ## Execution Flow
//!
//! The `run` function parses command-line arguments using clap and routes
//! to the appropriate command handler. Dataset commands follow the same pattern:
//!
//! 1. Load configuration and apply command-line overrides
//! 2. Load the dataset tables on the blocking pool
//! 3. Assemble a `MetricEngine` over the tables, the built-in registry and the file cache
//! 4. Run the engine operation
//! 5. Render the outcome as a console or JSON report
//!
//! The `common` module provides the shared pieces: logging setup, color mode handling,
//! engine assembly, and report output.

mod cache;
mod common;
mod compare;
mod config;
mod get;
mod host;
mod init;
mod list;
mod run;
mod validate;

#[cfg(debug_assertions)]
pub use config::Config;

pub use cache::{CacheArgs, manage_cache};
pub use common::{ColorMode, CommonArgs, LogLevel};
pub use compare::{CompareArgs, compare_subjects};
pub use get::{GetArgs, get_metrics};
pub use host::Host;
pub use init::{InitArgs, init_config};
pub use list::{ListArgs, list_metrics};
pub use run::run;
pub use validate::{ValidateArgs, validate_dataset};
