//! Setup and report output shared by the commands.

use super::Host;
use super::config::Config;
use crate::Result;
use crate::cache::{ComputationCache, FileCacheStore};
use crate::engine::MetricEngine;
use crate::registry::MetricRegistry;
use crate::reports::{Report, generate_console, generate_json};
use crate::tables::TableStore;
use camino::Utf8PathBuf;
use clap::Args;
use clap::ValueEnum;
use directories::BaseDirs;
use ohno::{IntoAppError, app_err};
use std::fs;
use std::io::Write;
use std::sync::Arc;

/// Color mode configuration for output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Always use colors
    Always,

    /// Never use colors
    Never,

    /// Use colors if the output is a terminal, otherwise don't use colors
    Auto,
}

/// Log level for diagnostic output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    None,

    /// Only error messages
    Error,

    /// Warning and error messages
    Warn,

    /// Info, warning, and error messages
    Info,

    /// Debug, info, warning, and error messages
    Debug,

    /// Trace, debug, info, warning, and error messages
    Trace,
}

/// Arguments shared by every command that works with the dataset
#[derive(Args, Debug)]
pub struct CommonArgs {
    /// Path to configuration file (default is `gridstat.toml`)
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,

    /// Directory holding the dataset CSV files, overriding the configuration
    #[arg(long, value_name = "PATH")]
    pub dataset_dir: Option<Utf8PathBuf>,

    /// Directory where computed results are cached, overriding the configuration
    #[arg(long, value_name = "PATH")]
    pub cache_dir: Option<Utf8PathBuf>,

    /// Compute every result fresh, without reading or writing the cache
    #[arg(long)]
    pub no_cache: bool,

    /// Control when to use colored output
    #[arg(long, value_name = "WHEN", default_value = "auto")]
    pub color: ColorMode,

    /// Set the logging level for diagnostic output
    #[arg(long, value_name = "LEVEL", default_value = "none", global = true)]
    pub log_level: LogLevel,

    /// Write the report as JSON to a file instead of to the terminal
    #[arg(long, value_name = "PATH", help_heading = "Report Output")]
    pub json: Option<Utf8PathBuf>,
}

pub struct Common<'a, H: Host> {
    pub config: Config,
    pub engine: MetricEngine,
    host: &'a mut H,
    color: ColorMode,
    json: Option<Utf8PathBuf>,
}

impl<'a, H: Host> Common<'a, H> {
    /// Load the configuration and dataset, and assemble the engine
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, the dataset cannot be loaded, or
    /// the cache directory cannot be determined
    pub async fn new(host: &'a mut H, args: &CommonArgs) -> Result<Self> {
        init_logging(args.log_level);

        let config = load_config(args)?;

        // Determine cache directory: use configured path or default cache directory for the platform
        let cache_dir = if let Some(cache_path) = &config.cache_dir {
            cache_path.as_std_path().to_path_buf()
        } else {
            BaseDirs::new()
                .into_app_err("could not determine cache directory")?
                .cache_dir()
                .join("gridstat")
        };

        let tables = load_tables(&config).await?;

        let store = FileCacheStore::new(cache_dir);
        let cache = ComputationCache::new(Box::new(store), config.cache_ttl, config.cache_enabled);

        let engine = MetricEngine::new(
            Arc::new(tables),
            Arc::new(MetricRegistry::with_builtin_metrics()),
            Arc::new(cache),
        );

        Ok(Self {
            config,
            engine,
            host,
            color: args.color,
            json: args.json.clone(),
        })
    }

    /// Write a report to the JSON file if one was requested, and to the console otherwise
    pub fn report(&mut self, report: &Report<'_>) -> Result<()> {
        if let Some(filename) = &self.json {
            let mut json_output = String::new();
            generate_json(report, &mut json_output)?;
            fs::write(filename, json_output).into_app_err_with(|| format!("writing JSON report to '{filename}'"))?;
            return Ok(());
        }

        let use_colors = match self.color {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => {
                use std::io::{IsTerminal, stdout};
                stdout().is_terminal()
            }
        };

        let mut console_output = String::new();
        generate_console(report, use_colors, &mut console_output)?;
        let _ = write!(self.host.output(), "{console_output}");
        Ok(())
    }
}

/// Load the configuration file and apply the command-line overrides
pub fn load_config(args: &CommonArgs) -> Result<Config> {
    let base_dir = Utf8PathBuf::from(".");
    let mut config = Config::load(&base_dir, args.config.as_ref())?;

    if let Some(dataset_dir) = &args.dataset_dir {
        config.dataset_dir.clone_from(dataset_dir);
    }
    if args.cache_dir.is_some() {
        config.cache_dir.clone_from(&args.cache_dir);
    }
    if args.no_cache {
        config.cache_enabled = false;
    }

    Ok(config)
}

/// Load the dataset named by the configuration on the blocking pool
pub async fn load_tables(config: &Config) -> Result<TableStore> {
    let dataset_dir = config.dataset_dir.clone();
    let min_season = config.min_season;
    tokio::task::spawn_blocking(move || TableStore::load(&dataset_dir, min_season))
        .await
        .map_err(|e| app_err!("loading the dataset did not complete: {e}"))?
}

/// Initialize logger based on log level
pub fn init_logging(log_level: LogLevel) {
    let level = match log_level {
        LogLevel::None => return,
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    };

    let env = env_logger::Env::default().filter_or("RUST_LOG", level);

    // A second command in the same process keeps the first logger
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(matches!(log_level, LogLevel::Debug | LogLevel::Trace))
        .try_init();
}
