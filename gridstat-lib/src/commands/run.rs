//! Command dispatch logic for gridstat

use super::{
    CacheArgs, CompareArgs, GetArgs, InitArgs, ListArgs, ValidateArgs, compare_subjects, get_metrics, init_config, list_metrics,
    manage_cache, validate_dataset,
};
use crate::{Host, Result};
use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use clap::{Parser, Subcommand};
use std::io::Write;

const CLAP_STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

#[derive(Parser, Debug)]
#[command(name = "gridstat", author, version, long_about = None)]
#[command(about = "Compute, cache and compare motorsport driver and constructor statistics")]
#[command(styles = CLAP_STYLES)]
struct Cli {
    #[command(subcommand)]
    command: GridstatSubcommand,
}

#[derive(Subcommand, Debug)]
enum GridstatSubcommand {
    /// List the metrics available for drivers or constructors
    List(ListArgs),
    /// Compute one or more metrics for a driver or constructor
    Get(Box<GetArgs>),
    /// Compare drivers or constructors on one or more metrics
    Compare(Box<CompareArgs>),
    /// Inspect or clear the result cache
    Cache(CacheArgs),
    /// Generate a default configuration file
    Init(InitArgs),
    /// Check the configuration and dataset
    Validate(ValidateArgs),
}

/// Dispatch command-line arguments to the appropriate handler
///
/// This function parses the command-line arguments and executes the corresponding
/// subcommand. It's designed to be called from main.rs with the program arguments.
///
/// # Arguments
///
/// * `args` - An iterator of command-line arguments (typically from `std::env::args()`)
///
/// # Errors
///
/// Returns an error if the executed command fails. Invalid arguments, `--help` and
/// `--version` are reported through the host, which is then asked to exit.
pub async fn run<I, T, H>(host: &mut H, args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
    H: Host,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(e) => {
            let rendered = e.render().ansi().to_string();
            if e.use_stderr() {
                let _ = write!(host.error(), "{rendered}");
            } else {
                let _ = write!(host.output(), "{rendered}");
            }
            host.exit(e.exit_code());
            return Ok(());
        }
    };

    match &cli.command {
        GridstatSubcommand::List(list_args) => list_metrics(host, list_args).await,
        GridstatSubcommand::Get(get_args) => get_metrics(host, get_args).await,
        GridstatSubcommand::Compare(compare_args) => compare_subjects(host, compare_args).await,
        GridstatSubcommand::Cache(cache_args) => manage_cache(host, cache_args).await,
        GridstatSubcommand::Init(init_args) => init_config(host, init_args),
        GridstatSubcommand::Validate(validate_args) => validate_dataset(host, validate_args).await,
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::commands::host::TestHost;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[tokio::test]
    async fn test_help_goes_to_output() {
        let mut host = TestHost::new();
        run(&mut host, ["gridstat", "--help"]).await.unwrap();

        assert_eq!(host.exit_code, Some(0));
        assert!(host.output_str().contains("compare"));
        assert!(host.error_str().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_arguments_go_to_error() {
        let mut host = TestHost::new();
        run(&mut host, ["gridstat", "get", "podium_rate", "--driver", "1", "--constructor", "2"])
            .await
            .unwrap();

        assert_eq!(host.exit_code, Some(2));
        assert!(host.error_str().contains("cannot be used with"));
    }

    #[tokio::test]
    async fn test_subject_is_required() {
        let mut host = TestHost::new();
        run(&mut host, ["gridstat", "get", "podium_rate"]).await.unwrap();
        assert_eq!(host.exit_code, Some(2));
    }

    #[tokio::test]
    async fn test_invalid_season() {
        let mut host = TestHost::new();
        run(&mut host, ["gridstat", "get", "podium_rate", "--driver", "1", "--season", "last"])
            .await
            .unwrap();

        assert_eq!(host.exit_code, Some(2));
        assert!(host.error_str().contains("invalid season 'last'"));
    }

    #[tokio::test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    async fn test_init_writes_default_config() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("gridstat.toml");

        let mut host = TestHost::new();
        run(&mut host, ["gridstat", "init", path.to_str().unwrap()]).await.unwrap();

        assert!(host.output_str().contains("Generated default configuration file"));
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, crate::commands::config::DEFAULT_CONFIG_TOML);
    }
}
