use super::Host;
use super::common::{CommonArgs, init_logging, load_config, load_tables};
use crate::Result;
use crate::tables::TableStore;
use clap::Parser;
use std::collections::BTreeMap;
use std::io::Write;

#[derive(Parser, Debug)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub common: CommonArgs,
}

/// Loads the configuration and the dataset it points at
async fn validate_inner(args: &CommonArgs) -> Result<TableStore> {
    let config = load_config(args)?;
    load_tables(&config).await
}

/// Checks the configuration and dataset, summarizing table availability and dropped rows
pub async fn validate_dataset<H: Host>(host: &mut H, args: &ValidateArgs) -> Result<()> {
    init_logging(args.common.log_level);

    match validate_inner(&args.common).await {
        Ok(tables) => {
            let _ = writeln!(host.output(), "Dataset is valid (version {})", tables.version());
            for (table, loaded) in tables.table_availability() {
                let state = if loaded { "loaded" } else { "not present" };
                let _ = writeln!(host.output(), "  {:<16} : {state}", table.csv_name());
            }

            let mut dropped: BTreeMap<&str, usize> = BTreeMap::new();
            for warning in tables.integrity_warnings() {
                *dropped.entry(warning.table.csv_name()).or_default() += 1;
            }

            if dropped.is_empty() {
                let _ = writeln!(host.output(), "No rows were dropped");
            } else {
                let _ = writeln!(host.output(), "Dropped rows:");
                for (csv_name, count) in dropped {
                    let _ = writeln!(host.output(), "  {csv_name:<16} : {count}");
                }
            }

            Ok(())
        }
        Err(e) => {
            let _ = writeln!(host.error(), "❌ Dataset validation failed: {e:#}");
            host.exit(1);
            Err(e)
        }
    }
}
