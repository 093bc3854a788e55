use super::Host;
use super::common::{Common, CommonArgs};
use crate::Result;
use crate::reports::Report;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub command: CacheSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum CacheSubcommand {
    /// Show cache configuration, contents and counters
    Stats(CacheStatsArgs),
    /// Remove cached results
    Clear(CacheClearArgs),
}

#[derive(Parser, Debug)]
pub struct CacheStatsArgs {
    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Parser, Debug)]
pub struct CacheClearArgs {
    /// Only remove results of this metric
    #[arg(long, value_name = "NAME")]
    pub metric: Option<String>,

    #[command(flatten)]
    pub common: CommonArgs,
}

pub async fn manage_cache<H: Host>(host: &mut H, args: &CacheArgs) -> Result<()> {
    match &args.command {
        CacheSubcommand::Stats(stats_args) => {
            let mut common = Common::new(host, &stats_args.common).await?;
            let stats = common.engine.cache_stats()?;
            common.report(&Report::CacheStats(&stats))
        }
        CacheSubcommand::Clear(clear_args) => {
            let mut common = Common::new(host, &clear_args.common).await?;
            let metric = clear_args.metric.as_deref();
            let removed = common.engine.cache_clear(metric)?;
            common.report(&Report::CacheCleared { metric, removed })
        }
    }
}
