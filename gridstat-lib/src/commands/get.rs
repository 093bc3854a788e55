use super::Host;
use super::common::{Common, CommonArgs};
use crate::Result;
use crate::engine::SubjectInfo;
use crate::metrics::Subject;
use crate::reports::Report;
use crate::tables::{ConstructorId, DriverId, SeasonFilter};
use clap::{Args, Parser};
use compact_str::ToCompactString;
use ohno::bail;

#[derive(Parser, Debug)]
pub struct GetArgs {
    /// Metrics to compute (comma-separated or repeated)
    #[arg(value_name = "METRIC", required = true, value_delimiter = ',')]
    pub metrics: Vec<String>,

    #[command(flatten)]
    pub subject: SubjectArgs,

    /// Season to restrict the computation to, or `career` for every loaded season
    #[arg(long, value_name = "YEAR", default_value = "career", value_parser = parse_season)]
    pub season: SeasonFilter,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Exactly one driver or constructor
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct SubjectArgs {
    /// Driver id
    #[arg(long, value_name = "ID")]
    pub driver: Option<u32>,

    /// Constructor id
    #[arg(long, value_name = "ID")]
    pub constructor: Option<u32>,
}

impl SubjectArgs {
    fn subject(&self) -> Option<Subject> {
        self.driver
            .map(|id| Subject::Driver(DriverId(id)))
            .or_else(|| self.constructor.map(|id| Subject::Constructor(ConstructorId(id))))
    }
}

/// Clap value parser for season filters
pub fn parse_season(s: &str) -> Result<SeasonFilter, String> {
    s.parse::<SeasonFilter>().map_err(|e| e.to_string())
}

pub async fn get_metrics<H: Host>(host: &mut H, args: &GetArgs) -> Result<()> {
    let Some(subject) = args.subject.subject() else {
        bail!("either --driver or --constructor is required");
    };

    let mut common = Common::new(host, &args.common).await?;
    let outcomes = common.engine.get_many(&args.metrics, subject, args.season).await;

    let info = SubjectInfo {
        subject,
        name: common.engine.subject_name(subject).unwrap_or_else(|| subject.to_compact_string()),
    };

    common.report(&Report::Results {
        subject: &info,
        season: args.season,
        outcomes: &outcomes,
    })?;

    let failed = outcomes.iter().filter(|(_, outcome)| !outcome.is_found()).count();
    if failed > 0 {
        bail!("{failed} of {} metric(s) could not be computed", outcomes.len());
    }

    Ok(())
}
