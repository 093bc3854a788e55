use super::Host;
use super::common::{Common, CommonArgs};
use super::get::parse_season;
use crate::Result;
use crate::metrics::Subject;
use crate::normalize::Scale;
use crate::reports::Report;
use crate::tables::{ConstructorId, DriverId, SeasonFilter};
use clap::{Args, Parser};

#[derive(Parser, Debug)]
pub struct CompareArgs {
    /// Metrics to compare (comma-separated or repeated)
    #[arg(value_name = "METRIC", required = true, value_delimiter = ',')]
    pub metrics: Vec<String>,

    #[command(flatten)]
    pub subjects: SubjectsArgs,

    /// Season to restrict the comparison to, or `career` for every loaded season
    #[arg(long, value_name = "YEAR", default_value = "career", value_parser = parse_season)]
    pub season: SeasonFilter,

    /// How subjects are scored against each other (default comes from the configuration)
    #[arg(long, value_name = "SCALE")]
    pub scale: Option<Scale>,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Two or more drivers, or two or more constructors
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct SubjectsArgs {
    /// Driver ids (comma-separated)
    #[arg(long, value_name = "ID", value_delimiter = ',', num_args = 1..)]
    pub drivers: Vec<u32>,

    /// Constructor ids (comma-separated)
    #[arg(long, value_name = "ID", value_delimiter = ',', num_args = 1..)]
    pub constructors: Vec<u32>,
}

impl SubjectsArgs {
    fn subjects(&self) -> Vec<Subject> {
        self.drivers
            .iter()
            .map(|id| Subject::Driver(DriverId(*id)))
            .chain(self.constructors.iter().map(|id| Subject::Constructor(ConstructorId(*id))))
            .collect()
    }
}

pub async fn compare_subjects<H: Host>(host: &mut H, args: &CompareArgs) -> Result<()> {
    let mut common = Common::new(host, &args.common).await?;
    let scale = args.scale.unwrap_or(common.config.normalization);

    let comparison = common
        .engine
        .compare(&args.metrics, &args.subjects.subjects(), args.season, scale)
        .await
        .into_result()?;

    common.report(&Report::Comparison(&comparison))
}
