use super::Host;
use super::common::{Common, CommonArgs};
use crate::Result;
use crate::metrics::{MetricCategory, SubjectType};
use crate::reports::Report;
use clap::Parser;

#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Kind of subject to list metrics for
    #[arg(long, value_name = "TYPE", default_value = "driver")]
    pub subject: SubjectType,

    /// Only list metrics of this category
    #[arg(long, value_name = "CATEGORY")]
    pub category: Option<MetricCategory>,

    #[command(flatten)]
    pub common: CommonArgs,
}

pub async fn list_metrics<H: Host>(host: &mut H, args: &ListArgs) -> Result<()> {
    let mut common = Common::new(host, &args.common).await?;
    let metrics = common.engine.list_metrics(args.subject, args.category);
    common.report(&Report::Catalog(&metrics))
}
