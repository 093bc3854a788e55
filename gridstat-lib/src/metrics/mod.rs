//! Metric contract and the built-in metric catalog
//!
//! A metric is a named, pure function of the loaded tables, one subject, and a season
//! filter. Compute functions return a [`Measurement`], which the metric stamps with its
//! identity to form a [`MetricResult`]. Lack of data is a value
//! ([`MetricValue::InsufficientData`]) rather than an error, so a metric never fails.
//!
//! Built-in metrics are static [`MetricDef`] entries declared with `metric_def!`. Driver
//! metrics live in [`driver`], constructor metrics (all prefixed `constructor_`) live in
//! [`constructor`]. Shared per-team and per-stint groupings are built by [`views`].

pub mod constructor;
pub mod driver;
mod measurement;
mod metric;
mod metric_category;
mod metric_def;
mod metric_result;
mod metric_value;
pub mod standings;
pub mod stats;
mod subject;
mod unit;
pub mod views;

pub use measurement::{Measurement, Numeric};
pub use metric::Metric;
pub use metric_category::MetricCategory;
pub use metric_def::{Compute, MetricDef, builtin_metrics};
pub(crate) use metric_def::metric_def;
pub use metric_result::MetricResult;
pub use metric_value::{MetaValue, Metadata, MetricValue};
pub use subject::{Subject, SubjectType};
pub use unit::{Direction, Unit};
