use crate::metrics::Subject;
use crate::registry::UnknownMetric;
use crate::tables::TableId;
use compact_str::CompactString;
use core::fmt::{Display, Formatter};
use ohno::app_err;
use std::sync::Arc;

/// Outcome of one engine request.
///
/// Request-level failures are values so that a bulk request can report each item on its
/// own. Insufficient data is not a failure: it is carried by a `Found` result.
#[derive(Debug, Clone)]
pub enum EngineResult<T> {
    /// The request succeeded.
    Found(T),

    /// No metric is registered under the name, or it does not apply to the subject's type.
    UnknownMetric(UnknownMetric),

    /// The driver or constructor is not in the dataset.
    UnknownSubject(Subject),

    /// The metric needs a table the dataset does not provide.
    TableUnavailable { metric: CompactString, table: TableId },

    /// The computation itself failed.
    Error(Arc<ohno::AppError>),
}

impl<T> EngineResult<T> {
    /// Returns `true` if the result is `Found`.
    #[must_use]
    pub const fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// Returns a reference to the contained data if `Found`, otherwise `None`.
    #[must_use]
    pub const fn as_ref(&self) -> Option<&T> {
        match self {
            Self::Found(data) => Some(data),
            _ => None,
        }
    }

    /// Converts a failure into an application error, for callers that stop at the first one.
    pub fn into_result(self) -> crate::Result<T> {
        match self {
            Self::Found(data) => Ok(data),
            Self::Error(e) => Err(app_err!("{e:#}")),
            other => Err(app_err!("{}", other.describe_failure())),
        }
    }

    /// Switches the payload type of a failure. A `Found` value becomes an `Error`.
    #[must_use]
    pub fn cast<U>(self) -> EngineResult<U> {
        match self {
            Self::Found(_) => EngineResult::Error(Arc::new(app_err!("cannot convert a found result"))),
            Self::UnknownMetric(m) => EngineResult::UnknownMetric(m),
            Self::UnknownSubject(s) => EngineResult::UnknownSubject(s),
            Self::TableUnavailable { metric, table } => EngineResult::TableUnavailable { metric, table },
            Self::Error(e) => EngineResult::Error(e),
        }
    }

    fn describe_failure(&self) -> String {
        match self {
            Self::Found(_) => String::new(),
            Self::UnknownMetric(m) => m.to_string(),
            Self::UnknownSubject(s) => format!("unknown {s}"),
            Self::TableUnavailable { metric, table } => {
                format!("metric '{metric}' needs the '{table}' table, which this dataset does not provide")
            }
            Self::Error(e) => format!("{e:#}"),
        }
    }
}

/// Renders the failure description; `Found` renders as `found`.
impl<T> Display for EngineResult<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        if self.is_found() {
            f.write_str("found")
        } else {
            f.write_str(&self.describe_failure())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::DriverId;

    #[test]
    fn test_found() {
        let result = EngineResult::Found(7_u32);
        assert!(result.is_found());
        assert_eq!(result.as_ref(), Some(&7));
        assert_eq!(result.into_result().unwrap(), 7);
    }

    #[test]
    fn test_unknown_subject_message() {
        let result: EngineResult<u32> = EngineResult::UnknownSubject(Subject::Driver(DriverId(999)));
        assert!(!result.is_found());
        assert_eq!(result.to_string(), "unknown driver 999");
        assert!(result.into_result().is_err());
    }

    #[test]
    fn test_table_unavailable_message() {
        let result: EngineResult<u32> = EngineResult::TableUnavailable {
            metric: "constructor_average_lap_time".into(),
            table: TableId::LapTimes,
        };
        let message = result.to_string();
        assert!(message.contains("constructor_average_lap_time"));
        assert!(message.contains("lap_times"));
    }

    #[test]
    fn test_cast_keeps_failure() {
        let result: EngineResult<u32> = EngineResult::UnknownMetric(UnknownMetric {
            name: "nope".into(),
            suggestions: Vec::new(),
        });
        let cast: EngineResult<String> = result.cast();
        assert!(matches!(cast, EngineResult::UnknownMetric(m) if m.name == "nope"));
    }
}
