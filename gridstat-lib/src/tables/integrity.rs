use super::TableId;
use core::fmt::{Display, Formatter};
use serde::Serialize;

/// A row dropped while loading the dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntegrityWarning {
    pub table: TableId,

    /// 1-based line of the row in its CSV file, or 0 when unknown.
    pub line: u64,

    pub reason: String,
}

impl IntegrityWarning {
    #[must_use]
    pub const fn malformed(table: TableId, line: u64, reason: String) -> Self {
        Self { table, line, reason }
    }

    #[must_use]
    pub fn dangling(table: TableId, line: u64, what: &str, id: impl Display) -> Self {
        Self {
            table,
            line,
            reason: format!("references unknown {what} {id}"),
        }
    }
}

impl Display for IntegrityWarning {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        if self.line == 0 {
            write!(f, "{}: {}", self.table.csv_name(), self.reason)
        } else {
            write!(f, "{}:{}: {}", self.table.csv_name(), self.line, self.reason)
        }
    }
}
