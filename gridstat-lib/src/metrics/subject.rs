use crate::tables::{ConstructorId, DriverId};
use clap::ValueEnum;
use core::fmt::Formatter;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// The kind of entity a metric describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter, Display, Serialize, Deserialize, ValueEnum)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SubjectType {
    Driver,
    Constructor,
}

/// A driver or constructor a metric is computed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum Subject {
    Driver(DriverId),
    Constructor(ConstructorId),
}

impl Subject {
    #[must_use]
    pub const fn subject_type(self) -> SubjectType {
        match self {
            Self::Driver(_) => SubjectType::Driver,
            Self::Constructor(_) => SubjectType::Constructor,
        }
    }

    #[must_use]
    pub const fn id(self) -> u32 {
        match self {
            Self::Driver(id) => id.0,
            Self::Constructor(id) => id.0,
        }
    }

    #[must_use]
    pub const fn new(subject_type: SubjectType, id: u32) -> Self {
        match subject_type {
            SubjectType::Driver => Self::Driver(DriverId(id)),
            SubjectType::Constructor => Self::Constructor(ConstructorId(id)),
        }
    }
}

impl core::fmt::Display for Subject {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} {}", self.subject_type(), self.id())
    }
}
