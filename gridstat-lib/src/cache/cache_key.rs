use crate::metrics::Subject;
use crate::tables::SeasonFilter;
use compact_str::{CompactString, format_compact};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Separates the key inputs in their canonical encoding (ASCII unit separator).
const SEPARATOR: char = '\x1f';

/// Every parameter that affects a computed result.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKeyInputs {
    pub metric: CompactString,
    pub subject: Subject,
    pub season: SeasonFilter,
    pub dataset_version: CompactString,
}

/// Content address of a cached result: the SHA-256 of its canonical key inputs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    inputs: CacheKeyInputs,
    digest: CompactString,
}

impl CacheKey {
    #[must_use]
    pub fn new(metric: &str, subject: Subject, season: SeasonFilter, dataset_version: &str) -> Self {
        let inputs = CacheKeyInputs {
            metric: metric.into(),
            subject,
            season,
            dataset_version: dataset_version.into(),
        };

        let digest = hex::encode(Sha256::digest(Self::canonical(&inputs).as_bytes()));
        Self {
            inputs,
            digest: digest.into(),
        }
    }

    fn canonical(inputs: &CacheKeyInputs) -> CompactString {
        format_compact!(
            "{metric}{SEPARATOR}{kind}{SEPARATOR}{id}{SEPARATOR}{season}{SEPARATOR}{version}",
            metric = inputs.metric,
            kind = inputs.subject.subject_type(),
            id = inputs.subject.id(),
            season = inputs.season,
            version = inputs.dataset_version,
        )
    }

    #[must_use]
    pub const fn inputs(&self) -> &CacheKeyInputs {
        &self.inputs
    }

    /// Lowercase hex digest.
    #[must_use]
    pub fn digest(&self) -> &str {
        &self.digest
    }

    #[must_use]
    pub fn file_name(&self) -> String {
        format!("{}.json", self.digest)
    }
}
