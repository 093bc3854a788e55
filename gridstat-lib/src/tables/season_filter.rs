use core::fmt::{Display, Formatter};
use core::str::FromStr;
use ohno::{AppError, app_err};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Restricts a computation to a single season, or spans the whole loaded window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum SeasonFilter {
    #[default]
    Career,
    Season(u16),
}

impl SeasonFilter {
    #[must_use]
    pub const fn matches(self, season: u16) -> bool {
        match self {
            Self::Career => true,
            Self::Season(s) => s == season,
        }
    }

    #[must_use]
    pub const fn season(self) -> Option<u16> {
        match self {
            Self::Career => None,
            Self::Season(s) => Some(s),
        }
    }
}

impl From<Option<u16>> for SeasonFilter {
    fn from(season: Option<u16>) -> Self {
        season.map_or(Self::Career, Self::Season)
    }
}

impl Display for SeasonFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Career => write!(f, "career"),
            Self::Season(s) => write!(f, "{s}"),
        }
    }
}

impl FromStr for SeasonFilter {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("career") {
            return Ok(Self::Career);
        }

        s.parse::<u16>()
            .map(Self::Season)
            .map_err(|e| app_err!("invalid season '{s}', expected a year or 'career': {e}"))
    }
}

impl Serialize for SeasonFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Career => serializer.serialize_str("career"),
            Self::Season(s) => serializer.serialize_u16(*s),
        }
    }
}

impl<'de> Deserialize<'de> for SeasonFilter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Year(u16),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Year(y) => Ok(Self::Season(y)),
            Raw::Text(t) => t.parse().map_err(serde::de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_and_parse() {
        assert_eq!(SeasonFilter::Career.to_string(), "career");
        assert_eq!(SeasonFilter::Season(2021).to_string(), "2021");
        assert_eq!("career".parse::<SeasonFilter>().unwrap(), SeasonFilter::Career);
        assert_eq!("2019".parse::<SeasonFilter>().unwrap(), SeasonFilter::Season(2019));
        assert!("last year".parse::<SeasonFilter>().is_err());
    }

    #[test]
    fn test_matches() {
        assert!(SeasonFilter::Career.matches(1999));
        assert!(SeasonFilter::Season(2020).matches(2020));
        assert!(!SeasonFilter::Season(2020).matches(2021));
    }

    #[test]
    fn test_serde() {
        assert_eq!(serde_json::to_string(&SeasonFilter::Career).unwrap(), "\"career\"");
        assert_eq!(serde_json::to_string(&SeasonFilter::Season(2022)).unwrap(), "2022");
        assert_eq!(serde_json::from_str::<SeasonFilter>("2022").unwrap(), SeasonFilter::Season(2022));
        assert_eq!(serde_json::from_str::<SeasonFilter>("\"career\"").unwrap(), SeasonFilter::Career);
    }
}
