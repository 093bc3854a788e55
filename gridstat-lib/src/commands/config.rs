use crate::Result;
use crate::normalize::Scale;
use camino::{Utf8Path, Utf8PathBuf};
use core::time::Duration;
use ohno::{IntoAppError, app_err};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;

/// The default configuration TOML content, embedded from `default_config.toml`
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../../default_config.toml");

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "gridstat.toml";

/// Oldest and newest seasons a minimum season may name.
const SEASON_RANGE: core::ops::RangeInclusive<u16> = 1950..=2100;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Directory holding the dataset CSV files
    #[serde(default = "default_dataset_dir")]
    pub dataset_dir: Utf8PathBuf,

    /// Directory for cached results; the platform cache directory when absent
    #[serde(default)]
    pub cache_dir: Option<Utf8PathBuf>,

    /// Whether computed results are cached
    #[serde(default = "default_cache_enabled")]
    pub cache_enabled: bool,

    /// Duration a cached result stays valid
    #[serde(default = "default_cache_ttl", with = "humantime_serde")]
    pub cache_ttl: Duration,

    /// Races from earlier seasons are ignored
    #[serde(default = "default_min_season")]
    pub min_season: u16,

    /// Scale used to score subjects in comparisons
    #[serde(default)]
    pub normalization: Scale,
}

fn default_dataset_dir() -> Utf8PathBuf {
    Utf8PathBuf::from("dataset")
}

const fn default_cache_enabled() -> bool {
    true
}

const fn default_cache_ttl() -> Duration {
    Duration::from_secs(60 * 60)
}

const fn default_min_season() -> u16 {
    2011
}

impl Config {
    /// Load configuration from a file or use defaults
    ///
    /// Without an explicit path, `gridstat.toml` in `base_dir` is used if it exists.
    pub fn load(base_dir: &Utf8Path, config_path: Option<&Utf8PathBuf>) -> Result<Self> {
        let (final_path, text) = if let Some(path) = config_path {
            let text = fs::read_to_string(path).into_app_err_with(|| format!("reading gridstat configuration file '{path}'"))?;
            (path.clone(), text)
        } else {
            let path = base_dir.join(CONFIG_FILE_NAME);
            match fs::read_to_string(&path) {
                Ok(text) => (path, text),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    // No config file found, use defaults
                    return Ok(Self::default());
                }
                Err(e) => return Err(e).into_app_err_with(|| format!("reading gridstat configuration file '{path}'")),
            }
        };

        let config: Self = toml::from_str(&text).into_app_err_with(|| format!("parsing configuration file '{final_path}'"))?;
        config.validate()?;

        Ok(config)
    }

    /// Save the default configuration to a TOML file
    pub fn save_default(output_path: &Utf8Path) -> Result<()> {
        fs::write(output_path, DEFAULT_CONFIG_TOML).into_app_err_with(|| format!("writing default configuration to {output_path}"))?;
        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.cache_ttl.is_zero() {
            return Err(app_err!("cache_ttl must be greater than zero"));
        }

        if !SEASON_RANGE.contains(&self.min_season) {
            return Err(app_err!(
                "min_season must be between {} and {}, got {}",
                SEASON_RANGE.start(),
                SEASON_RANGE.end(),
                self.min_season
            ));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG_TOML).expect("default_config.toml should be valid TOML that deserializes to Config")
    }
}
