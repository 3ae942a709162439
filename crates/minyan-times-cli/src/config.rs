//! CLI configuration, read from a TOML file.
//!
//! ```toml
//! timezone = "America/New_York"
//! calendar_id = "minyan"
//! elapsed_grace_minutes = 5
//! destination = "minyan"
//! ```
//!
//! Every key is optional. Command-line flags override the file.

use std::path::Path;
use std::str::FromStr;

use anyhow::{anyhow, bail, Context};
use chrono::Duration;
use chrono_tz::Tz;
use minyan_times::ELAPSED_GRACE_MINUTES;

/// Environment variable naming a config file when `--config` is absent.
pub const CONFIG_ENV: &str = "MINYAN_TIMES_CONFIG";

/// Upper bound for `elapsed_grace_minutes`: one day.
pub const MAX_GRACE_MINUTES: i64 = 24 * 60;

#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// IANA zone the minyan keeps its times in.
    pub timezone: String,
    /// Calendar to list services from.
    pub calendar_id: String,
    /// How long after a service starts it is still shown as upcoming.
    pub elapsed_grace_minutes: i64,
    /// Where scheduled digests are delivered.
    pub destination: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timezone: "America/New_York".to_string(),
            calendar_id: "minyan".to_string(),
            elapsed_grace_minutes: ELAPSED_GRACE_MINUTES,
            destination: "minyan".to_string(),
        }
    }
}

impl FromStr for Config {
    type Err = toml::de::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        toml::from_str(s)
    }
}

impl Config {
    /// Load from `path`, or from [`CONFIG_ENV`], or fall back to defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let env_path = std::env::var_os(CONFIG_ENV);
        let path = match path {
            Some(path) => path,
            None => match env_path.as_deref() {
                Some(path) => Path::new(path),
                None => {
                    tracing::debug!("no config file given, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        tracing::debug!(path = %path.display(), "reading config");
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file at {}", path.display()))?;
        let config: Self = text
            .parse()
            .with_context(|| format!("Failed to parse config file at {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid config file at {}", path.display()))?;
        Ok(config)
    }

    /// Check values that parse but make no sense.
    pub fn validate(&self) -> anyhow::Result<()> {
        if !(0..=MAX_GRACE_MINUTES).contains(&self.elapsed_grace_minutes) {
            bail!(
                "elapsed_grace_minutes must be between 0 and {MAX_GRACE_MINUTES}, got {}",
                self.elapsed_grace_minutes
            );
        }
        Ok(())
    }

    /// The elapsed-time grace period as a duration.
    pub fn grace(&self) -> anyhow::Result<Duration> {
        self.validate()?;
        Duration::try_minutes(self.elapsed_grace_minutes)
            .context("elapsed_grace_minutes is out of range")
    }

    pub fn tz(&self) -> anyhow::Result<Tz> {
        parse_tz(&self.timezone)
    }
}

pub fn parse_tz(name: &str) -> anyhow::Result<Tz> {
    name.parse::<Tz>()
        .map_err(|e| anyhow!("Unknown time zone '{name}': {e}"))
}
