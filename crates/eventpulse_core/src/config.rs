//! Engine configuration.
//!
//! # Responsibility
//! - Hold tier ceilings and look-ahead defaults used by the upcoming service.
//! - Load overrides from environment-style key lookups.
//!
//! # Invariants
//! - A validated config never has a zero ceiling.
//! - `default_days_ahead` is within `1..=MAX_DAYS_AHEAD`.

use crate::upcoming::tier::TierLimits;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Longest look-ahead accepted, in days.
pub const MAX_DAYS_AHEAD: u32 = 366;
/// Look-ahead used when callers do not specify one.
pub const DEFAULT_DAYS_AHEAD: u32 = 30;

pub const ENV_FREE_CEILING: &str = "EVENTPULSE_FREE_CEILING";
pub const ENV_PREMIUM_CEILING: &str = "EVENTPULSE_PREMIUM_CEILING";
pub const ENV_DAYS_AHEAD: &str = "EVENTPULSE_DAYS_AHEAD";
pub const ENV_INCLUDE_HOLIDAYS: &str = "EVENTPULSE_INCLUDE_HOLIDAYS";
pub const ENV_LOG_LEVEL: &str = "EVENTPULSE_LOG_LEVEL";

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    ZeroCeiling(&'static str),
    DaysAheadOutOfRange(u32),
    InvalidValue { key: &'static str, value: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroCeiling(tier) => write!(f, "{tier} ceiling must be greater than zero"),
            Self::DaysAheadOutOfRange(days) => write!(
                f,
                "default_days_ahead must be within 1..={MAX_DAYS_AHEAD}, got {days}"
            ),
            Self::InvalidValue { key, value } => write!(f, "invalid value for {key}: `{value}`"),
        }
    }
}

impl Error for ConfigError {}

/// Upcoming-service settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub tier_limits: TierLimits,
    pub default_days_ahead: u32,
    pub include_holidays: bool,
    /// Log level override; `None` uses `logging::default_log_level()`.
    pub log_level: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tier_limits: TierLimits::default(),
            default_days_ahead: DEFAULT_DAYS_AHEAD,
            include_holidays: true,
            log_level: None,
        }
    }
}

impl EngineConfig {
    /// Checks ceilings and look-ahead bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tier_limits.free == 0 {
            return Err(ConfigError::ZeroCeiling("free"));
        }
        if self.tier_limits.premium == 0 {
            return Err(ConfigError::ZeroCeiling("premium"));
        }
        if self.default_days_ahead == 0 || self.default_days_ahead > MAX_DAYS_AHEAD {
            return Err(ConfigError::DaysAheadOutOfRange(self.default_days_ahead));
        }
        Ok(())
    }

    /// Reads overrides from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Applies overrides from `lookup` on top of defaults, then validates.
    ///
    /// Unset or blank keys keep their default.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let value_of = |key: &'static str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        if let Some(raw) = value_of(ENV_FREE_CEILING) {
            config.tier_limits.free = parse_number(ENV_FREE_CEILING, &raw)?;
        }
        if let Some(raw) = value_of(ENV_PREMIUM_CEILING) {
            config.tier_limits.premium = parse_number(ENV_PREMIUM_CEILING, &raw)?;
        }
        if let Some(raw) = value_of(ENV_DAYS_AHEAD) {
            config.default_days_ahead = parse_number(ENV_DAYS_AHEAD, &raw)?;
        }
        if let Some(raw) = value_of(ENV_INCLUDE_HOLIDAYS) {
            config.include_holidays = parse_bool(ENV_INCLUDE_HOLIDAYS, &raw)?;
        }
        config.log_level = value_of(ENV_LOG_LEVEL);

        config.validate()?;
        Ok(config)
    }
}

fn parse_number<T: std::str::FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: raw.to_string(),
    })
}

fn parse_bool(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, EngineConfig, ENV_DAYS_AHEAD, ENV_FREE_CEILING, ENV_INCLUDE_HOLIDAYS};
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_are_valid() {
        EngineConfig::default()
            .validate()
            .expect("defaults should validate");
    }

    #[test]
    fn lookup_overrides_defaults() {
        let config = EngineConfig::from_lookup(lookup_from(&[
            (ENV_FREE_CEILING, " 3 "),
            (ENV_DAYS_AHEAD, "90"),
            (ENV_INCLUDE_HOLIDAYS, "off"),
        ]))
        .expect("overrides should parse");
        assert_eq!(config.tier_limits.free, 3);
        assert_eq!(config.default_days_ahead, 90);
        assert!(!config.include_holidays);
        assert_eq!(config.log_level, None);
    }

    #[test]
    fn lookup_rejects_bad_values() {
        let err = EngineConfig::from_lookup(lookup_from(&[(ENV_FREE_CEILING, "many")]))
            .expect_err("non-numeric ceiling must fail");
        assert!(matches!(err, ConfigError::InvalidValue { .. }));

        let err = EngineConfig::from_lookup(lookup_from(&[(ENV_DAYS_AHEAD, "400")]))
            .expect_err("too long look-ahead must fail");
        assert_eq!(err, ConfigError::DaysAheadOutOfRange(400));

        let err = EngineConfig::from_lookup(lookup_from(&[(ENV_FREE_CEILING, "0")]))
            .expect_err("zero ceiling must fail");
        assert_eq!(err, ConfigError::ZeroCeiling("free"));
    }

    #[test]
    fn deserializes_partial_config_with_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"tier_limits": {"free": 2}}"#).expect("partial config");
        assert_eq!(config.tier_limits.free, 2);
        assert_eq!(config.tier_limits.premium, 50);
        assert_eq!(config.default_days_ahead, 30);
        assert!(config.include_holidays);
    }
}
