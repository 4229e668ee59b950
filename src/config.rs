//! Configuration module - environment variable parsing

use std::env;

use crate::core::BumpPolicy;

pub const ENV_LOG: &str = "DUEL_TETRIS_LOG";
pub const ENV_BUMP_POLICY: &str = "DUEL_TETRIS_BUMP_POLICY";
pub const ENV_STOP_ON_DETACHED: &str = "DUEL_TETRIS_STOP_ON_DETACHED";

/// Replay runner configuration loaded from environment variables
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReplayConfig {
    /// Log level or `EnvFilter` directive (trace, debug, info, warn, error)
    pub log_level: String,
    /// When a player's `last_action_id` advances
    pub bump_policy: BumpPolicy,
    /// Stop at the first detached action instead of skipping it
    pub stop_on_detached: bool,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            bump_policy: BumpPolicy::default(),
            stop_on_detached: true,
        }
    }
}

impl ReplayConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };
        let defaults = Self::default();

        let log_level = var(ENV_LOG).unwrap_or(defaults.log_level);

        let bump_policy = match var(ENV_BUMP_POLICY) {
            Some(s) => BumpPolicy::from_str(&s)
                .ok_or(ConfigError::Invalid(ENV_BUMP_POLICY, s))?,
            None => defaults.bump_policy,
        };

        let stop_on_detached = match var(ENV_STOP_ON_DETACHED) {
            Some(s) => parse_flag(&s).ok_or(ConfigError::Invalid(ENV_STOP_ON_DETACHED, s))?,
            None => defaults.stop_on_detached,
        };

        Ok(Self {
            log_level,
            bump_policy,
            stop_on_detached,
        })
    }
}

fn parse_flag(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = ReplayConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ReplayConfig::default());
        assert_eq!(config.bump_policy, BumpPolicy::Always);
        assert!(config.stop_on_detached);
    }

    #[test]
    fn reads_all_variables() {
        let config = ReplayConfig::from_lookup(lookup(&[
            (ENV_LOG, "debug"),
            (ENV_BUMP_POLICY, "When-Changed"),
            (ENV_STOP_ON_DETACHED, "0"),
        ]))
        .unwrap();

        assert_eq!(config.log_level, "debug");
        assert_eq!(config.bump_policy, BumpPolicy::WhenChanged);
        assert!(!config.stop_on_detached);
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = ReplayConfig::from_lookup(lookup(&[(ENV_LOG, "  ")])).unwrap();
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn rejects_bad_values() {
        assert_eq!(
            ReplayConfig::from_lookup(lookup(&[(ENV_BUMP_POLICY, "sometimes")])),
            Err(ConfigError::Invalid(ENV_BUMP_POLICY, "sometimes".to_string()))
        );
        assert!(ReplayConfig::from_lookup(lookup(&[(ENV_STOP_ON_DETACHED, "maybe")])).is_err());
    }
}
