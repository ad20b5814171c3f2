//! Panel host configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {key}: {value:?} ({reason})")]
    Invalid { key: &'static str, value: String, reason: &'static str },
}

/// Tuning for the panel dispatch queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelConfig {
    /// Bounded capacity of the frame queue feeding the reducer.
    pub queue_capacity: usize,
    /// Subscription id the panel attaches to at startup, if any.
    pub subscription_id: Option<String>,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self { queue_capacity: DEFAULT_QUEUE_CAPACITY, subscription_id: None }
    }
}

impl PanelConfig {
    /// Build typed panel config from environment variables.
    ///
    /// Optional:
    /// - `PROPERTIES_QUEUE_CAPACITY`: default 64, must be non-zero
    /// - `PROPERTIES_SUBSCRIPTION_ID`: attach to this subscription at startup
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the capacity is not a positive integer.
    pub fn from_env() -> Result<Self, ConfigError> {
        let queue_capacity = env_parse("PROPERTIES_QUEUE_CAPACITY", DEFAULT_QUEUE_CAPACITY)?;
        if queue_capacity == 0 {
            return Err(ConfigError::Invalid {
                key: "PROPERTIES_QUEUE_CAPACITY",
                value: queue_capacity.to_string(),
                reason: "must be greater than zero",
            });
        }

        Ok(Self { queue_capacity, subscription_id: subscription_id_from_env() })
    }
}

/// `PROPERTIES_SUBSCRIPTION_ID`, trimmed; blank counts as unset.
#[must_use]
pub fn subscription_id_from_env() -> Option<String> {
    std::env::var("PROPERTIES_SUBSCRIPTION_ID")
        .ok()
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

/// Parse `key` from the environment, falling back to `default` when unset.
pub(crate) fn env_parse<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { key, value: raw, reason: "could not be parsed" }),
        Err(_) => Ok(default),
    }
}
