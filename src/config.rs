//! Configuration for the pushstate CLI
//!
//! Handles configuration loading from environment variables and defaults.

use crate::memory::{Capabilities, DEFAULT_USER_AGENT};

// =============================================================================
// Constants
// =============================================================================

/// Location of the initial history entry
pub const DEFAULT_START_URL: &str = "https://example.com/";

/// Environment variable for the initial location
pub const ENV_START_URL: &str = "PUSHSTATE_START_URL";

/// Environment variable for the reported user agent
pub const ENV_USER_AGENT: &str = "PUSHSTATE_USER_AGENT";

/// Environment variable holding the log filter
pub const ENV_LOG: &str = "PUSHSTATE_LOG";

/// Log filter used when `PUSHSTATE_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "warn";

// =============================================================================
// Config Struct
// =============================================================================

/// Session configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// URL of the first history entry
    pub start_url: String,

    /// User agent reported by the simulated platform
    pub user_agent: String,

    /// History features the simulated platform exposes
    pub capabilities: Capabilities,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            start_url: DEFAULT_START_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            capabilities: Capabilities::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load configuration through a variable lookup
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(start_url) = lookup(ENV_START_URL) {
            config.start_url = start_url;
        }

        if let Some(user_agent) = lookup(ENV_USER_AGENT) {
            config.user_agent = user_agent;
        }

        config
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Load the global configuration
pub fn load_config() -> Config {
    Config::from_env()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn default_config_has_correct_values() {
        let config = Config::default();
        assert_eq!(config.start_url, DEFAULT_START_URL);
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(config.capabilities, Capabilities::default());
    }

    #[test]
    fn from_vars_loads_start_url() {
        let env = vars(&[(ENV_START_URL, "https://app.test/home")]);
        let config = Config::from_vars(|key| env.get(key).cloned());
        assert_eq!(config.start_url, "https://app.test/home");
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
    }

    #[test]
    fn from_vars_loads_user_agent() {
        let env = vars(&[(ENV_USER_AGENT, "Mozilla/5.0 (Test)")]);
        let config = Config::from_vars(|key| env.get(key).cloned());
        assert_eq!(config.user_agent, "Mozilla/5.0 (Test)");
    }

    #[test]
    fn from_vars_uses_defaults_when_unset() {
        let config = Config::from_vars(|_| None);
        assert_eq!(config, Config::default());
    }
}
