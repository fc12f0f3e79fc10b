//! Dialog engine configuration

use serde::Deserialize;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use super::error::ValidationError;

/// Session lifetime, keyboard layout and demo seeding
#[derive(Debug, Clone, Deserialize)]
pub struct DialogConfig {
    /// Buttons per keyboard row
    #[serde(default = "default_keyboard_columns")]
    pub keyboard_columns: usize,

    /// Sessions idle longer than this are discarded
    #[serde(default = "default_session_idle_ttl")]
    pub session_idle_ttl_secs: u64,

    /// How often the eviction task runs
    #[serde(default = "default_eviction_interval")]
    pub eviction_interval_secs: u64,

    /// YAML file with event groups, talks and speakers
    pub schedule_seed_path: Option<String>,

    /// Rust log filter directive
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Fixed seed for matchmaking draws
    pub match_seed: Option<u64>,
}

impl DialogConfig {
    pub fn session_idle_ttl(&self) -> Duration {
        Duration::from_secs(self.session_idle_ttl_secs)
    }

    pub fn eviction_interval(&self) -> Duration {
        Duration::from_secs(self.eviction_interval_secs)
    }

    /// Validate dialog configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.keyboard_columns == 0 || self.keyboard_columns > 8 {
            return Err(ValidationError::InvalidKeyboardColumns);
        }
        if self.session_idle_ttl_secs == 0 {
            return Err(ValidationError::InvalidSessionTtl);
        }
        if self.eviction_interval_secs == 0
            || self.eviction_interval_secs > self.session_idle_ttl_secs
        {
            return Err(ValidationError::InvalidEvictionInterval);
        }
        if EnvFilter::try_new(&self.log_level).is_err() {
            return Err(ValidationError::InvalidLogLevel(self.log_level.clone()));
        }
        Ok(())
    }
}

impl Default for DialogConfig {
    fn default() -> Self {
        Self {
            keyboard_columns: default_keyboard_columns(),
            session_idle_ttl_secs: default_session_idle_ttl(),
            eviction_interval_secs: default_eviction_interval(),
            schedule_seed_path: None,
            log_level: default_log_level(),
            match_seed: None,
        }
    }
}

fn default_keyboard_columns() -> usize {
    2
}

fn default_session_idle_ttl() -> u64 {
    86_400
}

fn default_eviction_interval() -> u64 {
    600
}

fn default_log_level() -> String {
    "info,meetup_bot=debug".to_string()
}
