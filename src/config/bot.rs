//! Bot configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;

/// Messenger bot credentials and runtime environment
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BotConfig {
    /// Bot API token issued by the messenger. The console transport runs
    /// without one; production requires it.
    #[serde(default)]
    pub token: Option<SecretString>,

    /// Environment name
    #[serde(default)]
    pub environment: Environment,
}

/// Application environment
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl BotConfig {
    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Validate bot configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        match &self.token {
            Some(token) if token.expose_secret().trim().is_empty() => {
                Err(ValidationError::MissingRequired("BOT__TOKEN"))
            }
            None if self.is_production() => Err(ValidationError::MissingRequired("BOT__TOKEN")),
            _ => Ok(()),
        }
    }
}
