//! Application configuration module
//!
//! Configuration is loaded from environment variables with the `MEETUP_BOT`
//! prefix; nested values are separated by double underscores.
//!
//! # Example
//!
//! ```no_run
//! use meetup_bot::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Keyboard columns: {}", config.dialog.keyboard_columns);
//! ```

mod bot;
mod dialog;
mod error;
mod payment;

pub use bot::{BotConfig, Environment};
pub use dialog::DialogConfig;
pub use error::{ConfigError, ValidationError};
pub use payment::PaymentConfig;

use serde::Deserialize;

use crate::application::EngineSettings;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Messenger credentials and environment
    #[serde(default)]
    pub bot: BotConfig,

    /// Donation invoice settings
    pub payment: PaymentConfig,

    /// Dialog engine and session settings
    #[serde(default)]
    pub dialog: DialogConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Loads `.env` if present, then reads `MEETUP_BOT__SECTION__KEY`
    /// variables, e.g. `MEETUP_BOT__DIALOG__KEYBOARD_COLUMNS=3`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or values
    /// cannot be parsed into their expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("MEETUP_BOT")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.bot.validate()?;
        self.payment.validate()?;
        self.dialog.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.bot.is_production()
    }

    /// Engine settings derived from the dialog and payment sections
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            keyboard_columns: self.dialog.keyboard_columns,
            invoice: self.payment.invoice_template(),
            match_seed: self.dialog.match_seed,
        }
    }
}
