//! Payment configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;
use crate::application::InvoiceTemplate;

/// Payment provider settings used for donation invoices
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// Provider token passed along with every invoice
    pub provider_token: SecretString,

    /// ISO 4217 currency code
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Invoice title shown to the payer
    #[serde(default = "default_title")]
    pub title: String,

    /// Invoice description shown to the payer
    #[serde(default = "default_description")]
    pub description: String,
}

impl PaymentConfig {
    /// Invoice wording and currency for the donation flow
    pub fn invoice_template(&self) -> InvoiceTemplate {
        InvoiceTemplate {
            title: self.title.clone(),
            description: self.description.clone(),
            currency: self.currency.clone(),
        }
    }

    /// Validate payment configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.provider_token.expose_secret().trim().is_empty() {
            return Err(ValidationError::MissingRequired("PAYMENT__PROVIDER_TOKEN"));
        }
        if self.currency.len() != 3 || !self.currency.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(ValidationError::InvalidCurrency);
        }
        if self.title.trim().is_empty() {
            return Err(ValidationError::MissingRequired("PAYMENT__TITLE"));
        }
        Ok(())
    }
}

fn default_currency() -> String {
    "RUB".to_string()
}

fn default_title() -> String {
    "Donation".to_string()
}

fn default_description() -> String {
    "Support the meetup".to_string()
}
