//! Donation amounts, invoices and pre-checkout validation.

use serde::{Deserialize, Serialize};

use super::foundation::{ChatId, ValidationError};

/// Payload attached to every donation invoice and checked at pre-checkout.
pub const DONATE_PAYLOAD: &str = "Donate Meetup-BOT";

/// Reason shown to the payer when a pre-checkout query is rejected.
pub const PRECHECK_REJECT_REASON: &str = "Something went wrong...";

/// A validated donation amount in major currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonationAmount(u64);

impl DonationAmount {
    /// Parses user input as a positive whole amount.
    ///
    /// Amounts whose minor units do not fit in an `i64` are out of range.
    pub fn parse(text: &str) -> Result<Self, ValidationError> {
        let text = text.trim();
        let value: i64 = text.parse().map_err(|_| {
            ValidationError::invalid_format("amount", format!("'{}' is not a whole number", text))
        })?;
        match value.checked_mul(100) {
            Some(_) if value >= 1 => Ok(Self(value.unsigned_abs())),
            _ => Err(ValidationError::out_of_range("amount", 1, i64::MAX / 100, value)),
        }
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    /// Amount in minor units (kopecks, cents) as payment providers expect.
    pub fn minor_units(&self) -> u64 {
        self.0 * 100
    }
}

/// A payment request sent to the donor's chat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub chat: ChatId,
    pub title: String,
    pub description: String,
    pub payload: String,
    pub currency: String,
    pub amount_minor: u64,
}

/// Answer to a provider pre-checkout query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrecheckDecision {
    Accept,
    Reject { reason: String },
}

impl PrecheckDecision {
    pub fn ok(&self) -> bool {
        matches!(self, PrecheckDecision::Accept)
    }
}

/// Accepts a pre-checkout query only when it carries the donation payload.
pub fn precheck(payload: &str) -> PrecheckDecision {
    if payload == DONATE_PAYLOAD {
        PrecheckDecision::Accept
    } else {
        PrecheckDecision::Reject {
            reason: PRECHECK_REJECT_REASON.to_string(),
        }
    }
}

/// Final signal from the payment provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentOutcome {
    Succeeded,
    Failed,
}
