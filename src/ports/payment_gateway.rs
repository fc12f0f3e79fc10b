//! Payment gateway port.
//!
//! Covers the two calls the donation flow makes to the payment provider:
//! sending an invoice and answering the provider's pre-checkout query. The
//! completion signal arrives as an inbound event instead.

use crate::domain::donation::{Invoice, PrecheckDecision};
use crate::domain::foundation::{DomainError, ErrorCode};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Port for payment provider integrations.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Send an invoice to the donor's chat.
    async fn send_invoice(&self, invoice: &Invoice) -> Result<(), PaymentError>;

    /// Answer a pre-checkout query.
    ///
    /// The provider waits for this answer before charging the payer.
    async fn answer_precheck(
        &self,
        query_id: &str,
        decision: &PrecheckDecision,
    ) -> Result<(), PaymentError>;
}

/// Errors from payment provider operations.
#[derive(Debug, Clone, Serialize, Deserialize, Error)]
#[error("{code}: {message}")]
pub struct PaymentError {
    /// Error code for categorization.
    pub code: PaymentErrorCode,

    /// Human-readable message.
    pub message: String,

    /// Whether the operation can be retried.
    pub retryable: bool,
}

impl PaymentError {
    pub fn new(code: PaymentErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            retryable: code.is_retryable(),
        }
    }

    /// Provider unreachable; worth another attempt.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::NetworkError, message)
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::AuthenticationError, message)
    }

    pub fn invalid_invoice(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::InvalidInvoice, message)
    }

    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::ProviderError, message)
    }
}

impl From<PaymentError> for DomainError {
    fn from(err: PaymentError) -> Self {
        let code = match err.code {
            PaymentErrorCode::InvalidInvoice => ErrorCode::PaymentRejected,
            _ => ErrorCode::InternalError,
        };

        DomainError::new(code, err.message).with_detail("payment_code", err.code.to_string())
    }
}

/// Payment error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentErrorCode {
    /// Network connectivity issue.
    NetworkError,

    /// Provider token rejected.
    AuthenticationError,

    /// The provider refused the invoice parameters.
    InvalidInvoice,

    /// Rate limit exceeded.
    RateLimitExceeded,

    /// Provider API error.
    ProviderError,
}

impl PaymentErrorCode {
    /// Check if this error type is typically retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PaymentErrorCode::NetworkError | PaymentErrorCode::RateLimitExceeded
        )
    }
}

impl std::fmt::Display for PaymentErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PaymentErrorCode::NetworkError => "network_error",
            PaymentErrorCode::AuthenticationError => "authentication_error",
            PaymentErrorCode::InvalidInvoice => "invalid_invoice",
            PaymentErrorCode::RateLimitExceeded => "rate_limit_exceeded",
            PaymentErrorCode::ProviderError => "provider_error",
        };
        write!(f, "{}", s)
    }
}
