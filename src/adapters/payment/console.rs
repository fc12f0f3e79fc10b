//! Payment gateway for the console demo.
//!
//! Logs invoices and pre-checkout answers instead of calling a provider.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::domain::donation::{Invoice, PrecheckDecision};
use crate::ports::{PaymentError, PaymentGateway};

pub struct ConsolePaymentGateway {
    provider_token: SecretString,
}

impl ConsolePaymentGateway {
    pub fn new(provider_token: SecretString) -> Self {
        Self { provider_token }
    }

    fn ensure_token(&self) -> Result<(), PaymentError> {
        if self.provider_token.expose_secret().trim().is_empty() {
            return Err(PaymentError::authentication("Payment provider token is not set"));
        }
        Ok(())
    }
}

#[async_trait]
impl PaymentGateway for ConsolePaymentGateway {
    async fn send_invoice(&self, invoice: &Invoice) -> Result<(), PaymentError> {
        self.ensure_token()?;
        if invoice.amount_minor == 0 {
            return Err(PaymentError::invalid_invoice("Invoice amount must be positive"));
        }
        tracing::info!(
            chat_id = %invoice.chat,
            amount_minor = invoice.amount_minor,
            currency = %invoice.currency,
            payload = %invoice.payload,
            "Invoice issued"
        );
        Ok(())
    }

    async fn answer_precheck(
        &self,
        query_id: &str,
        decision: &PrecheckDecision,
    ) -> Result<(), PaymentError> {
        self.ensure_token()?;
        match decision {
            PrecheckDecision::Accept => tracing::info!(query_id, "Pre-checkout accepted"),
            PrecheckDecision::Reject { reason } => {
                tracing::info!(query_id, reason = %reason, "Pre-checkout rejected")
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::donation::DONATE_PAYLOAD;
    use crate::domain::foundation::ChatId;
    use crate::ports::PaymentErrorCode;

    fn invoice(amount_minor: u64) -> Invoice {
        Invoice {
            chat: ChatId::new(1),
            title: "Donation".into(),
            description: "Support the meetup".into(),
            payload: DONATE_PAYLOAD.into(),
            currency: "RUB".into(),
            amount_minor,
        }
    }

    #[tokio::test]
    async fn empty_token_is_rejected() {
        let gateway = ConsolePaymentGateway::new(SecretString::new(String::new()));
        let err = gateway.send_invoice(&invoice(100)).await.unwrap_err();
        assert_eq!(err.code, PaymentErrorCode::AuthenticationError);
    }

    #[tokio::test]
    async fn zero_amount_is_invalid() {
        let gateway = ConsolePaymentGateway::new(SecretString::new("token".into()));
        let err = gateway.send_invoice(&invoice(0)).await.unwrap_err();
        assert_eq!(err.code, PaymentErrorCode::InvalidInvoice);
        assert!(gateway.send_invoice(&invoice(15_000)).await.is_ok());
    }
}
