//! Donation: amount, invoice, then wait for the payment signal.

use std::sync::Arc;

use crate::domain::dialog::{DialogError, DialogState, DonateContext, FlowContext, Session, Step};
use crate::domain::donation::{DonationAmount, Invoice, PaymentOutcome, DONATE_PAYLOAD};
use crate::domain::foundation::DomainError;
use crate::ports::PaymentGateway;

use super::free_text_keyboard;

const AMOUNT_PROMPT: &str = "Enter the amount you would like to donate:";

/// Invoice fields that come from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceTemplate {
    pub title: String,
    pub description: String,
    pub currency: String,
}

impl Default for InvoiceTemplate {
    fn default() -> Self {
        Self {
            title: "Donation".to_string(),
            description: "Support the meetup".to_string(),
            currency: "RUB".to_string(),
        }
    }
}

pub struct DonateHandler {
    payments: Arc<dyn PaymentGateway>,
    template: InvoiceTemplate,
}

impl DonateHandler {
    pub fn new(payments: Arc<dyn PaymentGateway>, template: InvoiceTemplate) -> Self {
        Self { payments, template }
    }

    pub fn open(&self, session: &mut Session) -> Step {
        session.context.begin(FlowContext::Donate(DonateContext::default()));
        Step::to(DialogState::InputDonateAmount).ask(AMOUNT_PROMPT, free_text_keyboard())
    }

    /// Parses the amount and sends an invoice for it.
    pub async fn enter_amount(&self, session: &mut Session, text: &str) -> Result<Step, DialogError> {
        let amount = DonationAmount::parse(text).map_err(|_| {
            DialogError::invalid_input("Please enter a whole amount greater than zero:")
        })?;

        let invoice = Invoice {
            chat: session.key.chat,
            title: self.template.title.clone(),
            description: self.template.description.clone(),
            payload: DONATE_PAYLOAD.to_string(),
            currency: self.template.currency.clone(),
            amount_minor: amount.minor_units(),
        };
        self.payments
            .send_invoice(&invoice)
            .await
            .map_err(DomainError::from)?;

        session.context.donate_mut()?.amount = Some(amount);
        tracing::info!(
            chat_id = %invoice.chat,
            amount_minor = invoice.amount_minor,
            "Donation invoice sent"
        );

        Ok(Step::to(DialogState::CheckPayment).ask(
            format!(
                "An invoice for {} {} has been sent. Complete the payment to finish.",
                amount.value(),
                invoice.currency
            ),
            free_text_keyboard(),
        ))
    }

    /// Reacts to the provider's completion signal.
    pub fn on_outcome(&self, outcome: PaymentOutcome) -> Step {
        match outcome {
            PaymentOutcome::Succeeded => {
                Step::to(DialogState::MainMenu).say("Thank you for your support!")
            }
            PaymentOutcome::Failed => Step::to(DialogState::InputDonateAmount)
                .say("The payment did not go through.")
                .ask(AMOUNT_PROMPT, free_text_keyboard()),
        }
    }
}
