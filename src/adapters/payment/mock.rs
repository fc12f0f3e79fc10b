//! Mock payment gateway for testing.
//!
//! Supports:
//! - Invoice and pre-checkout capture
//! - Error injection
//! - Call tracking

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::domain::donation::{Invoice, PrecheckDecision};
use crate::ports::{PaymentError, PaymentGateway};

/// Mock payment gateway for testing.
///
/// # Example
///
/// ```ignore
/// let mock = MockPaymentGateway::new();
/// mock.set_error(PaymentError::network("offline"));
/// assert!(mock.send_invoice(&invoice).await.is_err());
/// assert_eq!(mock.call_count("send_invoice"), 1);
/// ```
#[derive(Clone, Default)]
pub struct MockPaymentGateway {
    inner: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    invoices: Vec<Invoice>,
    prechecks: Vec<(String, PrecheckDecision)>,

    /// Error to return on next call.
    next_error: Option<PaymentError>,

    /// Track method calls for assertions.
    call_log: Vec<MethodCall>,
}

/// Recorded method call for assertions.
#[derive(Debug, Clone)]
pub struct MethodCall {
    pub method: String,
    pub args: Vec<String>,
}

impl MockPaymentGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails the next call with `error`.
    pub fn set_error(&self, error: PaymentError) {
        self.inner.lock().unwrap().next_error = Some(error);
    }

    pub fn invoices(&self) -> Vec<Invoice> {
        self.inner.lock().unwrap().invoices.clone()
    }

    pub fn last_invoice(&self) -> Option<Invoice> {
        self.invoices().pop()
    }

    /// Pre-checkout answers as `(query_id, decision)`.
    pub fn prechecks(&self) -> Vec<(String, PrecheckDecision)> {
        self.inner.lock().unwrap().prechecks.clone()
    }

    pub fn calls(&self) -> Vec<MethodCall> {
        self.inner.lock().unwrap().call_log.clone()
    }

    pub fn call_count(&self, method: &str) -> usize {
        self.calls().iter().filter(|c| c.method == method).count()
    }

    fn record(&self, method: &str, args: Vec<String>) -> Result<(), PaymentError> {
        let mut state = self.inner.lock().unwrap();
        state.call_log.push(MethodCall {
            method: method.to_string(),
            args,
        });
        match state.next_error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl PaymentGateway for MockPaymentGateway {
    async fn send_invoice(&self, invoice: &Invoice) -> Result<(), PaymentError> {
        self.record(
            "send_invoice",
            vec![invoice.chat.to_string(), invoice.amount_minor.to_string()],
        )?;
        self.inner.lock().unwrap().invoices.push(invoice.clone());
        Ok(())
    }

    async fn answer_precheck(
        &self,
        query_id: &str,
        decision: &PrecheckDecision,
    ) -> Result<(), PaymentError> {
        self.record("answer_precheck", vec![query_id.to_string()])?;
        self.inner
            .lock()
            .unwrap()
            .prechecks
            .push((query_id.to_string(), decision.clone()));
        Ok(())
    }
}
