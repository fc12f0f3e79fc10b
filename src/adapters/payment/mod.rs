//! Payment gateway adapters.

mod console;
mod mock;

pub use console::ConsolePaymentGateway;
pub use mock::{MethodCall, MockPaymentGateway};
