//! Outbound mail adapters.

mod resend;

pub use resend::{ResendConfig, ResendMailer};
