// Mail relay: sends one plain-text email per request over SMTP.

pub mod handlers;
pub mod relay;

pub use relay::{MailMessage, MailRelay, Mailer};
