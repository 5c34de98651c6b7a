//! Mail Relay: one SMTP session per message, built on `lettre`.

use async_trait::async_trait;
use lettre::{
    address::AddressError,
    message::{header::ContentType, Mailbox},
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
    Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::SmtpConfig;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid address '{address}': {source}")]
    Address {
        address: String,
        #[source]
        source: AddressError,
    },

    #[error("could not build message: {0}")]
    Build(#[from] lettre::error::Error),

    #[error("{0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

/// One outgoing plain-text email. JSON keys are accepted in PascalCase or lowercase.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MailMessage {
    #[serde(alias = "to")]
    pub to: String,
    #[serde(alias = "subject")]
    pub subject: String,
    #[serde(alias = "body")]
    pub body: String,
    #[serde(alias = "from", default)]
    pub from: Option<String>,
}

/// Sends a message. `AppState` carries an `Arc<dyn Mailer>`.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &MailMessage) -> Result<(), MailError>;
}

/// SMTP relay using the configured host. No pooling: every call connects, sends and quits.
pub struct MailRelay {
    config: SmtpConfig,
}

impl MailRelay {
    pub fn new(config: SmtpConfig) -> Self {
        Self { config }
    }

    fn build_message(&self, message: &MailMessage) -> Result<Message, MailError> {
        let from_address = message
            .from
            .as_deref()
            .filter(|f| !f.trim().is_empty())
            .unwrap_or(&self.config.from_address);

        let from = Mailbox::new(
            Some(self.config.from_name.clone()),
            parse_address(from_address)?,
        );
        let to = Mailbox::new(None, parse_address(&message.to)?);

        Ok(Message::builder()
            .from(from)
            .to(to)
            .subject(message.subject.as_str())
            .header(ContentType::TEXT_PLAIN)
            .body(message.body.clone())?)
    }

    fn transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, MailError> {
        let tls_parameters = TlsParameters::new(self.config.host.clone())?;
        let tls = if self.config.ssl {
            Tls::Wrapper(tls_parameters)
        } else {
            Tls::Opportunistic(tls_parameters)
        };

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&self.config.host)
            .port(self.config.port)
            .tls(tls);

        if let Some((user, pass)) = self.config.credentials() {
            builder = builder.credentials(Credentials::new(user.to_string(), pass.to_string()));
        }

        Ok(builder.build())
    }
}

#[async_trait]
impl Mailer for MailRelay {
    async fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        let email = self.build_message(message)?;
        let transport = self.transport()?;

        debug!(
            "Connecting to SMTP relay {}:{} (ssl={})",
            self.config.host, self.config.port, self.config.ssl
        );
        transport.send(email).await?;

        info!("Email sent to {}", message.to);
        Ok(())
    }
}

fn parse_address(raw: &str) -> Result<Address, MailError> {
    raw.trim()
        .parse::<Address>()
        .map_err(|source| MailError::Address {
            address: raw.to_string(),
            source,
        })
}
