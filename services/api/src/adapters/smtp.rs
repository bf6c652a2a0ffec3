//! services/api/src/adapters/smtp.rs
//!
//! The SMTP adapter implementing the `Mailer` port from the
//! `justificante_core` crate using `lettre`'s async transport. The transport
//! is built once at startup from the environment-supplied credentials.

use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{error, info};

use justificante_core::ports::{Mailer, OutgoingEmail, PortError, PortResult};

use crate::config::SmtpConfig;
use crate::error::ApiError;

/// A mailer that delivers through a single configured SMTP relay.
#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    /// Builds the transport from the SMTP configuration. `secure` selects
    /// implicit TLS; otherwise the connection upgrades via STARTTLS.
    pub fn from_config(config: &SmtpConfig) -> Result<Self, ApiError> {
        let builder = if config.secure {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
        }
        .map_err(|e| ApiError::MailTransport(e.to_string()))?;

        let mut builder = builder.port(config.port).timeout(Some(config.timeout));
        if let (Some(user), Some(pass)) = (&config.user, &config.pass) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        let from = config
            .from_address()
            .ok_or_else(|| {
                ApiError::MailTransport("SMTP_FROM or SMTP_USER must be set".to_string())
            })?
            .parse::<Mailbox>()
            .map_err(|e| ApiError::MailTransport(format!("invalid from-address: {e}")))?;

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }

    fn parse_mailbox(address: &str) -> PortResult<Mailbox> {
        address
            .parse::<Mailbox>()
            .map_err(|e| PortError::Rejected(format!("invalid address '{address}': {e}")))
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: &OutgoingEmail) -> PortResult<()> {
        let mut builder = Message::builder()
            .from(self.from.clone())
            .to(Self::parse_mailbox(&email.to)?)
            .subject(email.subject.clone());
        for cc in &email.cc {
            builder = builder.cc(Self::parse_mailbox(cc)?);
        }

        let message = builder
            .multipart(MultiPart::alternative_plain_html(
                email.text_body.clone(),
                email.html_body.clone(),
            ))
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        match self.transport.send(message).await {
            Ok(_) => {
                info!(to = %email.to, cc_count = email.cc.len(), "Email dispatched");
                Ok(())
            }
            Err(e) => {
                // Classify for the logs; the caller only needs the message.
                let kind = if e.is_timeout() {
                    "timeout"
                } else if e.is_permanent() {
                    "rejected"
                } else if e.is_transient() {
                    "transient"
                } else {
                    "connection"
                };
                error!(to = %email.to, kind, "SMTP send failed: {e}");
                Err(PortError::Rejected(e.to_string()))
            }
        }
    }
}
