//! Mail submission over SMTP

use crate::account::TestAccount;
use crate::config::MailConfig;
use crate::error::{Error, Result};
use crate::message::OutboundMessage;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, info};

/// SMTP client that submits messages on behalf of a test account.
pub struct Mailer {
    config: MailConfig,
}

impl Mailer {
    #[must_use]
    pub const fn new(config: MailConfig) -> Self {
        Self { config }
    }

    /// Submit a message and return the queue id the server assigned.
    ///
    /// # Errors
    ///
    /// Returns an error if the message is malformed or the relay
    /// rejects the submission. Failures are fatal; submission is
    /// never retried.
    pub async fn send(&self, account: &TestAccount, message: &OutboundMessage) -> Result<String> {
        let email = build_mime(message)?;
        let transport = self.transport(account)?;

        debug!("Submitting '{}' for {}", message.subject, account.user);
        let response = transport
            .send(email)
            .await
            .map_err(|e| Error::Smtp(format!("Submission failed: {e}")))?;

        let reply = response.message().collect::<Vec<&str>>().join(" ");
        let queue_id = queue_id_from_reply(&reply);
        info!("Message accepted, queue id {}", queue_id);
        Ok(queue_id)
    }

    fn transport(&self, account: &TestAccount) -> Result<AsyncSmtpTransport<Tokio1Executor>> {
        let builder = if self.config.smtp_starttls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.smtp_host)
                .map_err(|e| Error::Smtp(format!("Relay setup failed: {e}")))?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&self.config.smtp_host)
        };

        Ok(builder
            .port(self.config.smtp_port)
            .credentials(Credentials::new(
                account.user.clone(),
                account.pass.clone(),
            ))
            .build())
    }
}

/// Assemble the RFC 5322 message: text and html as alternatives,
/// wrapped in multipart/mixed when attachments ride along.
fn build_mime(message: &OutboundMessage) -> Result<Message> {
    let mut builder = Message::builder()
        .from(parse_mailbox(&message.from)?)
        .subject(message.subject.clone());
    for recipient in &message.to {
        builder = builder.to(parse_mailbox(recipient)?);
    }

    let alternative =
        MultiPart::alternative_plain_html(message.text.clone(), message.html.clone());

    let built = if message.attachments.is_empty() {
        builder.multipart(alternative)
    } else {
        let mut mixed = MultiPart::mixed().multipart(alternative);
        for attachment in &message.attachments {
            let content_type = attachment
                .content_type
                .as_deref()
                .unwrap_or("application/octet-stream");
            let content_type = ContentType::parse(content_type).map_err(|e| {
                Error::Smtp(format!("Invalid content type for {}: {e}", attachment.filename))
            })?;
            mixed = mixed.singlepart(
                Attachment::new(attachment.filename.clone())
                    .body(attachment.content.clone(), content_type),
            );
        }
        builder.multipart(mixed)
    };

    built.map_err(|e| Error::Smtp(format!("Invalid message: {e}")))
}

fn parse_mailbox(address: &str) -> Result<Mailbox> {
    address
        .parse()
        .map_err(|e| Error::Smtp(format!("Invalid address '{address}': {e}")))
}

/// Pull the queue id out of a positive completion like
/// `2.0.0 Ok: queued as AbC123`. Servers word this differently, so
/// anything unrecognized falls back to the whole reply.
fn queue_id_from_reply(reply: &str) -> String {
    match reply.split_once("queued as ") {
        Some((_, rest)) => rest.split_whitespace().next().unwrap_or(rest).to_string(),
        None => reply.trim().to_string(),
    }
}
