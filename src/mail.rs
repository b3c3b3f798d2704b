//! Outbound email: the `Mailer` seam and its SMTP implementation.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment as MimeAttachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::{SmtpSecurity, SmtpSettings};
use crate::error::MailError;
use crate::models::OutgoingEmail;

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailError>;
}

/// Authenticated SMTP relay. Opens a fresh session for every message.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn new(settings: &SmtpSettings) -> Result<Self, MailError> {
        let builder = match settings.security {
            SmtpSecurity::ImplicitTls => AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)?,
            SmtpSecurity::StartTls => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)?,
        };

        let transport = builder
            .port(settings.port)
            .credentials(Credentials::new(settings.username.clone(), settings.password.clone()))
            .build();

        Ok(SmtpMailer { transport })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailError> {
        let message = build_message(&email)?;
        self.transport.send(message).await?;
        Ok(())
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, MailError> {
    address.parse().map_err(|source| MailError::Address {
        address: address.to_string(),
        source,
    })
}

/// HTML-only mail goes out as `multipart/alternative`; with a file it becomes
/// `multipart/mixed` and the file is always sent as `application/octet-stream`.
pub fn build_message(email: &OutgoingEmail) -> Result<Message, MailError> {
    let builder = Message::builder()
        .from(parse_mailbox(&email.from)?)
        .to(parse_mailbox(&email.to)?)
        .subject(email.subject.as_str());

    let html = SinglePart::html(email.html.clone());

    let message = match &email.attachment {
        Some(attachment) => {
            let file = MimeAttachment::new(attachment.filename.clone())
                .body(attachment.bytes.clone(), ContentType::parse("application/octet-stream")?);
            builder.multipart(MultiPart::mixed().singlepart(html).singlepart(file))?
        }
        None => builder.multipart(MultiPart::alternative().singlepart(html))?,
    };

    Ok(message)
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::Mutex;

    /// Keeps every message instead of sending it; optionally fails each send.
    #[derive(Default)]
    pub struct RecordingMailer {
        pub sent: Mutex<Vec<OutgoingEmail>>,
        pub fail: bool,
    }

    impl RecordingMailer {
        pub fn failing() -> Self {
            RecordingMailer { sent: Mutex::new(vec![]), fail: true }
        }

        pub fn sent(&self) -> Vec<OutgoingEmail> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send(&self, email: OutgoingEmail) -> Result<(), MailError> {
            if self.fail {
                return Err(MailError::Build(lettre::error::Error::MissingFrom));
            }
            self.sent.lock().unwrap().push(email);
            Ok(())
        }
    }
}
