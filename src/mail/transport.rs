use std::{fs, path::PathBuf, time::Duration};

use lettre::{
    transport::smtp::authentication::Credentials, FileTransport, Message, SmtpTransport,
    Transport,
};

use crate::errors::TransportError;

use super::MailCredentials;

/// Delivery seam between the composer and the outside world.
pub trait MailTransport {
    fn send(&self, message: &Message, credentials: &MailCredentials)
        -> Result<(), TransportError>;

    /// Short label used in logs and the confirmation screen.
    fn describe(&self) -> String;
}

/// Authenticated STARTTLS relay session, opened per message.
#[derive(Debug, Clone)]
pub struct SmtpRelay {
    host: String,
    port: u16,
    timeout: Duration,
}

impl SmtpRelay {
    pub fn new(host: impl Into<String>, port: u16, timeout: Duration) -> Self {
        Self {
            host: host.into(),
            port,
            timeout,
        }
    }
}

impl MailTransport for SmtpRelay {
    fn send(
        &self,
        message: &Message,
        credentials: &MailCredentials,
    ) -> Result<(), TransportError> {
        let mailer = SmtpTransport::starttls_relay(&self.host)
            .map_err(|err| TransportError::Relay(err.to_string()))?
            .port(self.port)
            .credentials(Credentials::new(
                credentials.sender.clone(),
                credentials.secret.clone(),
            ))
            .timeout(Some(self.timeout))
            .build();
        tracing::debug!(host = %self.host, port = self.port, "opening relay session");
        mailer
            .send(message)
            .map(|_| ())
            .map_err(|err| TransportError::Relay(err.to_string()))
    }

    fn describe(&self) -> String {
        format!("smtp://{}:{}", self.host, self.port)
    }
}

/// Writes each message as an `.eml` file instead of relaying it.
#[derive(Debug, Clone)]
pub struct OutboxTransport {
    dir: PathBuf,
}

impl OutboxTransport {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }
}

impl MailTransport for OutboxTransport {
    fn send(
        &self,
        message: &Message,
        _credentials: &MailCredentials,
    ) -> Result<(), TransportError> {
        fs::create_dir_all(&self.dir).map_err(|err| {
            TransportError::Outbox(format!("{}: {}", self.dir.display(), err))
        })?;
        let id = FileTransport::new(&self.dir)
            .send(message)
            .map_err(|err| TransportError::Outbox(err.to_string()))?;
        tracing::info!(file = %self.dir.join(format!("{id}.eml")).display(), "inquiry written to outbox");
        Ok(())
    }

    fn describe(&self) -> String {
        format!("outbox:{}", self.dir.display())
    }
}
