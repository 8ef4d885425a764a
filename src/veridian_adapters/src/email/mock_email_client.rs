use secrecy::ExposeSecret;
use veridian_core::{Email, EmailClient, EmailClientError};

/// Email client that logs instead of sending, for local development and
/// integration tests.
#[derive(Debug, Clone, Default)]
pub struct MockEmailClient;

impl MockEmailClient {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl EmailClient for MockEmailClient {
    async fn send_email(
        &self,
        recipient: &Email,
        subject: &str,
        content: &str,
    ) -> Result<(), EmailClientError> {
        tracing::debug!(
            recipient = %recipient.as_ref().expose_secret(),
            subject,
            content,
            "Pretending to send an email"
        );
        Ok(())
    }
}
