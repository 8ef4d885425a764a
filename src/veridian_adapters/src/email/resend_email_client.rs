use reqwest::{Client, Url};
use secrecy::{ExposeSecret, Secret};
use veridian_core::{Email, EmailClient, EmailClientError};

/// Email client backed by the Resend HTTP API.
pub struct ResendEmailClient {
    http_client: Client,
    base_url: String,
    sender: String,
    authorization_token: Secret<String>,
}

impl ResendEmailClient {
    pub fn new(
        base_url: String,
        sender: String,
        authorization_token: Secret<String>,
        http_client: Client,
    ) -> Self {
        Self {
            http_client,
            base_url,
            sender,
            authorization_token,
        }
    }
}

#[async_trait::async_trait]
impl EmailClient for ResendEmailClient {
    #[tracing::instrument(name = "Sending email", skip_all)]
    async fn send_email(
        &self,
        recipient: &Email,
        subject: &str,
        content: &str,
    ) -> Result<(), EmailClientError> {
        let base = Url::parse(&self.base_url)
            .map_err(|e| EmailClientError::Delivery(e.to_string()))?;
        let url = base
            .join("/emails")
            .map_err(|e| EmailClientError::Delivery(e.to_string()))?;

        let request_body = SendEmailRequest {
            from: &self.sender,
            to: [recipient.as_ref().expose_secret()],
            subject,
            html: content,
            text: content,
        };

        self.http_client
            .post(url)
            .bearer_auth(self.authorization_token.expose_secret())
            .json(&request_body)
            .send()
            .await
            .map_err(|e| EmailClientError::Delivery(e.to_string()))?
            .error_for_status()
            .map_err(|e| EmailClientError::Delivery(e.to_string()))?;

        Ok(())
    }
}

#[derive(serde::Serialize, Debug)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
    text: &'a str,
}
