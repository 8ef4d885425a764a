use std::sync::{Arc, Mutex};

use chrono::Duration;
use secrecy::ExposeSecret;
use veridian_adapters::{
    FixedWindowRateLimiter, InMemoryOtpCodeStore, InMemorySessionStore, InMemoryUserStore,
    InMemoryVerificationTokenStore, TotpEngine,
};
use veridian_auth_service::AuthService;
use veridian_axum::{AppState, state::AuthPolicy};
use veridian_core::{Email, EmailClient, EmailClientError};

pub const TOTP_ISSUER: &str = "Veridian Test";

/// A running service over in-memory adapters, plus handles into the
/// stores the tests need to observe directly.
pub struct TestApp {
    pub address: String,
    pub http_client: reqwest::Client,
    pub emails: Arc<CapturingEmailClient>,
    pub otp_store: Arc<InMemoryOtpCodeStore>,
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(test_policy(), 50).await
}

pub async fn spawn_app_with(policy: AuthPolicy, rate_limit_max: u32) -> TestApp {
    let emails = Arc::new(CapturingEmailClient::new());
    let otp_store = Arc::new(InMemoryOtpCodeStore::new());

    let state = AppState {
        user_store: Arc::new(InMemoryUserStore::new()),
        session_store: Arc::new(InMemorySessionStore::new()),
        otp_store: otp_store.clone(),
        token_store: Arc::new(InMemoryVerificationTokenStore::new()),
        email_client: emails.clone(),
        rate_limiter: Arc::new(FixedWindowRateLimiter::new(
            std::time::Duration::from_secs(60),
            rate_limit_max,
        )),
        totp: Arc::new(TotpEngine::new(TOTP_ISSUER.to_string())),
        policy,
    };

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let address = format!("http://{}", listener.local_addr().unwrap());

    tokio::spawn(AuthService::new(state).run_standalone(listener, None));

    let http_client = reqwest::Client::builder()
        .cookie_store(true)
        .build()
        .unwrap();

    TestApp {
        address,
        http_client,
        emails,
        otp_store,
    }
}

pub fn test_policy() -> AuthPolicy {
    AuthPolicy {
        session_ttl: Duration::days(7),
        pending_session_ttl: Duration::minutes(10),
        otp_ttl: Duration::minutes(5),
        otp_max_attempts: 3,
        verify_email_ttl: Duration::hours(24),
        reset_password_ttl: Duration::minutes(60),
        change_email_ttl: Duration::hours(24),
        delete_account_ttl: Duration::hours(1),
        revoke_sessions_on_password_change: true,
    }
}

impl TestApp {
    pub async fn post(&self, path: &str, body: &serde_json::Value) -> reqwest::Response {
        self.http_client
            .post(format!("{}{path}", self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post_empty(&self, path: &str) -> reqwest::Response {
        self.http_client
            .post(format!("{}{path}", self.address))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.http_client
            .get(format!("{}{path}", self.address))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn delete(&self, path: &str, body: &serde_json::Value) -> reqwest::Response {
        self.http_client
            .delete(format!("{}{path}", self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn signup(&self, email: &str, password: &str, name: &str) -> reqwest::Response {
        self.post(
            "/signup",
            &serde_json::json!({ "email": email, "password": password, "name": name }),
        )
        .await
    }

    pub async fn login(&self, email: &str, password: &str) -> reqwest::Response {
        self.post(
            "/login",
            &serde_json::json!({ "email": email, "password": password }),
        )
        .await
    }
}

#[derive(Clone)]
pub struct SentEmail {
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

/// Email client that records every message instead of delivering it, so
/// tests can fish codes and tokens out of the "inbox".
pub struct CapturingEmailClient {
    sent: Mutex<Vec<SentEmail>>,
}

impl CapturingEmailClient {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn sent(&self) -> Vec<SentEmail> {
        self.sent.lock().unwrap().clone()
    }

    pub fn last(&self) -> SentEmail {
        self.sent()
            .last()
            .cloned()
            .expect("No email was captured")
    }

    pub fn last_with_subject(&self, subject: &str) -> SentEmail {
        self.sent()
            .into_iter()
            .rev()
            .find(|email| email.subject == subject)
            .unwrap_or_else(|| panic!("No email with subject {subject:?} was captured"))
    }
}

#[async_trait::async_trait]
impl EmailClient for CapturingEmailClient {
    async fn send_email(
        &self,
        recipient: &Email,
        subject: &str,
        content: &str,
    ) -> Result<(), EmailClientError> {
        self.sent.lock().unwrap().push(SentEmail {
            recipient: recipient.as_ref().expose_secret().clone(),
            subject: subject.to_string(),
            body: content.to_string(),
        });
        Ok(())
    }
}

/// Token and OTP emails end with the value itself.
pub fn token_in(body: &str) -> String {
    body.rsplit(' ')
        .next()
        .expect("Email body was empty")
        .to_string()
}

/// A six-digit code guaranteed to differ from `code`.
pub fn wrong_code(code: &str) -> String {
    let first = code.as_bytes()[0] - b'0';
    let flipped = (first + 1) % 10;
    format!("{}{}", flipped, &code[1..])
}
