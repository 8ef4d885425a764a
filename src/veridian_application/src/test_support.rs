//! Shared in-process fakes for use-case tests.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, Secret};
use veridian_core::{
    ConsumedToken, Email, EmailClient, EmailClientError, OneTimeCode, OtpCode, OtpCodeStore,
    OtpCodeStoreError, Password, RateLimitAction, RateLimitError, RateLimiter, Session,
    SessionState, SessionStore, SessionStoreError, SessionToken, TokenPurpose, TotpError,
    TotpVerifier, TwoFactorEnrollment, TwoFactorStatus, User, UserId, UserStore, UserStoreError,
    VerificationToken, VerificationTokenStore, VerificationTokenStoreError,
};

pub fn email(address: &str) -> Email {
    Email::try_from(Secret::from(address.to_string())).unwrap()
}

pub fn password(value: &str) -> Password {
    Password::try_from(Secret::from(value.to_string())).unwrap()
}

#[derive(Clone, Default)]
pub struct FakeUserStore {
    inner: Arc<Mutex<HashMap<UserId, (User, String)>>>,
}

impl FakeUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(user: User, plaintext_password: &str) -> Self {
        let store = Self::new();
        store
            .inner
            .lock()
            .unwrap()
            .insert(*user.id(), (user, plaintext_password.to_string()));
        store
    }

    pub fn get(&self, id: &UserId) -> Option<User> {
        self.inner.lock().unwrap().get(id).map(|(u, _)| u.clone())
    }

    pub fn contains(&self, id: &UserId) -> bool {
        self.inner.lock().unwrap().contains_key(id)
    }
}

#[async_trait]
impl UserStore for FakeUserStore {
    async fn add_user(&self, user: User, password: Password) -> Result<(), UserStoreError> {
        let mut users = self.inner.lock().unwrap();
        if users.values().any(|(u, _)| u.email() == user.email()) {
            return Err(UserStoreError::UserAlreadyExists);
        }
        let plaintext = password.as_ref().expose_secret().clone();
        users.insert(*user.id(), (user, plaintext));
        Ok(())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserStoreError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .values()
            .find(|(u, _)| u.email() == email)
            .map(|(u, _)| u.clone()))
    }

    async fn get_user(&self, id: &UserId) -> Result<User, UserStoreError> {
        self.get(id).ok_or(UserStoreError::UserNotFound)
    }

    async fn authenticate_user(
        &self,
        email: &Email,
        password: &Password,
    ) -> Result<User, UserStoreError> {
        let users = self.inner.lock().unwrap();
        let (user, stored) = users
            .values()
            .find(|(u, _)| u.email() == email)
            .ok_or(UserStoreError::UserNotFound)?;
        if stored == password.as_ref().expose_secret() {
            Ok(user.clone())
        } else {
            Err(UserStoreError::IncorrectPassword)
        }
    }

    async fn verify_password(
        &self,
        id: &UserId,
        password: &Password,
    ) -> Result<(), UserStoreError> {
        let users = self.inner.lock().unwrap();
        let (_, stored) = users.get(id).ok_or(UserStoreError::UserNotFound)?;
        if stored == password.as_ref().expose_secret() {
            Ok(())
        } else {
            Err(UserStoreError::IncorrectPassword)
        }
    }

    async fn set_new_password(
        &self,
        id: &UserId,
        new_password: Password,
    ) -> Result<(), UserStoreError> {
        let mut users = self.inner.lock().unwrap();
        let entry = users.get_mut(id).ok_or(UserStoreError::UserNotFound)?;
        entry.1 = new_password.as_ref().expose_secret().clone();
        Ok(())
    }

    async fn set_email_verified(&self, id: &UserId, verified: bool) -> Result<(), UserStoreError> {
        self.mutate(id, |user| {
            User::from_parts(
                *user.id(),
                user.email().clone(),
                user.name().to_string(),
                user.avatar_url().map(str::to_string),
                verified,
                user.two_factor().clone(),
                user.created_at(),
            )
        })
    }

    async fn set_two_factor(
        &self,
        id: &UserId,
        status: TwoFactorStatus,
    ) -> Result<(), UserStoreError> {
        self.mutate(id, |user| {
            User::from_parts(
                *user.id(),
                user.email().clone(),
                user.name().to_string(),
                user.avatar_url().map(str::to_string),
                user.email_verified(),
                status.clone(),
                user.created_at(),
            )
        })
    }

    async fn update_email(&self, id: &UserId, email: Email) -> Result<(), UserStoreError> {
        self.mutate(id, |user| {
            User::from_parts(
                *user.id(),
                email.clone(),
                user.name().to_string(),
                user.avatar_url().map(str::to_string),
                user.email_verified(),
                user.two_factor().clone(),
                user.created_at(),
            )
        })
    }

    async fn delete_user(&self, id: &UserId) -> Result<(), UserStoreError> {
        self.inner
            .lock()
            .unwrap()
            .remove(id)
            .map(|_| ())
            .ok_or(UserStoreError::UserNotFound)
    }
}

impl FakeUserStore {
    fn mutate(
        &self,
        id: &UserId,
        f: impl Fn(&User) -> User,
    ) -> Result<(), UserStoreError> {
        let mut users = self.inner.lock().unwrap();
        let entry = users.get_mut(id).ok_or(UserStoreError::UserNotFound)?;
        entry.0 = f(&entry.0);
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct FakeSessionStore {
    inner: Arc<Mutex<HashMap<SessionToken, Session>>>,
}

impl FakeSessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_sync(&self, token: &SessionToken) -> Option<Session> {
        self.inner.lock().unwrap().get(token).cloned()
    }
}

#[async_trait]
impl SessionStore for FakeSessionStore {
    async fn insert(&self, session: Session) -> Result<(), SessionStoreError> {
        self.inner
            .lock()
            .unwrap()
            .insert(session.token().clone(), session);
        Ok(())
    }

    async fn get(&self, token: &SessionToken) -> Result<Option<Session>, SessionStoreError> {
        Ok(self.get_sync(token))
    }

    async fn promote(&self, token: &SessionToken) -> Result<Session, SessionStoreError> {
        let mut sessions = self.inner.lock().unwrap();
        let session = sessions.get_mut(token).ok_or(SessionStoreError::NotFound)?;
        if session.is_revoked() || session.state() != SessionState::PendingTwoFactor {
            return Err(SessionStoreError::NotPending);
        }
        session.promote();
        Ok(session.clone())
    }

    async fn revoke(&self, token: &SessionToken) -> Result<(), SessionStoreError> {
        if let Some(session) = self.inner.lock().unwrap().get_mut(token) {
            session.revoke();
        }
        Ok(())
    }

    async fn revoke_all_for_user(
        &self,
        user_id: &UserId,
        except: Option<&SessionToken>,
    ) -> Result<(), SessionStoreError> {
        for session in self.inner.lock().unwrap().values_mut() {
            if session.user_id() == user_id && Some(session.token()) != except {
                session.revoke();
            }
        }
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct FakeOtpStore {
    inner: Arc<Mutex<HashMap<UserId, OneTimeCode>>>,
}

impl FakeOtpStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self, user_id: &UserId) -> Option<OneTimeCode> {
        self.inner.lock().unwrap().get(user_id).cloned()
    }
}

#[async_trait]
impl OtpCodeStore for FakeOtpStore {
    async fn put(&self, code: OneTimeCode) -> Result<(), OtpCodeStoreError> {
        self.inner.lock().unwrap().insert(*code.user_id(), code);
        Ok(())
    }

    async fn consume(
        &self,
        user_id: &UserId,
        submitted: &OtpCode,
        now: DateTime<Utc>,
    ) -> Result<(), OtpCodeStoreError> {
        let mut codes = self.inner.lock().unwrap();
        let code = codes.get_mut(user_id).ok_or(OtpCodeStoreError::NotFound)?;
        code.verify(submitted, now)?;
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct FakeTokenStore {
    inner: Arc<Mutex<HashMap<String, VerificationToken>>>,
}

impl FakeTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issued(&self) -> Vec<VerificationToken> {
        self.inner.lock().unwrap().values().cloned().collect()
    }
}

#[async_trait]
impl VerificationTokenStore for FakeTokenStore {
    async fn insert(&self, token: VerificationToken) -> Result<(), VerificationTokenStoreError> {
        self.inner
            .lock()
            .unwrap()
            .insert(token.value().to_string(), token);
        Ok(())
    }

    async fn consume(
        &self,
        value: &str,
        purpose: TokenPurpose,
        now: DateTime<Utc>,
    ) -> Result<ConsumedToken, VerificationTokenStoreError> {
        let mut tokens = self.inner.lock().unwrap();
        let token = tokens
            .get_mut(value)
            .ok_or(VerificationTokenStoreError::NotFound)?;
        token.consume(purpose, now)?;
        Ok(ConsumedToken {
            user_id: *token.user_id(),
            payload: token.payload().map(str::to_string),
        })
    }
}

#[derive(Debug, Clone)]
pub struct SentEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Email client that records instead of sending; can be told to fail.
#[derive(Clone, Default)]
pub struct RecordingEmailClient {
    sent: Arc<Mutex<Vec<SentEmail>>>,
    failing: Arc<Mutex<bool>>,
}

impl RecordingEmailClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        let client = Self::default();
        *client.failing.lock().unwrap() = true;
        client
    }

    pub fn sent(&self) -> Vec<SentEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmailClient for RecordingEmailClient {
    async fn send_email(
        &self,
        recipient: &Email,
        subject: &str,
        content: &str,
    ) -> Result<(), EmailClientError> {
        if *self.failing.lock().unwrap() {
            return Err(EmailClientError::Delivery("recording client set to fail".into()));
        }
        self.sent.lock().unwrap().push(SentEmail {
            to: recipient.as_ref().expose_secret().clone(),
            subject: subject.to_string(),
            body: content.to_string(),
        });
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct AllowAllRateLimiter;

#[async_trait]
impl RateLimiter for AllowAllRateLimiter {
    async fn check(&self, _identity: &str, _action: RateLimitAction) -> Result<(), RateLimitError> {
        Ok(())
    }
}

#[derive(Clone)]
pub struct DenyAllRateLimiter;

#[async_trait]
impl RateLimiter for DenyAllRateLimiter {
    async fn check(&self, _identity: &str, _action: RateLimitAction) -> Result<(), RateLimitError> {
        Err(RateLimitError::TooManyRequests {
            retry_after: std::time::Duration::from_secs(60),
        })
    }
}

/// TOTP verifier that accepts a single configured code.
#[derive(Clone)]
pub struct StubTotpVerifier {
    pub valid_code: String,
}

impl TotpVerifier for StubTotpVerifier {
    fn generate_enrollment(&self, _account: &Email) -> Result<TwoFactorEnrollment, TotpError> {
        Ok(TwoFactorEnrollment {
            secret_base32: Secret::from("JBSWY3DPEHPK3PXP".to_string()),
            otpauth_url: Secret::from(
                "otpauth://totp/Veridian:user?secret=JBSWY3DPEHPK3PXP&issuer=Veridian".to_string(),
            ),
        })
    }

    fn check(&self, _secret_base32: &Secret<String>, code: &str) -> Result<bool, TotpError> {
        Ok(code == self.valid_code)
    }
}
