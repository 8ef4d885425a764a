use std::collections::HashMap;
use std::sync::Arc;

use secrecy::Secret;
use tokio::sync::RwLock;
use veridian_core::{
    Email, Password, TwoFactorStatus, User, UserId, UserStore, UserStoreError,
};

use crate::auth::password::{DUMMY_PASSWORD_HASH, compute_password_hash, verify_password_hash};

struct UserRecord {
    user: User,
    password_hash: Secret<String>,
}

/// User store backed by process memory. Passwords are hashed exactly as
/// in the PostgreSQL store, so timing characteristics match production.
#[derive(Default, Clone)]
pub struct InMemoryUserStore {
    users: Arc<RwLock<HashMap<UserId, UserRecord>>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl UserStore for InMemoryUserStore {
    async fn add_user(&self, user: User, password: Password) -> Result<(), UserStoreError> {
        let password_hash = compute_password_hash(password)
            .await
            .map_err(UserStoreError::UnexpectedError)?;

        let mut users = self.users.write().await;
        if users.values().any(|r| r.user.email() == user.email()) {
            return Err(UserStoreError::UserAlreadyExists);
        }
        users.insert(
            *user.id(),
            UserRecord {
                user,
                password_hash,
            },
        );
        Ok(())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserStoreError> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|r| r.user.email() == email)
            .map(|r| r.user.clone()))
    }

    async fn get_user(&self, id: &UserId) -> Result<User, UserStoreError> {
        let users = self.users.read().await;
        users
            .get(id)
            .map(|r| r.user.clone())
            .ok_or(UserStoreError::UserNotFound)
    }

    async fn authenticate_user(
        &self,
        email: &Email,
        password: &Password,
    ) -> Result<User, UserStoreError> {
        let record = {
            let users = self.users.read().await;
            users
                .values()
                .find(|r| r.user.email() == email)
                .map(|r| (r.user.clone(), r.password_hash.clone()))
        };

        // Unknown email still pays for a hash verification, keeping the
        // two failure paths indistinguishable.
        let Some((user, password_hash)) = record else {
            let _ = verify_password_hash(
                Secret::from(DUMMY_PASSWORD_HASH.to_string()),
                password.clone(),
            )
            .await;
            return Err(UserStoreError::UserNotFound);
        };

        verify_password_hash(password_hash, password.clone())
            .await
            .map_err(|_| UserStoreError::IncorrectPassword)?;

        Ok(user)
    }

    async fn verify_password(
        &self,
        id: &UserId,
        password: &Password,
    ) -> Result<(), UserStoreError> {
        let password_hash = {
            let users = self.users.read().await;
            users
                .get(id)
                .map(|r| r.password_hash.clone())
                .ok_or(UserStoreError::UserNotFound)?
        };

        verify_password_hash(password_hash, password.clone())
            .await
            .map_err(|_| UserStoreError::IncorrectPassword)
    }

    async fn set_new_password(
        &self,
        id: &UserId,
        new_password: Password,
    ) -> Result<(), UserStoreError> {
        let password_hash = compute_password_hash(new_password)
            .await
            .map_err(UserStoreError::UnexpectedError)?;

        let mut users = self.users.write().await;
        let record = users.get_mut(id).ok_or(UserStoreError::UserNotFound)?;
        record.password_hash = password_hash;
        Ok(())
    }

    async fn set_email_verified(&self, id: &UserId, verified: bool) -> Result<(), UserStoreError> {
        self.update_user(id, |user| {
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
        .await
    }

    async fn set_two_factor(
        &self,
        id: &UserId,
        status: TwoFactorStatus,
    ) -> Result<(), UserStoreError> {
        self.update_user(id, |user| {
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
        .await
    }

    async fn update_email(&self, id: &UserId, email: Email) -> Result<(), UserStoreError> {
        let mut users = self.users.write().await;
        if users
            .iter()
            .any(|(other, r)| other != id && r.user.email() == &email)
        {
            return Err(UserStoreError::UserAlreadyExists);
        }
        let record = users.get_mut(id).ok_or(UserStoreError::UserNotFound)?;
        record.user = User::from_parts(
            *record.user.id(),
            email,
            record.user.name().to_string(),
            record.user.avatar_url().map(str::to_string),
            record.user.email_verified(),
            record.user.two_factor().clone(),
            record.user.created_at(),
        );
        Ok(())
    }

    async fn delete_user(&self, id: &UserId) -> Result<(), UserStoreError> {
        let mut users = self.users.write().await;
        users.remove(id).ok_or(UserStoreError::UserNotFound)?;
        Ok(())
    }
}

impl InMemoryUserStore {
    async fn update_user(
        &self,
        id: &UserId,
        f: impl Fn(&User) -> User,
    ) -> Result<(), UserStoreError> {
        let mut users = self.users.write().await;
        let record = users.get_mut(id).ok_or(UserStoreError::UserNotFound)?;
        record.user = f(&record.user);
        Ok(())
    }
}
