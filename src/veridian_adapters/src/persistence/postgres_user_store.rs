use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, Secret};
use sqlx::{PgPool, Pool, Postgres, Row, postgres::PgRow};
use uuid::Uuid;
use veridian_core::{
    Email, Password, TwoFactorStatus, User, UserId, UserStore, UserStoreError,
};

use super::retry::{retry_once, transient_sqlx};
use crate::auth::password::{DUMMY_PASSWORD_HASH, compute_password_hash, verify_password_hash};

/// User store backed by PostgreSQL. Connection-level failures get one
/// retry before surfacing as `UnexpectedError`.
pub struct PostgresUserStore {
    pool: PgPool,
}

impl PostgresUserStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        PostgresUserStore { pool }
    }

    async fn fetch_row(&self, email: &Email) -> Result<Option<PgRow>, UserStoreError> {
        let pool = &self.pool;
        let email = email.as_ref().expose_secret();
        retry_once(
            move || async move {
                sqlx::query(
                    r#"
                        SELECT id, email, name, avatar_url, email_verified,
                               password_hash, two_factor_secret, created_at
                        FROM users
                        WHERE email = $1
                    "#,
                )
                .bind(email)
                .fetch_optional(pool)
                .await
            },
            transient_sqlx,
        )
        .await
        .map_err(|e| UserStoreError::UnexpectedError(e.to_string()))
    }

    async fn fetch_row_by_id(&self, id: &UserId) -> Result<Option<PgRow>, UserStoreError> {
        let pool = &self.pool;
        let id = id.as_uuid();
        retry_once(
            move || async move {
                sqlx::query(
                    r#"
                        SELECT id, email, name, avatar_url, email_verified,
                               password_hash, two_factor_secret, created_at
                        FROM users
                        WHERE id = $1
                    "#,
                )
                .bind(id)
                .fetch_optional(pool)
                .await
            },
            transient_sqlx,
        )
        .await
        .map_err(|e| UserStoreError::UnexpectedError(e.to_string()))
    }
}

fn user_from_row(row: &PgRow) -> Result<User, UserStoreError> {
    let id: Uuid = get(row, "id")?;
    let email: String = get(row, "email")?;
    let name: String = get(row, "name")?;
    let avatar_url: Option<String> = get(row, "avatar_url")?;
    let email_verified: bool = get(row, "email_verified")?;
    let two_factor_secret: Option<String> = get(row, "two_factor_secret")?;
    let created_at: DateTime<Utc> = get(row, "created_at")?;

    let email = Email::try_from(Secret::from(email))
        .map_err(|e| UserStoreError::UnexpectedError(e.to_string()))?;
    let two_factor = match two_factor_secret {
        Some(secret) => TwoFactorStatus::Enabled {
            secret: Secret::from(secret),
        },
        None => TwoFactorStatus::Disabled,
    };

    Ok(User::from_parts(
        UserId::from(id),
        email,
        name,
        avatar_url,
        email_verified,
        two_factor,
        created_at,
    ))
}

fn get<'r, T: sqlx::Decode<'r, Postgres> + sqlx::Type<Postgres>>(
    row: &'r PgRow,
    column: &str,
) -> Result<T, UserStoreError> {
    row.try_get(column)
        .map_err(|e| UserStoreError::UnexpectedError(e.to_string()))
}

fn password_hash_from_row(row: &PgRow) -> Result<Secret<String>, UserStoreError> {
    get::<String>(row, "password_hash").map(Secret::from)
}

fn map_write_error(e: sqlx::Error) -> UserStoreError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.constraint().is_some() {
            return UserStoreError::UserAlreadyExists;
        }
    }
    UserStoreError::UnexpectedError(e.to_string())
}

#[async_trait::async_trait]
impl UserStore for PostgresUserStore {
    #[tracing::instrument(name = "Adding user to PostgreSQL", skip_all)]
    async fn add_user(&self, user: User, password: Password) -> Result<(), UserStoreError> {
        let password_hash = compute_password_hash(password)
            .await
            .map_err(UserStoreError::UnexpectedError)?;

        let pool = &self.pool;
        let user = &user;
        let password_hash = &password_hash;
        retry_once(
            move || async move {
                sqlx::query(
                    r#"
                        INSERT INTO users (id, email, name, avatar_url, email_verified,
                                           password_hash, two_factor_secret, created_at)
                        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                    "#,
                )
                .bind(user.id().as_uuid())
                .bind(user.email().as_ref().expose_secret())
                .bind(user.name())
                .bind(user.avatar_url())
                .bind(user.email_verified())
                .bind(password_hash.expose_secret())
                .bind(user.two_factor().secret().map(|s| s.expose_secret().clone()))
                .bind(user.created_at())
                .execute(pool)
                .await
            },
            transient_sqlx,
        )
        .await
        .map_err(map_write_error)?;

        Ok(())
    }

    #[tracing::instrument(name = "Finding user by email in PostgreSQL", skip_all)]
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserStoreError> {
        match self.fetch_row(email).await? {
            Some(row) => Ok(Some(user_from_row(&row)?)),
            None => Ok(None),
        }
    }

    #[tracing::instrument(name = "Retrieving user from PostgreSQL", skip_all)]
    async fn get_user(&self, id: &UserId) -> Result<User, UserStoreError> {
        let row = self
            .fetch_row_by_id(id)
            .await?
            .ok_or(UserStoreError::UserNotFound)?;
        user_from_row(&row)
    }

    #[tracing::instrument(name = "Validating user credentials in PostgreSQL", skip_all)]
    async fn authenticate_user(
        &self,
        email: &Email,
        password: &Password,
    ) -> Result<User, UserStoreError> {
        let row = self.fetch_row(email).await?;

        // A missing row still pays for one hash verification so that the
        // response time does not reveal whether the account exists.
        let Some(row) = row else {
            let _ = verify_password_hash(
                Secret::from(DUMMY_PASSWORD_HASH.to_string()),
                password.clone(),
            )
            .await;
            return Err(UserStoreError::UserNotFound);
        };

        verify_password_hash(password_hash_from_row(&row)?, password.clone())
            .await
            .map_err(|_| UserStoreError::IncorrectPassword)?;

        user_from_row(&row)
    }

    #[tracing::instrument(name = "Verifying current password in PostgreSQL", skip_all)]
    async fn verify_password(
        &self,
        id: &UserId,
        password: &Password,
    ) -> Result<(), UserStoreError> {
        let row = self
            .fetch_row_by_id(id)
            .await?
            .ok_or(UserStoreError::UserNotFound)?;

        verify_password_hash(password_hash_from_row(&row)?, password.clone())
            .await
            .map_err(|_| UserStoreError::IncorrectPassword)
    }

    #[tracing::instrument(name = "Set new password", skip_all)]
    async fn set_new_password(
        &self,
        id: &UserId,
        new_password: Password,
    ) -> Result<(), UserStoreError> {
        let password_hash = compute_password_hash(new_password)
            .await
            .map_err(UserStoreError::UnexpectedError)?;

        let pool = &self.pool;
        let password_hash = &password_hash;
        let id = id.as_uuid();
        let result = retry_once(
            move || async move {
                sqlx::query(
                    r#"
                        UPDATE users
                        SET password_hash = $1
                        WHERE id = $2
                    "#,
                )
                .bind(password_hash.expose_secret())
                .bind(id)
                .execute(pool)
                .await
            },
            transient_sqlx,
        )
        .await
        .map_err(|e| UserStoreError::UnexpectedError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(UserStoreError::UserNotFound);
        }
        Ok(())
    }

    #[tracing::instrument(name = "Marking email verified in PostgreSQL", skip_all)]
    async fn set_email_verified(&self, id: &UserId, verified: bool) -> Result<(), UserStoreError> {
        let pool = &self.pool;
        let id = id.as_uuid();
        let result = retry_once(
            move || async move {
                sqlx::query(
                    r#"
                        UPDATE users
                        SET email_verified = $1
                        WHERE id = $2
                    "#,
                )
                .bind(verified)
                .bind(id)
                .execute(pool)
                .await
            },
            transient_sqlx,
        )
        .await
        .map_err(|e| UserStoreError::UnexpectedError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(UserStoreError::UserNotFound);
        }
        Ok(())
    }

    #[tracing::instrument(name = "Updating two-factor status in PostgreSQL", skip_all)]
    async fn set_two_factor(
        &self,
        id: &UserId,
        status: TwoFactorStatus,
    ) -> Result<(), UserStoreError> {
        let pool = &self.pool;
        let status = &status;
        let id = id.as_uuid();
        let result = retry_once(
            move || async move {
                sqlx::query(
                    r#"
                        UPDATE users
                        SET two_factor_secret = $1
                        WHERE id = $2
                    "#,
                )
                .bind(status.secret().map(|s| s.expose_secret().clone()))
                .bind(id)
                .execute(pool)
                .await
            },
            transient_sqlx,
        )
        .await
        .map_err(|e| UserStoreError::UnexpectedError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(UserStoreError::UserNotFound);
        }
        Ok(())
    }

    #[tracing::instrument(name = "Updating email in PostgreSQL", skip_all)]
    async fn update_email(&self, id: &UserId, email: Email) -> Result<(), UserStoreError> {
        let pool = &self.pool;
        let email = &email;
        let id = id.as_uuid();
        let result = retry_once(
            move || async move {
                sqlx::query(
                    r#"
                        UPDATE users
                        SET email = $1
                        WHERE id = $2
                    "#,
                )
                .bind(email.as_ref().expose_secret())
                .bind(id)
                .execute(pool)
                .await
            },
            transient_sqlx,
        )
        .await
        .map_err(map_write_error)?;

        if result.rows_affected() == 0 {
            return Err(UserStoreError::UserNotFound);
        }
        Ok(())
    }

    #[tracing::instrument(name = "Delete user from PostgreSQL", skip_all)]
    async fn delete_user(&self, id: &UserId) -> Result<(), UserStoreError> {
        let pool = &self.pool;
        let id = id.as_uuid();
        let result = retry_once(
            move || async move {
                sqlx::query(
                    r#"
                        DELETE FROM users
                        WHERE id = $1
                    "#,
                )
                .bind(id)
                .execute(pool)
                .await
            },
            transient_sqlx,
        )
        .await
        .map_err(|e| UserStoreError::UnexpectedError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(UserStoreError::UserNotFound);
        }
        Ok(())
    }
}
