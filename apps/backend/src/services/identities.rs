//! Identity lookup for login and signup.
//!
//! The token layer only needs "this email/password pair belongs to subject
//! X". Real user storage lives outside this service; `InMemoryIdentities`
//! is the store shipped with the binary and used by tests.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::auth::password::{hash_password, verify_password};
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::logging::pii::Redacted;

/// A verified identity, ready to be turned into a session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub subject_id: String,
    pub email: String,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create an identity; fails with `EMAIL_TAKEN` if the email exists.
    async fn register(&self, email: &str, password: &str) -> Result<Identity, AppError>;

    /// Check credentials. Unknown email and wrong password both yield
    /// `AppError::InvalidLogin`.
    async fn authenticate(&self, email: &str, password: &str) -> Result<Identity, AppError>;
}

/// Lowercase and trim an email, rejecting values that are clearly not one.
pub fn normalize_email(raw: &str) -> Result<String, AppError> {
    let email = raw.trim().to_lowercase();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };

    if valid {
        Ok(email)
    } else {
        Err(AppError::bad_request(
            ErrorCode::InvalidEmail,
            "Email address is invalid",
        ))
    }
}

#[derive(Debug, Clone)]
struct StoredIdentity {
    subject_id: String,
    password_hash: String,
}

#[derive(Debug, Default)]
pub struct InMemoryIdentities {
    by_email: RwLock<HashMap<String, StoredIdentity>>,
}

impl InMemoryIdentities {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.by_email.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_email.read().is_empty()
    }
}

async fn blocking<T, F>(f: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::internal(format!("password task failed: {e}")))?
}

#[async_trait]
impl IdentityProvider for InMemoryIdentities {
    async fn register(&self, email: &str, password: &str) -> Result<Identity, AppError> {
        let email = normalize_email(email)?;
        if password.is_empty() {
            return Err(AppError::bad_request(
                ErrorCode::BadRequest,
                "Password cannot be empty",
            ));
        }

        if self.by_email.read().contains_key(&email) {
            return Err(AppError::conflict(
                ErrorCode::EmailTaken,
                "User already registered",
            ));
        }

        let password = password.to_string();
        let password_hash = blocking(move || hash_password(&password)).await?;
        let subject_id = Uuid::new_v4().to_string();

        // Re-check under the write lock; another signup may have won the race.
        let mut by_email = self.by_email.write();
        if by_email.contains_key(&email) {
            return Err(AppError::conflict(
                ErrorCode::EmailTaken,
                "User already registered",
            ));
        }
        by_email.insert(
            email.clone(),
            StoredIdentity {
                subject_id: subject_id.clone(),
                password_hash,
            },
        );
        drop(by_email);

        info!(subject_id = %subject_id, email = %Redacted(&email), "Identity registered");

        Ok(Identity { subject_id, email })
    }

    async fn authenticate(&self, email: &str, password: &str) -> Result<Identity, AppError> {
        let email = normalize_email(email).map_err(|_| AppError::invalid_login())?;
        let stored = self
            .by_email
            .read()
            .get(&email)
            .cloned()
            .ok_or_else(AppError::invalid_login)?;

        let password = password.to_string();
        let hash = stored.password_hash.clone();
        let matches = blocking(move || verify_password(&password, &hash)).await?;

        if matches {
            Ok(Identity {
                subject_id: stored.subject_id,
                email,
            })
        } else {
            Err(AppError::invalid_login())
        }
    }
}
