//! Domain entities for accounts
//!
//! The password hash is never part of `User`; it only travels through
//! `NewUser` on creation and the auth backend on login.

use chrono::{DateTime, Utc};
use foodhub_common::{hash_password, Error, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::ValidateEmail;

/// Minimum accepted password length
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// System-wide role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    #[default]
    User,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Admin => write!(f, "admin"),
            UserRole::User => write!(f, "user"),
        }
    }
}

/// Back-office account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub role: UserRole,
    pub locale: Option<String>,
    pub enterprise_limit: i64,
    pub terms_of_service_accepted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated account ready to be inserted
#[derive(Debug, Clone)]
pub struct NewUser {
    pub user: User,
    pub password_hash: String,
}

impl NewUser {
    pub fn new(
        email: &str,
        password: &str,
        role: UserRole,
        enterprise_limit: i64,
    ) -> Result<Self> {
        let email = normalize_email(email);
        let mut errors = Vec::new();

        if !email.validate_email() {
            errors.push("Email is invalid".to_string());
        }
        if let Err(Error::Validation(msg)) = validate_password(password) {
            errors.push(msg);
        }
        if let Err(Error::Validation(msg)) = validate_enterprise_limit(enterprise_limit) {
            errors.push(msg);
        }
        if !errors.is_empty() {
            return Err(Error::Validation(errors.join("; ")));
        }

        let now = Utc::now();
        Ok(Self {
            user: User {
                id: Uuid::new_v4(),
                email,
                role,
                locale: None,
                enterprise_limit,
                terms_of_service_accepted_at: None,
                created_at: now,
                updated_at: now,
            },
            password_hash: hash_password(password)?,
        })
    }
}

/// Emails are matched case-insensitively
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn validate_password(password: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(Error::Validation(format!(
            "Password is too short (minimum is {} characters)",
            MIN_PASSWORD_LENGTH
        )));
    }
    Ok(())
}

pub fn validate_enterprise_limit(limit: i64) -> Result<()> {
    if limit < 0 {
        return Err(Error::Validation(
            "Enterprise limit must be greater than or equal to 0".to_string(),
        ));
    }
    Ok(())
}
