//! Session subject views
//!
//! Lightweight views of the rows owned by the accounts and enterprises
//! domains. These types carry only the fields needed for authentication
//! and authorization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lightweight identity for the session subject.
///
/// Handlers needing the full account should load it from the accounts
/// repository.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AuthIdentity {
    pub id: Uuid,
    pub email: String,
    pub role: AuthRole,
    pub locale: Option<String>,
    pub enterprise_limit: i64,
    pub terms_of_service_accepted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// System-wide role
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AuthRole {
    Admin,
    User,
}

impl std::fmt::Display for AuthRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthRole::Admin => write!(f, "admin"),
            AuthRole::User => write!(f, "user"),
        }
    }
}

/// How the session subject is attached to an enterprise
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EnterpriseRelation {
    Owner,
    Manager,
}

/// Enterprise the session subject owns or manages
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AuthEnterprise {
    pub enterprise_id: Uuid,
    pub name: String,
    pub relation: EnterpriseRelation,
}
