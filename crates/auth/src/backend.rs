//! Concrete authentication backend
//!
//! Wraps the SQLite pool + `AuthConfig` and owns auth-specific SQL queries.
//! Uses runtime `sqlx::query_as` consistent with the cross-domain read
//! model pattern.

use chrono::{DateTime, Utc};
use foodhub_common::{generate_token, token_digest, verify_password, DbPool};
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::context::AuthContext;
use crate::error::AuthError;
use crate::types::{AuthEnterprise, AuthIdentity};

/// Row type for session lookup
#[derive(sqlx::FromRow)]
struct SessionRow {
    id: Uuid,
    user_id: Uuid,
    expires_at: DateTime<Utc>,
}

/// Row type for credential lookup (includes password_hash for verification)
#[derive(sqlx::FromRow)]
struct CredentialRow {
    id: Uuid,
    password_hash: String,
}

/// A freshly issued session. The raw token only ever lives in the cookie.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub session_id: Uuid,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Concrete authentication backend.
///
/// Domain states expose this via `FromRef`:
/// ```ignore
/// impl FromRef<MyDomainState> for AuthBackend {
///     fn from_ref(state: &MyDomainState) -> Self {
///         state.auth.clone()
///     }
/// }
/// ```
#[derive(Clone)]
pub struct AuthBackend {
    pool: DbPool,
    config: AuthConfig,
}

impl AuthBackend {
    pub fn new(pool: DbPool, config: AuthConfig) -> Self {
        Self { pool, config }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Find user identity by ID (read model, lightweight subset of the account)
    pub(crate) async fn find_user(&self, id: Uuid) -> Result<Option<AuthIdentity>, AuthError> {
        let user: Option<AuthIdentity> = sqlx::query_as(
            r#"
            SELECT id, email, role, locale, enterprise_limit,
                   terms_of_service_accepted_at, created_at, updated_at
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, user_id = %id, "Failed to load user");
            AuthError::UserLoadError
        })?;

        Ok(user)
    }

    /// Enterprises the user owns, then those they manage, by name
    pub(crate) async fn find_enterprises(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<AuthEnterprise>, AuthError> {
        sqlx::query_as(
            r#"
            SELECT e.id AS enterprise_id, e.name AS name, 'owner' AS relation
            FROM enterprises e
            WHERE e.owner_id = ?1
            UNION ALL
            SELECT e.id AS enterprise_id, e.name AS name, 'manager' AS relation
            FROM enterprises e
            INNER JOIN enterprise_roles r ON r.enterprise_id = e.id
            WHERE r.user_id = ?1 AND e.owner_id <> ?1
            ORDER BY relation DESC, name ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, user_id = %user_id, "Failed to load enterprises");
            AuthError::EnterprisesLoadError
        })
    }

    /// Check an email/password pair and open a session for the account.
    ///
    /// Unknown emails and wrong passwords are indistinguishable to the caller.
    pub async fn login(&self, email: &str, password: &str) -> Result<IssuedSession, AuthError> {
        let row: Option<CredentialRow> =
            sqlx::query_as("SELECT id, password_hash FROM users WHERE email = ?")
                .bind(email.trim().to_lowercase())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!(error = %e, "Failed to look up credentials");
                    AuthError::UserLoadError
                })?;

        let row = match row {
            Some(row) if verify_password(password, &row.password_hash) => row,
            _ => {
                tracing::info!("Rejected login attempt");
                return Err(AuthError::InvalidCredentials);
            }
        };

        let issued = self.create_session(row.id).await?;
        tracing::info!(user_id = %row.id, session_id = %issued.session_id, "User logged in");
        Ok(issued)
    }

    /// Persist a new session for `user_id`, storing only the token digest.
    pub async fn create_session(&self, user_id: Uuid) -> Result<IssuedSession, AuthError> {
        let token = generate_token().map_err(|e| {
            tracing::error!(error = %e, "Failed to generate session token");
            AuthError::SessionCreateFailed
        })?;
        let now = Utc::now();
        let issued = IssuedSession {
            session_id: Uuid::new_v4(),
            token,
            expires_at: now + self.config.session_ttl,
        };

        sqlx::query(
            r#"
            INSERT INTO sessions (id, user_id, token_hash, created_at, expires_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(issued.session_id)
        .bind(user_id)
        .bind(token_digest(&issued.token))
        .bind(now)
        .bind(issued.expires_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, user_id = %user_id, "Failed to create session");
            AuthError::SessionCreateFailed
        })?;

        Ok(issued)
    }

    /// Delete the session behind `token`. Unknown tokens are ignored.
    pub async fn destroy_session(&self, token: &str) -> Result<(), AuthError> {
        let result = sqlx::query("DELETE FROM sessions WHERE token_hash = ?")
            .bind(token_digest(token))
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to delete session");
                AuthError::SessionLoadError
            })?;

        if result.rows_affected() > 0 {
            tracing::info!("Session destroyed");
        }
        Ok(())
    }

    /// Resolve a session token into an `AuthContext`.
    ///
    /// Returns `Ok(None)` for unknown or expired tokens.
    pub async fn authenticate_session(&self, token: &str) -> Result<Option<AuthContext>, AuthError> {
        let session: Option<SessionRow> =
            sqlx::query_as("SELECT id, user_id, expires_at FROM sessions WHERE token_hash = ?")
                .bind(token_digest(token))
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!(error = %e, "Failed to load session");
                    AuthError::SessionLoadError
                })?;

        let Some(session) = session else {
            return Ok(None);
        };

        if session.expires_at <= Utc::now() {
            // Best-effort cleanup; an expired session is treated as missing either way
            if let Err(e) = sqlx::query("DELETE FROM sessions WHERE id = ?")
                .bind(session.id)
                .execute(&self.pool)
                .await
            {
                tracing::warn!(error = %e, session_id = %session.id, "Failed to purge expired session");
            }
            return Ok(None);
        }

        let Some(user) = self.find_user(session.user_id).await? else {
            return Ok(None);
        };
        let enterprises = self.find_enterprises(user.id).await?;

        Ok(Some(AuthContext::new(user, enterprises, session.id)))
    }
}
