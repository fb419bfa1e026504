//! Authorization context for authenticated users

use foodhub_common::Error;
use uuid::Uuid;

use crate::types::{AuthEnterprise, AuthIdentity, AuthRole, EnterpriseRelation};

/// Represents an authenticated session subject
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user: AuthIdentity,
    pub enterprises: Vec<AuthEnterprise>,
    pub session_id: Uuid,
}

impl AuthContext {
    pub fn new(user: AuthIdentity, enterprises: Vec<AuthEnterprise>, session_id: Uuid) -> Self {
        Self {
            user,
            enterprises,
            session_id,
        }
    }

    /// Check if the subject holds the system-wide admin role
    pub fn is_admin(&self) -> bool {
        self.user.role == AuthRole::Admin
    }

    /// Check if the subject owns the enterprise
    pub fn owns_enterprise(&self, enterprise_id: Uuid) -> bool {
        self.enterprises
            .iter()
            .any(|e| e.enterprise_id == enterprise_id && e.relation == EnterpriseRelation::Owner)
    }

    /// Owners, managers and admins may manage an enterprise
    pub fn can_manage_enterprise(&self, enterprise_id: Uuid) -> bool {
        self.is_admin()
            || self
                .enterprises
                .iter()
                .any(|e| e.enterprise_id == enterprise_id)
    }

    /// Enterprise ids the subject owns or manages
    pub fn managed_enterprise_ids(&self) -> Vec<Uuid> {
        self.enterprises.iter().map(|e| e.enterprise_id).collect()
    }

    pub fn owned_enterprise_count(&self) -> usize {
        self.enterprises
            .iter()
            .filter(|e| e.relation == EnterpriseRelation::Owner)
            .count()
    }

    /// Reject non-admins with an authorization error.
    ///
    /// Enterprise ownership never substitutes for the admin role.
    pub fn require_admin(&self) -> Result<(), Error> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(Error::Authorization(format!(
                "User {} is not an admin",
                self.user.id
            )))
        }
    }

    /// Reject subjects that cannot manage the enterprise.
    pub fn require_manage_enterprise(&self, enterprise_id: Uuid) -> Result<(), Error> {
        if self.can_manage_enterprise(enterprise_id) {
            Ok(())
        } else {
            Err(Error::Authorization(format!(
                "User {} cannot manage enterprise {}",
                self.user.id, enterprise_id
            )))
        }
    }
}
