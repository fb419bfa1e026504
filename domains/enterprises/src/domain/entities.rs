//! Domain entities for enterprises and enterprise groups

use chrono::{DateTime, Utc};
use foodhub_common::{Error, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who can find the enterprise's shopfront
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    #[default]
    Public,
    OnlyThroughLinks,
    Hidden,
}

/// What the enterprise sells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SellsMode {
    #[default]
    Unspecified,
    None,
    Own,
    Any,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::FromRow)]
pub struct Address {
    #[serde(default)]
    pub address1: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub zipcode: String,
    #[serde(default)]
    pub country: String,
}

/// Producer, hub or shop taking part in the marketplace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Enterprise {
    pub id: Uuid,
    pub name: String,
    pub owner_id: Uuid,
    pub visibility: Visibility,
    pub sells: SellsMode,
    pub is_primary_producer: bool,
    #[sqlx(flatten)]
    pub address: Address,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Enterprise {
    pub fn new(name: &str, owner_id: Uuid) -> Result<Self> {
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            name: validate_name(name)?,
            owner_id,
            visibility: Visibility::default(),
            sells: SellsMode::default(),
            is_primary_producer: false,
            address: Address::default(),
            created_at: now,
            updated_at: now,
        })
    }
}

/// Trimmed name, rejecting blanks
pub fn validate_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::Validation("Name can't be blank".to_string()));
    }
    if name.chars().count() > 255 {
        return Err(Error::Validation(
            "Name is too long (maximum is 255 characters)".to_string(),
        ));
    }
    Ok(name.to_string())
}

/// An owner may not exceed their enterprise limit.
pub fn check_enterprise_limit(owned: i64, limit: i64) -> Result<()> {
    if owned >= limit {
        return Err(Error::Conflict(format!(
            "You are not permitted to own more than {} enterprises",
            limit
        )));
    }
    Ok(())
}

/// User granted management rights on an enterprise
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Manager {
    pub user_id: Uuid,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Curated, ordered collection of enterprises
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct EnterpriseGroup {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub on_front_page: bool,
    pub position: i64,
    pub owner_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EnterpriseGroup {
    /// Position is assigned on insert
    pub fn new(
        name: &str,
        description: Option<String>,
        on_front_page: bool,
        owner_id: Option<Uuid>,
    ) -> Result<Self> {
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            name: validate_name(name)?,
            description: description.unwrap_or_default(),
            on_front_page,
            position: 0,
            owner_id,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Enterprise listed in a group, in group order
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct GroupMember {
    pub enterprise_id: Uuid,
    pub name: String,
    pub position: i64,
}

/// Group with its ordered members
#[derive(Debug, Clone, Serialize)]
pub struct EnterpriseGroupDetail {
    #[serde(flatten)]
    pub group: EnterpriseGroup,
    pub enterprises: Vec<GroupMember>,
}

/// Direction for reordering groups
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

/// Keep the first occurrence of each id, in order.
pub fn dedup_ids(ids: &[Uuid]) -> Vec<Uuid> {
    let mut seen = std::collections::HashSet::new();
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}
