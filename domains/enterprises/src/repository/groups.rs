//! Enterprise group repository

use chrono::Utc;
use foodhub_common::{is_unique_violation, DbPool, Error, Result};
use uuid::Uuid;

use super::transactions::{
    next_group_position_tx, replace_group_members_tx, swap_group_positions_tx,
};
use crate::domain::entities::{EnterpriseGroup, EnterpriseGroupDetail, GroupMember, MoveDirection};

const GROUP_COLUMNS: &str =
    "id, name, description, on_front_page, position, owner_id, created_at, updated_at";

fn map_name_conflict(e: sqlx::Error) -> Error {
    if is_unique_violation(&e) {
        Error::Conflict("Name has already been taken".to_string())
    } else {
        Error::Database(e)
    }
}

#[derive(Clone)]
pub struct EnterpriseGroupRepository {
    pool: DbPool,
}

impl EnterpriseGroupRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Insert a group at the end of the list together with its members
    pub async fn create(
        &self,
        group: &EnterpriseGroup,
        enterprise_ids: &[Uuid],
    ) -> Result<EnterpriseGroupDetail> {
        let mut transaction = self.pool.begin().await?;
        let position = next_group_position_tx(&mut transaction).await?;

        sqlx::query(
            r#"
            INSERT INTO enterprise_groups (id, name, description, on_front_page, position,
                                           owner_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(group.id)
        .bind(&group.name)
        .bind(&group.description)
        .bind(group.on_front_page)
        .bind(position)
        .bind(group.owner_id)
        .bind(group.created_at)
        .bind(group.updated_at)
        .execute(&mut *transaction)
        .await
        .map_err(map_name_conflict)?;

        replace_group_members_tx(&mut transaction, group.id, enterprise_ids).await?;
        transaction.commit().await?;

        self.get_detail(group.id)
            .await?
            .ok_or_else(|| Error::Internal("Created group vanished".to_string()))
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<EnterpriseGroup>> {
        let group = sqlx::query_as(&format!(
            "SELECT {} FROM enterprise_groups WHERE id = ?",
            GROUP_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(group)
    }

    /// Group with its members in order
    pub async fn get_detail(&self, id: Uuid) -> Result<Option<EnterpriseGroupDetail>> {
        let Some(group) = self.get_by_id(id).await? else {
            return Ok(None);
        };
        let enterprises = self.members(id).await?;
        Ok(Some(EnterpriseGroupDetail { group, enterprises }))
    }

    pub async fn members(&self, group_id: Uuid) -> Result<Vec<GroupMember>> {
        let members = sqlx::query_as(
            r#"
            SELECT m.enterprise_id, e.name, m.position
            FROM enterprise_group_members m
            INNER JOIN enterprises e ON e.id = m.enterprise_id
            WHERE m.group_id = ?
            ORDER BY m.position ASC
            "#,
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(members)
    }

    /// All groups by position; `owner_id` narrows to one owner's groups
    pub async fn list(&self, owner_id: Option<Uuid>) -> Result<Vec<EnterpriseGroup>> {
        let groups = match owner_id {
            Some(owner_id) => {
                sqlx::query_as(&format!(
                    "SELECT {} FROM enterprise_groups WHERE owner_id = ? ORDER BY position ASC",
                    GROUP_COLUMNS
                ))
                .bind(owner_id)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as(&format!(
                    "SELECT {} FROM enterprise_groups ORDER BY position ASC",
                    GROUP_COLUMNS
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(groups)
    }

    /// Persist attributes and, when given, replace the member list
    pub async fn update(
        &self,
        group: &EnterpriseGroup,
        enterprise_ids: Option<&[Uuid]>,
    ) -> Result<EnterpriseGroupDetail> {
        let mut transaction = self.pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE enterprise_groups
            SET name = ?, description = ?, on_front_page = ?, owner_id = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&group.name)
        .bind(&group.description)
        .bind(group.on_front_page)
        .bind(group.owner_id)
        .bind(Utc::now())
        .bind(group.id)
        .execute(&mut *transaction)
        .await
        .map_err(map_name_conflict)?;

        if let Some(ids) = enterprise_ids {
            replace_group_members_tx(&mut transaction, group.id, ids).await?;
        }
        transaction.commit().await?;

        self.get_detail(group.id)
            .await?
            .ok_or_else(|| Error::NotFound("Enterprise group not found".to_string()))
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM enterprise_groups WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Swap the group with its neighbour. Returns false at either end.
    pub async fn move_group(&self, id: Uuid, direction: MoveDirection) -> Result<bool> {
        let mut transaction = self.pool.begin().await?;

        let position: Option<i64> =
            sqlx::query_scalar("SELECT position FROM enterprise_groups WHERE id = ?")
                .bind(id)
                .fetch_optional(&mut *transaction)
                .await?;
        let position =
            position.ok_or_else(|| Error::NotFound("Enterprise group not found".to_string()))?;

        let neighbour_sql = match direction {
            MoveDirection::Up => {
                "SELECT id, position FROM enterprise_groups WHERE position < ? \
                 ORDER BY position DESC LIMIT 1"
            }
            MoveDirection::Down => {
                "SELECT id, position FROM enterprise_groups WHERE position > ? \
                 ORDER BY position ASC LIMIT 1"
            }
        };
        let neighbour: Option<(Uuid, i64)> = sqlx::query_as(neighbour_sql)
            .bind(position)
            .fetch_optional(&mut *transaction)
            .await?;

        let Some(neighbour) = neighbour else {
            return Ok(false);
        };

        swap_group_positions_tx(&mut transaction, (id, position), neighbour).await?;
        transaction.commit().await?;
        Ok(true)
    }
}
