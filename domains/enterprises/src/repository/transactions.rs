//! Transactional free functions for the Enterprises domain

use foodhub_common::{is_foreign_key_violation, Error};
use sqlx::{Sqlite, Transaction};
use uuid::Uuid;

/// Position after the last group.
pub async fn next_group_position_tx(
    transaction: &mut Transaction<'_, Sqlite>,
) -> std::result::Result<i64, sqlx::Error> {
    let max: Option<i64> = sqlx::query_scalar("SELECT MAX(position) FROM enterprise_groups")
        .fetch_one(&mut **transaction)
        .await?;
    Ok(max.map_or(0, |p| p + 1))
}

/// Replace a group's members with `enterprise_ids`, keeping their order.
///
/// Unknown enterprise ids are a validation error.
pub async fn replace_group_members_tx(
    transaction: &mut Transaction<'_, Sqlite>,
    group_id: Uuid,
    enterprise_ids: &[Uuid],
) -> std::result::Result<(), Error> {
    sqlx::query("DELETE FROM enterprise_group_members WHERE group_id = ?")
        .bind(group_id)
        .execute(&mut **transaction)
        .await?;

    for (position, enterprise_id) in enterprise_ids.iter().enumerate() {
        sqlx::query(
            "INSERT INTO enterprise_group_members (group_id, enterprise_id, position) VALUES (?, ?, ?)",
        )
        .bind(group_id)
        .bind(enterprise_id)
        .bind(position as i64)
        .execute(&mut **transaction)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                Error::Validation(format!("Enterprise {} does not exist", enterprise_id))
            } else {
                Error::Database(e)
            }
        })?;
    }
    Ok(())
}

/// Swap the positions of two groups.
pub async fn swap_group_positions_tx(
    transaction: &mut Transaction<'_, Sqlite>,
    (first_id, first_position): (Uuid, i64),
    (second_id, second_position): (Uuid, i64),
) -> std::result::Result<(), sqlx::Error> {
    let now = chrono::Utc::now();
    for (id, position) in [(first_id, second_position), (second_id, first_position)] {
        sqlx::query("UPDATE enterprise_groups SET position = ?, updated_at = ? WHERE id = ?")
            .bind(position)
            .bind(now)
            .bind(id)
            .execute(&mut **transaction)
            .await?;
    }
    Ok(())
}
