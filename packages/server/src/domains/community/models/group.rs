use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::common::{CommunityId, GroupId, MemberId};

/// Group data type for membership containers
pub const GROUP_DATA_TYPE_COMMUNITY: &str = "community";

/// Group - a membership container wrapping an underlying entity
/// (currently only communities)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Group {
    pub id: GroupId,
    pub group_data_type: String,
    pub group_data_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Membership of a member in a group, carrying the unread-content counter
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct GroupMembership {
    pub id: Uuid,
    pub group_id: GroupId,
    pub user_id: MemberId,
    pub active: bool,
    pub new_post_count: i32,
    pub created_at: DateTime<Utc>,
}

impl Group {
    /// Find or create the group wrapping a community
    pub async fn for_community(community_id: CommunityId, pool: &PgPool) -> Result<Self> {
        let group = sqlx::query_as::<_, Group>(
            r#"
            INSERT INTO groups (id, group_data_type, group_data_id)
            VALUES ($1, $2, $3)
            ON CONFLICT (group_data_type, group_data_id) DO UPDATE
                SET group_data_type = EXCLUDED.group_data_type
            RETURNING *
            "#,
        )
        .bind(GroupId::new())
        .bind(GROUP_DATA_TYPE_COMMUNITY)
        .bind(community_id.into_uuid())
        .fetch_one(pool)
        .await?;
        Ok(group)
    }
}

impl GroupMembership {
    /// Add a member to a group
    pub async fn add(group_id: GroupId, user_id: MemberId, pool: &PgPool) -> Result<Self> {
        let membership = sqlx::query_as::<_, GroupMembership>(
            r#"
            INSERT INTO group_memberships (id, group_id, user_id, active)
            VALUES ($1, $2, $3, true)
            ON CONFLICT (group_id, user_id) DO UPDATE SET active = true
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(group_id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;
        Ok(membership)
    }

    /// Find a member's membership rows across all groups
    pub async fn find_for_member(user_id: MemberId, pool: &PgPool) -> Result<Vec<Self>> {
        let memberships = sqlx::query_as::<_, GroupMembership>(
            "SELECT * FROM group_memberships WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;
        Ok(memberships)
    }

    /// Bump `new_post_count` for every active membership of a
    /// community-type group wrapping one of the given communities,
    /// excluding the post's own creator.
    ///
    /// Atomic increment, safe under concurrent post creations.
    pub async fn increment_new_post_counts(
        community_ids: &[CommunityId],
        exclude_user: MemberId,
        pool: &PgPool,
    ) -> Result<u64> {
        let community_uuids: Vec<Uuid> =
            community_ids.iter().map(|id| id.into_uuid()).collect();
        let result = sqlx::query(
            r#"
            UPDATE group_memberships
            SET new_post_count = new_post_count + 1
            WHERE group_id IN (
                    SELECT id FROM groups
                    WHERE group_data_type = $1 AND group_data_id = ANY($2)
                )
              AND user_id <> $3
              AND active = true
            "#,
        )
        .bind(GROUP_DATA_TYPE_COMMUNITY)
        .bind(&community_uuids)
        .bind(exclude_user)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
