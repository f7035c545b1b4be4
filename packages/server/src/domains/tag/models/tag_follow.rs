use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::{CommunityId, MemberId, TagFollowId, TagId};

/// TagFollow - a member's subscription to a tag within one community.
///
/// `new_post_count` counts qualifying posts published since the member
/// last caught up; it is bumped by post-creation fan-out and reset by the
/// reading flows (out of scope here).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TagFollow {
    pub id: TagFollowId,
    pub tag_id: TagId,
    pub community_id: CommunityId,
    pub user_id: MemberId,
    pub new_post_count: i32,
    pub created_at: DateTime<Utc>,
}

impl TagFollow {
    /// Subscribe a member to a tag within a community
    pub async fn create(
        user_id: MemberId,
        tag_id: TagId,
        community_id: CommunityId,
        pool: &PgPool,
    ) -> Result<Self> {
        let follow = sqlx::query_as::<_, TagFollow>(
            r#"
            INSERT INTO tag_follows (id, tag_id, community_id, user_id)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (tag_id, community_id, user_id) DO UPDATE
                SET user_id = EXCLUDED.user_id
            RETURNING *
            "#,
        )
        .bind(TagFollowId::new())
        .bind(tag_id)
        .bind(community_id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;
        Ok(follow)
    }

    /// Find a member's subscription for one (tag, community) pair
    pub async fn find(
        user_id: MemberId,
        tag_id: TagId,
        community_id: CommunityId,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        let follow = sqlx::query_as::<_, TagFollow>(
            r#"
            SELECT * FROM tag_follows
            WHERE user_id = $1 AND tag_id = $2 AND community_id = $3
            "#,
        )
        .bind(user_id)
        .bind(tag_id)
        .bind(community_id)
        .fetch_optional(pool)
        .await?;
        Ok(follow)
    }

    /// Bump `new_post_count` for every subscription matching one of the
    /// post's tags within one of the post's communities, excluding the
    /// post's own creator.
    ///
    /// Atomic increment, safe under concurrent post creations targeting
    /// the same subscription row.
    pub async fn increment_new_post_counts(
        tag_ids: &[TagId],
        community_ids: &[CommunityId],
        exclude_user: MemberId,
        pool: &PgPool,
    ) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE tag_follows
            SET new_post_count = new_post_count + 1
            WHERE tag_id = ANY($1)
              AND community_id = ANY($2)
              AND user_id <> $3
            "#,
        )
        .bind(tag_ids)
        .bind(community_ids)
        .bind(exclude_user)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
