use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::{CommunityId, TagId};

/// CommunityTag - the availability of a tag within a community.
///
/// `updated_at` doubles as a recency signal: it is bumped whenever a new
/// post carries the tag, which surfaces recently active topics.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CommunityTag {
    pub community_id: CommunityId,
    pub tag_id: TagId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CommunityTag {
    /// Register a tag in a community (no-op if already present)
    pub async fn create(
        community_id: CommunityId,
        tag_id: TagId,
        pool: &PgPool,
    ) -> Result<Self> {
        let row = sqlx::query_as::<_, CommunityTag>(
            r#"
            INSERT INTO communities_tags (community_id, tag_id)
            VALUES ($1, $2)
            ON CONFLICT (community_id, tag_id) DO UPDATE SET tag_id = EXCLUDED.tag_id
            RETURNING *
            "#,
        )
        .bind(community_id)
        .bind(tag_id)
        .fetch_one(pool)
        .await?;
        Ok(row)
    }

    /// Find a single community/tag row
    pub async fn find(
        community_id: CommunityId,
        tag_id: TagId,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        let row = sqlx::query_as::<_, CommunityTag>(
            "SELECT * FROM communities_tags WHERE community_id = $1 AND tag_id = $2",
        )
        .bind(community_id)
        .bind(tag_id)
        .fetch_optional(pool)
        .await?;
        Ok(row)
    }

    /// Bump `updated_at` on every row carrying one of the given tags
    pub async fn touch_for_tags(tag_ids: &[TagId], pool: &PgPool) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE communities_tags SET updated_at = NOW() WHERE tag_id = ANY($1)",
        )
        .bind(tag_ids)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
