use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::common::{MemberId, PostId};

/// Follow - a member's subscription to updates on one post
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Follow {
    pub post_id: PostId,
    pub user_id: MemberId,
    pub added_at: DateTime<Utc>,
}

impl Follow {
    /// Add a set of followers to a post.
    ///
    /// Already-following members are left untouched, so the follower set
    /// stays deduplicated no matter how the input was assembled.
    pub async fn add_all(
        post_id: PostId,
        user_ids: &[MemberId],
        conn: &mut PgConnection,
    ) -> Result<()> {
        let uuids: Vec<Uuid> = user_ids.iter().map(|id| id.into_uuid()).collect();
        sqlx::query(
            r#"
            INSERT INTO follows (post_id, user_id)
            SELECT $1, unnest($2::uuid[])
            ON CONFLICT (post_id, user_id) DO NOTHING
            "#,
        )
        .bind(post_id)
        .bind(&uuids)
        .execute(&mut *conn)
        .await?;
        Ok(())
    }

    /// IDs of the members following a post
    pub async fn find_member_ids(post_id: PostId, pool: &PgPool) -> Result<Vec<MemberId>> {
        let ids = sqlx::query_scalar::<_, MemberId>(
            "SELECT user_id FROM follows WHERE post_id = $1 ORDER BY added_at",
        )
        .bind(post_id)
        .fetch_all(pool)
        .await?;
        Ok(ids)
    }
}
