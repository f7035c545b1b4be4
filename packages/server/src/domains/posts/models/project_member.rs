use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::common::{MemberId, PostId};

/// ProjectMember - a member contributing to a project post
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProjectMember {
    pub post_id: PostId,
    pub user_id: MemberId,
    pub created_at: DateTime<Utc>,
}

impl ProjectMember {
    /// Replace the member list for a project post.
    ///
    /// Replace semantics: members absent from the new list are removed,
    /// members already present are kept, the rest are inserted.
    pub async fn set_members(
        post_id: PostId,
        member_ids: &[MemberId],
        conn: &mut PgConnection,
    ) -> Result<()> {
        let uuids: Vec<Uuid> = member_ids.iter().map(|id| id.into_uuid()).collect();

        sqlx::query(
            r#"
            DELETE FROM project_members
            WHERE post_id = $1 AND user_id <> ALL($2::uuid[])
            "#,
        )
        .bind(post_id)
        .bind(&uuids)
        .execute(&mut *conn)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO project_members (post_id, user_id)
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

    /// IDs of the members on a project post
    pub async fn find_member_ids(post_id: PostId, pool: &PgPool) -> Result<Vec<MemberId>> {
        let ids = sqlx::query_scalar::<_, MemberId>(
            "SELECT user_id FROM project_members WHERE post_id = $1 ORDER BY created_at",
        )
        .bind(post_id)
        .fetch_all(pool)
        .await?;
        Ok(ids)
    }
}
