use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::common::{CommunityId, MemberId, PostId, TagId};
use crate::domains::posts::data::{ChildRequestInput, PostAttrs, PostType};

/// Post - a member-authored piece of content scoped to communities
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: PostId,
    pub user_id: MemberId,

    // Content
    pub post_type: String, // 'discussion', 'request', 'offer', 'project', 'event'
    pub title: Option<String>,
    pub description: String,
    pub announcement: bool,
    pub location: Option<String>,

    // Soft delete flag
    pub active: bool,

    // Set for nested child requests
    pub parent_post_id: Option<PostId>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Whether this post is an event (drives RSVP seeding)
    pub fn is_event(&self) -> bool {
        self.post_type == PostType::Event.as_str()
    }
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl Post {
    /// Find post by ID
    pub async fn find_by_id(id: PostId, pool: &PgPool) -> Result<Option<Self>> {
        let post = sqlx::query_as::<_, Post>("SELECT * FROM posts WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(post)
    }

    /// Insert a new post from canonical attributes.
    ///
    /// Runs on the creation transaction's connection so the insert rolls
    /// back together with any failed strict fan-out step.
    pub async fn create(attrs: &PostAttrs, conn: &mut PgConnection) -> Result<Self> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (
                id, user_id, post_type, title, description, announcement, location, active
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(PostId::new())
        .bind(attrs.user_id)
        .bind(attrs.post_type.as_str())
        .bind(&attrs.title)
        .bind(&attrs.description)
        .bind(attrs.announcement)
        .bind(&attrs.location)
        .bind(attrs.active)
        .fetch_one(&mut *conn)
        .await?;
        Ok(post)
    }

    /// Insert a child request post under a parent, owned by the parent's
    /// author.
    pub async fn create_child(
        parent_id: PostId,
        child: &ChildRequestInput,
        conn: &mut PgConnection,
    ) -> Result<Self> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (
                id, user_id, post_type, title, description, announcement, location, active,
                parent_post_id
            )
            SELECT $1, p.user_id, $2, $3, $4, false, NULL, true, p.id
            FROM posts p
            WHERE p.id = $5
            RETURNING *
            "#,
        )
        .bind(PostId::new())
        .bind(PostType::Request.as_str())
        .bind(&child.title)
        .bind(child.description.as_deref().unwrap_or_default())
        .bind(parent_id)
        .fetch_one(&mut *conn)
        .await?;
        Ok(post)
    }

    /// Child request posts under a parent, oldest first
    pub async fn find_children(parent_id: PostId, pool: &PgPool) -> Result<Vec<Self>> {
        let posts = sqlx::query_as::<_, Post>(
            "SELECT * FROM posts WHERE parent_post_id = $1 ORDER BY created_at",
        )
        .bind(parent_id)
        .fetch_all(pool)
        .await?;
        Ok(posts)
    }

    /// Attach the post to a list of communities (no-op per already
    /// attached pair)
    pub async fn attach_communities(
        &self,
        community_ids: &[CommunityId],
        conn: &mut PgConnection,
    ) -> Result<()> {
        let uuids: Vec<Uuid> = community_ids.iter().map(|id| id.into_uuid()).collect();
        sqlx::query(
            r#"
            INSERT INTO communities_posts (post_id, community_id)
            SELECT $1, unnest($2::uuid[])
            ON CONFLICT (post_id, community_id) DO NOTHING
            "#,
        )
        .bind(self.id)
        .bind(&uuids)
        .execute(&mut *conn)
        .await?;
        Ok(())
    }

    /// IDs of the communities this post is attached to
    pub async fn community_ids(&self, pool: &PgPool) -> Result<Vec<CommunityId>> {
        let ids = sqlx::query_scalar::<_, CommunityId>(
            "SELECT community_id FROM communities_posts WHERE post_id = $1",
        )
        .bind(self.id)
        .fetch_all(pool)
        .await?;
        Ok(ids)
    }

    /// IDs of the tags attached to this post
    pub async fn tag_ids(&self, pool: &PgPool) -> Result<Vec<TagId>> {
        let ids =
            sqlx::query_scalar::<_, TagId>("SELECT tag_id FROM posts_tags WHERE post_id = $1")
                .bind(self.id)
                .fetch_all(pool)
                .await?;
        Ok(ids)
    }
}
