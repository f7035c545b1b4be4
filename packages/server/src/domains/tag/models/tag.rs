use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};

use crate::common::{PostId, TagId};

/// How caller-supplied topic names resolve to tag rows.
///
/// The product has not settled whether "Gardening" and "gardening" are the
/// same topic, so resolution is a policy point rather than a hardcoded
/// behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagNamePolicy {
    /// Names are stored and matched exactly as supplied (trimmed).
    Exact,
    /// Names are lowercased before storage and matching.
    CaseInsensitive,
}

impl TagNamePolicy {
    /// Canonical form of a raw topic name under this policy.
    pub fn canonical(&self, raw: &str) -> String {
        let trimmed = raw.trim();
        match self {
            TagNamePolicy::Exact => trimmed.to_string(),
            TagNamePolicy::CaseInsensitive => trimmed.to_lowercase(),
        }
    }
}

impl std::str::FromStr for TagNamePolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "exact" => Ok(TagNamePolicy::Exact),
            "case_insensitive" => Ok(TagNamePolicy::CaseInsensitive),
            _ => Err(anyhow::anyhow!("Invalid tag name policy: {}", s)),
        }
    }
}

/// Tag - a named topic that posts attach to and members follow
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Tag {
    /// Resolve a topic name to a tag, creating it if needed.
    ///
    /// Idempotent per canonical name: a second call with the same name
    /// returns the existing row rather than duplicating it.
    pub async fn find_or_create(
        raw_name: &str,
        policy: TagNamePolicy,
        conn: &mut PgConnection,
    ) -> Result<Self> {
        let name = policy.canonical(raw_name);
        let tag = sqlx::query_as::<_, Tag>(
            r#"
            INSERT INTO tags (id, name)
            VALUES ($1, $2)
            ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
            RETURNING *
            "#,
        )
        .bind(TagId::new())
        .bind(&name)
        .fetch_one(&mut *conn)
        .await?;
        Ok(tag)
    }

    /// Find tag by exact stored name
    pub async fn find_by_name(name: &str, pool: &PgPool) -> Result<Option<Self>> {
        let tag = sqlx::query_as::<_, Tag>("SELECT * FROM tags WHERE name = $1")
            .bind(name)
            .fetch_optional(pool)
            .await?;
        Ok(tag)
    }

    /// Attach this tag to a post (no-op if already attached)
    pub async fn attach_to_post(&self, post_id: PostId, conn: &mut PgConnection) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO posts_tags (post_id, tag_id)
            VALUES ($1, $2)
            ON CONFLICT (post_id, tag_id) DO NOTHING
            "#,
        )
        .bind(post_id)
        .bind(self.id)
        .execute(&mut *conn)
        .await?;
        Ok(())
    }

    /// Tags attached to a post
    pub async fn find_for_post(post_id: PostId, pool: &PgPool) -> Result<Vec<Self>> {
        let tags = sqlx::query_as::<_, Tag>(
            r#"
            SELECT t.*
            FROM tags t
            INNER JOIN posts_tags pt ON pt.tag_id = t.id
            WHERE pt.post_id = $1
            ORDER BY t.name
            "#,
        )
        .bind(post_id)
        .fetch_all(pool)
        .await?;
        Ok(tags)
    }
}
