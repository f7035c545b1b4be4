use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::CommunityId;

/// Community - a named group entity that posts and tags are scoped to
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Community {
    pub id: CommunityId,
    pub name: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
}

impl Community {
    /// Find community by ID
    pub async fn find_by_id(id: CommunityId, pool: &PgPool) -> Result<Option<Self>> {
        let community = sqlx::query_as::<_, Community>("SELECT * FROM communities WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(community)
    }

    /// Find communities by ID list, ordered by name
    pub async fn find_by_ids(ids: &[CommunityId], pool: &PgPool) -> Result<Vec<Self>> {
        let communities = sqlx::query_as::<_, Community>(
            "SELECT * FROM communities WHERE id = ANY($1) ORDER BY name",
        )
        .bind(ids)
        .fetch_all(pool)
        .await?;
        Ok(communities)
    }

    /// Create a new community
    pub async fn create(name: &str, slug: &str, pool: &PgPool) -> Result<Self> {
        let community = sqlx::query_as::<_, Community>(
            r#"
            INSERT INTO communities (id, name, slug)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(CommunityId::new())
        .bind(name)
        .bind(slug)
        .fetch_one(pool)
        .await?;
        Ok(community)
    }
}
