use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::MemberId;

/// Member - a platform user
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Member {
    pub id: MemberId,
    pub name: String,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Member {
    /// Find member by ID
    pub async fn find_by_id(id: MemberId, pool: &PgPool) -> Result<Option<Self>> {
        let member = sqlx::query_as::<_, Member>("SELECT * FROM members WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(member)
    }

    /// Create a new member
    pub async fn create(name: &str, avatar_url: Option<&str>, pool: &PgPool) -> Result<Self> {
        let member = sqlx::query_as::<_, Member>(
            r#"
            INSERT INTO members (id, name, avatar_url)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(MemberId::new())
        .bind(name)
        .bind(avatar_url)
        .fetch_one(pool)
        .await?;
        Ok(member)
    }
}
