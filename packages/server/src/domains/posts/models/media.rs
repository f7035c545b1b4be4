use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};

use crate::common::{MediaId, PostId};
use crate::domains::posts::data::DocInput;

/// Media kind enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Image,
    Video,
    File,
    Doc,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
            MediaKind::File => "file",
            MediaKind::Doc => "doc",
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for MediaKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "image" => Ok(MediaKind::Image),
            "video" => Ok(MediaKind::Video),
            "file" => Ok(MediaKind::File),
            "doc" => Ok(MediaKind::Doc),
            _ => Err(anyhow::anyhow!("Invalid media kind: {}", s)),
        }
    }
}

/// Media - an ordered attachment owned by exactly one post
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Media {
    pub id: MediaId,
    pub post_id: PostId,
    pub kind: String, // 'image', 'video', 'file', 'doc'
    pub url: String,
    pub name: Option<String>,
    pub position: i32,
    pub created_at: DateTime<Utc>,
}

impl Media {
    /// Attach one media item to a post
    pub async fn create_for_post(
        post_id: PostId,
        kind: MediaKind,
        url: &str,
        position: i32,
        conn: &mut PgConnection,
    ) -> Result<Self> {
        let media = sqlx::query_as::<_, Media>(
            r#"
            INSERT INTO media (id, post_id, kind, url, position)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(MediaId::new())
        .bind(post_id)
        .bind(kind.as_str())
        .bind(url)
        .bind(position)
        .fetch_one(&mut *conn)
        .await?;
        Ok(media)
    }

    /// Attach an external document to a post
    pub async fn create_doc(
        post_id: PostId,
        doc: &DocInput,
        position: i32,
        conn: &mut PgConnection,
    ) -> Result<Self> {
        let media = sqlx::query_as::<_, Media>(
            r#"
            INSERT INTO media (id, post_id, kind, url, name, position)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(MediaId::new())
        .bind(post_id)
        .bind(MediaKind::Doc.as_str())
        .bind(&doc.url)
        .bind(&doc.name)
        .bind(position)
        .fetch_one(&mut *conn)
        .await?;
        Ok(media)
    }

    /// Media attached to a post, grouped by kind then ordered by position
    pub async fn find_for_post(post_id: PostId, pool: &PgPool) -> Result<Vec<Self>> {
        let media = sqlx::query_as::<_, Media>(
            "SELECT * FROM media WHERE post_id = $1 ORDER BY kind, position",
        )
        .bind(post_id)
        .fetch_all(pool)
        .await?;
        Ok(media)
    }
}
