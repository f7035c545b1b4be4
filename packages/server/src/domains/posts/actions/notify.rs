//! Realtime push and async job enqueueing for freshly created posts.

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::common::{CommunityId, MemberId, PostId};
use crate::domains::community::models::Community;
use crate::domains::member::models::Member;
use crate::domains::posts::models::Post;
use crate::kernel::job_queue::EnqueueOptions;
use crate::kernel::ServerDeps;

/// Job type for building activity records off a new post
pub const JOB_CREATE_ACTIVITIES: &str = "post.create_activities";
/// Job type for announcing a new post on the external channel
pub const JOB_NOTIFY_EXTERNAL: &str = "post.notify_external";

/// Realtime topic for one community's channel
pub fn community_room(community_id: CommunityId) -> String {
    format!("community:{}", community_id)
}

/// Author fields safe for broad distribution
#[derive(Debug, Clone, Serialize)]
pub struct AuthorStub {
    pub id: MemberId,
    pub name: String,
    pub avatar_url: Option<String>,
}

/// Community fields safe for broad distribution
#[derive(Debug, Clone, Serialize)]
pub struct CommunityStub {
    pub id: CommunityId,
    pub name: String,
    pub slug: String,
}

/// The "new post" payload pushed to community channels.
///
/// This object is released to many members, so it cannot carry anything
/// that the usual per-viewer permission checks would filter. In
/// particular the `communities` list is narrowed per channel before
/// sending (see `narrowed_payloads`).
#[derive(Debug, Clone, Serialize)]
pub struct NewPostPayload {
    pub id: PostId,
    pub post_type: String,
    pub title: Option<String>,
    pub description: String,
    pub announcement: bool,
    pub created_at: DateTime<Utc>,
    pub user: AuthorStub,
    pub communities: Vec<CommunityStub>,
}

/// One copy of the payload per attached community, each narrowed to that
/// single community.
///
/// Subscribers of one community's channel must not learn which other
/// communities the post was shared to.
pub fn narrowed_payloads(payload: &NewPostPayload) -> Vec<(String, NewPostPayload)> {
    payload
        .communities
        .iter()
        .map(|community| {
            let mut narrowed = payload.clone();
            narrowed.communities = vec![community.clone()];
            (community_room(community.id), narrowed)
        })
        .collect()
}

/// Push the "new post" event to every attached community's channel.
///
/// Associations are re-read after commit; delivery is fire-and-forget.
pub async fn push_new_post(post: &Post, deps: &ServerDeps) -> Result<()> {
    let pool = &deps.db_pool;

    let community_ids = post.community_ids(pool).await?;
    let communities = Community::find_by_ids(&community_ids, pool).await?;
    let author = Member::find_by_id(post.user_id, pool)
        .await?
        .ok_or_else(|| anyhow!("post author {} not found", post.user_id))?;

    let payload = NewPostPayload {
        id: post.id,
        post_type: post.post_type.clone(),
        title: post.title.clone(),
        description: post.description.clone(),
        announcement: post.announcement,
        created_at: post.created_at,
        user: AuthorStub {
            id: author.id,
            name: author.name,
            avatar_url: author.avatar_url,
        },
        communities: communities
            .into_iter()
            .map(|c| CommunityStub {
                id: c.id,
                name: c.name,
                slug: c.slug,
            })
            .collect(),
    };

    for (room, narrowed) in narrowed_payloads(&payload) {
        deps.stream_hub
            .publish(&room, "new_post", serde_json::to_value(&narrowed)?)
            .await;
    }

    Ok(())
}

/// Enqueue the two async jobs derived from a new post.
///
/// Jobs are keyed by post id with idempotency keys, so a retried fan-out
/// cannot double-enqueue. Both enqueues are attempted even if the first
/// fails; the first failure is returned.
pub async fn enqueue_post_jobs(post: &Post, deps: &ServerDeps) -> Result<()> {
    let mut first_error = None;

    for job_type in [JOB_CREATE_ACTIVITIES, JOB_NOTIFY_EXTERNAL] {
        let result = deps
            .job_queue
            .enqueue(
                job_type,
                serde_json::json!({ "post_id": post.id }),
                EnqueueOptions {
                    idempotency_key: Some(format!("{}:{}", job_type, post.id)),
                    reference_id: Some(post.id.into_uuid()),
                    max_retries: 3,
                    ..Default::default()
                },
            )
            .await;

        if let Err(error) = result {
            first_error.get_or_insert(error);
        }
    }

    match first_error {
        Some(error) => Err(error),
        None => Ok(()),
    }
}
