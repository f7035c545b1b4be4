//! Post-commit counter reconciliation.
//!
//! Bumps the denormalized "new content" counters derived from a freshly
//! committed post: community-tag recency timestamps, tag-follow
//! subscription counters, and community group membership counters.

use anyhow::Result;
use sqlx::PgPool;

use crate::domains::community::models::GroupMembership;
use crate::domains::posts::models::Post;
use crate::domains::tag::models::{CommunityTag, TagFollow};

/// Reconcile every counter derived from a new post.
///
/// Associations are re-read here rather than taken from the creation
/// flow: the strict group may have attached communities and tags after
/// any snapshot the caller could hold. The three updates are scoped to
/// exactly this post's (communities, tags) and exclude the creator; all
/// of them run even if one fails, and the first failure is returned.
pub async fn update_counters_for_post(post: &Post, pool: &PgPool) -> Result<()> {
    let community_ids = post.community_ids(pool).await?;
    let tag_ids = post.tag_ids(pool).await?;

    let (touched, tag_counts, group_counts) = tokio::join!(
        CommunityTag::touch_for_tags(&tag_ids, pool),
        TagFollow::increment_new_post_counts(&tag_ids, &community_ids, post.user_id, pool),
        GroupMembership::increment_new_post_counts(&community_ids, post.user_id, pool),
    );

    touched.and(tag_counts).and(group_counts).map(|_| ())
}
