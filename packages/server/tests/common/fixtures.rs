//! Test fixtures for creating test data.
//!
//! These fixtures use the model methods directly to create test data.
//! Names and slugs are uniquified because all tests share one database.

use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

use server_core::common::{CommunityId, GroupId, MemberId, TagFollowId, TagId};
use server_core::domains::community::models::{Community, Group, GroupMembership};
use server_core::domains::member::models::Member;
use server_core::domains::tag::models::{CommunityTag, Tag, TagFollow, TagNamePolicy};

/// Uniquify a name so tests sharing the database cannot collide.
pub fn unique_name(prefix: &str) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}-{}", prefix, &suffix[..8])
}

/// Create a test member
pub async fn create_test_member(pool: &PgPool, name: &str) -> Result<MemberId> {
    let member = Member::create(name, None, pool).await?;
    Ok(member.id)
}

/// Create a test community with a unique slug
pub async fn create_test_community(pool: &PgPool, name: &str) -> Result<CommunityId> {
    let community = Community::create(name, &unique_name(name), pool).await?;
    Ok(community.id)
}

/// Create a test tag with a unique name, returning (id, stored name)
pub async fn create_test_tag(pool: &PgPool, prefix: &str) -> Result<(TagId, String)> {
    let name = unique_name(prefix);
    let mut conn = pool.acquire().await?;
    let tag = Tag::find_or_create(&name, TagNamePolicy::Exact, &mut *conn).await?;
    Ok((tag.id, name))
}

/// Register a tag in a community
pub async fn create_test_community_tag(
    pool: &PgPool,
    community_id: CommunityId,
    tag_id: TagId,
) -> Result<()> {
    CommunityTag::create(community_id, tag_id, pool).await?;
    Ok(())
}

/// Subscribe a member to a tag within a community
pub async fn subscribe_to_tag(
    pool: &PgPool,
    user_id: MemberId,
    tag_id: TagId,
    community_id: CommunityId,
) -> Result<TagFollowId> {
    let follow = TagFollow::create(user_id, tag_id, community_id, pool).await?;
    Ok(follow.id)
}

/// Force a subscription's counter to a known starting value
pub async fn set_tag_follow_count(pool: &PgPool, follow_id: TagFollowId, count: i32) -> Result<()> {
    sqlx::query("UPDATE tag_follows SET new_post_count = $2 WHERE id = $1")
        .bind(follow_id)
        .bind(count)
        .execute(pool)
        .await?;
    Ok(())
}

/// Current counter value of a subscription
pub async fn tag_follow_count(pool: &PgPool, follow_id: TagFollowId) -> Result<i32> {
    let count =
        sqlx::query_scalar::<_, i32>("SELECT new_post_count FROM tag_follows WHERE id = $1")
            .bind(follow_id)
            .fetch_one(pool)
            .await?;
    Ok(count)
}

/// Create the group wrapping a community and add a member to it
pub async fn join_community_group(
    pool: &PgPool,
    community_id: CommunityId,
    user_id: MemberId,
) -> Result<GroupId> {
    let group = Group::for_community(community_id, pool).await?;
    GroupMembership::add(group.id, user_id, pool).await?;
    Ok(group.id)
}

/// Current group membership counter for one member
pub async fn group_membership_count(
    pool: &PgPool,
    group_id: GroupId,
    user_id: MemberId,
) -> Result<i32> {
    let count = sqlx::query_scalar::<_, i32>(
        "SELECT new_post_count FROM group_memberships WHERE group_id = $1 AND user_id = $2",
    )
    .bind(group_id)
    .bind(user_id)
    .fetch_one(pool)
    .await?;
    Ok(count)
}
