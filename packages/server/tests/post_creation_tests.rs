//! Integration tests for post creation.
//!
//! Covers the transactional group: attribute defaults, community
//! attachment, follower computation, RSVP seeding, media ordering,
//! nested children, member lists, tags, and total rollback on failure.

mod common;

use crate::common::{create_test_community, create_test_member, unique_name, TestHarness};
use server_core::common::CommunityId;
use server_core::domains::posts::actions::{create_post, CreatePostError};
use server_core::domains::posts::data::{ChildRequestInput, CreatePostParams, DocInput};
use server_core::domains::posts::models::{EventInvitation, Follow, Media, Post, ProjectMember};
use server_core::domains::tag::models::Tag;
use test_context::test_context;

// =============================================================================
// Attributes
// =============================================================================

/// A bare creation request falls back to platform defaults.
#[test_context(TestHarness)]
#[tokio::test]
async fn create_post_applies_defaults(ctx: &TestHarness) {
    let pool = &ctx.db_pool;
    let deps = ctx.test_deps();
    let creator = create_test_member(pool, "Sam").await.unwrap();

    let post = create_post(creator, CreatePostParams::default(), &deps.deps)
        .await
        .unwrap();

    assert_eq!(post.post_type, "discussion");
    assert_eq!(post.description, "");
    assert!(post.active);
    assert_eq!(post.user_id, creator);

    let reloaded = Post::find_by_id(post.id, pool).await.unwrap().unwrap();
    assert_eq!(reloaded.id, post.id);
}

/// Unknown post types are rejected before anything is written.
#[test_context(TestHarness)]
#[tokio::test]
async fn create_post_rejects_unknown_type(ctx: &TestHarness) {
    let pool = &ctx.db_pool;
    let deps = ctx.test_deps();
    let creator = create_test_member(pool, "Sam").await.unwrap();

    let params = CreatePostParams::builder().post_type("poll").build();
    let err = create_post(creator, params, &deps.deps).await.unwrap_err();
    assert!(matches!(err, CreatePostError::Invalid(_)));

    let count =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM posts WHERE user_id = $1")
            .bind(creator)
            .fetch_one(pool)
            .await
            .unwrap();
    assert_eq!(count, 0);
}

// =============================================================================
// Followers
// =============================================================================

/// Creator plus mentioned members follow the post, deduplicated no
/// matter how often someone is mentioned.
#[test_context(TestHarness)]
#[tokio::test]
async fn creator_and_mentions_become_followers(ctx: &TestHarness) {
    let pool = &ctx.db_pool;
    let deps = ctx.test_deps();
    let creator = create_test_member(pool, "Sam").await.unwrap();
    let mentioned = create_test_member(pool, "Robin").await.unwrap();

    let description = format!(
        r#"hey <a data-member-id="{mentioned}">@robin</a>, also <a data-member-id="{mentioned}">@robin</a> again"#,
    );
    let params = CreatePostParams::builder().description(description).build();

    let post = create_post(creator, params, &deps.deps).await.unwrap();

    let mut followers = Follow::find_member_ids(post.id, pool).await.unwrap();
    followers.sort();
    let mut expected = vec![creator, mentioned];
    expected.sort();
    assert_eq!(followers, expected);
}

// =============================================================================
// RSVPs and member lists
// =============================================================================

/// Event posts seed exactly one RSVP: the creator's, answered yes.
#[test_context(TestHarness)]
#[tokio::test]
async fn event_post_seeds_creator_rsvp(ctx: &TestHarness) {
    let pool = &ctx.db_pool;
    let deps = ctx.test_deps();
    let creator = create_test_member(pool, "Sam").await.unwrap();

    let params = CreatePostParams::builder().post_type("event").build();
    let post = create_post(creator, params, &deps.deps).await.unwrap();

    let invitations = EventInvitation::find_for_event(post.id, pool).await.unwrap();
    assert_eq!(invitations.len(), 1);
    assert_eq!(invitations[0].user_id, creator);
    assert_eq!(invitations[0].response, "yes");
}

/// Non-event posts get no RSVP rows.
#[test_context(TestHarness)]
#[tokio::test]
async fn plain_post_gets_no_rsvp(ctx: &TestHarness) {
    let pool = &ctx.db_pool;
    let deps = ctx.test_deps();
    let creator = create_test_member(pool, "Sam").await.unwrap();

    let post = create_post(creator, CreatePostParams::default(), &deps.deps)
        .await
        .unwrap();

    let invitations = EventInvitation::find_for_event(post.id, pool).await.unwrap();
    assert!(invitations.is_empty());
}

/// Supplied invitees are invited as pending; the creator's yes survives.
#[test_context(TestHarness)]
#[tokio::test]
async fn event_invitees_start_pending_creator_stays_yes(ctx: &TestHarness) {
    let pool = &ctx.db_pool;
    let deps = ctx.test_deps();
    let creator = create_test_member(pool, "Sam").await.unwrap();
    let invitee = create_test_member(pool, "Robin").await.unwrap();

    let params = CreatePostParams::builder()
        .post_type("event")
        .event_invitee_ids(vec![invitee])
        .build();
    let post = create_post(creator, params, &deps.deps).await.unwrap();

    let invitations = EventInvitation::find_for_event(post.id, pool).await.unwrap();
    assert_eq!(invitations.len(), 2);

    let creator_row = invitations.iter().find(|i| i.user_id == creator).unwrap();
    assert_eq!(creator_row.response, "yes");

    let invitee_row = invitations.iter().find(|i| i.user_id == invitee).unwrap();
    assert_eq!(invitee_row.response, "pending");
    assert_eq!(invitee_row.inviter_id, creator);
}

/// The project member list is exactly what the caller supplied.
#[test_context(TestHarness)]
#[tokio::test]
async fn project_member_list_is_replaced(ctx: &TestHarness) {
    let pool = &ctx.db_pool;
    let deps = ctx.test_deps();
    let creator = create_test_member(pool, "Sam").await.unwrap();
    let m1 = create_test_member(pool, "Robin").await.unwrap();
    let m2 = create_test_member(pool, "Ash").await.unwrap();

    let params = CreatePostParams::builder()
        .post_type("project")
        .member_ids(vec![m1, m2])
        .build();
    let post = create_post(creator, params, &deps.deps).await.unwrap();

    let mut members = ProjectMember::find_member_ids(post.id, pool).await.unwrap();
    members.sort();
    let mut expected = vec![m1, m2];
    expected.sort();
    assert_eq!(members, expected);
}

// =============================================================================
// Communities
// =============================================================================

/// Community ids are deduplicated; the attachment set is exactly the
/// caller-supplied set.
#[test_context(TestHarness)]
#[tokio::test]
async fn communities_attached_deduplicated(ctx: &TestHarness) {
    let pool = &ctx.db_pool;
    let deps = ctx.test_deps();
    let creator = create_test_member(pool, "Sam").await.unwrap();
    let a = create_test_community(pool, "garden").await.unwrap();
    let b = create_test_community(pool, "kitchen").await.unwrap();

    let params = CreatePostParams::builder()
        .community_ids(vec![a, b, a])
        .build();
    let post = create_post(creator, params, &deps.deps).await.unwrap();

    let mut attached = post.community_ids(pool).await.unwrap();
    attached.sort();
    let mut expected = vec![a, b];
    expected.sort();
    assert_eq!(attached, expected);
}

/// A failing strict step aborts the whole creation: no post row, no
/// partial associations.
#[test_context(TestHarness)]
#[tokio::test]
async fn strict_failure_rolls_back_everything(ctx: &TestHarness) {
    let pool = &ctx.db_pool;
    let deps = ctx.test_deps();
    let creator = create_test_member(pool, "Sam").await.unwrap();

    // Never inserted, so community attachment violates its FK
    let missing = CommunityId::new();
    let params = CreatePostParams::builder()
        .community_ids(vec![missing])
        .description("doomed")
        .build();

    let err = create_post(creator, params, &deps.deps).await.unwrap_err();
    assert!(matches!(err, CreatePostError::Storage(_)));

    let posts =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM posts WHERE user_id = $1")
            .bind(creator)
            .fetch_one(pool)
            .await
            .unwrap();
    assert_eq!(posts, 0);

    let follows =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM follows WHERE user_id = $1")
            .bind(creator)
            .fetch_one(pool)
            .await
            .unwrap();
    assert_eq!(follows, 0);
}

// =============================================================================
// Media and children
// =============================================================================

/// Listed image urls become ordered media rows, positions from zero.
#[test_context(TestHarness)]
#[tokio::test]
async fn image_urls_become_ordered_media(ctx: &TestHarness) {
    let pool = &ctx.db_pool;
    let deps = ctx.test_deps();
    let creator = create_test_member(pool, "Sam").await.unwrap();

    let params = CreatePostParams::builder()
        .image_urls(vec!["https://img/u1".to_string(), "https://img/u2".to_string()])
        .build();
    let post = create_post(creator, params, &deps.deps).await.unwrap();

    let media = Media::find_for_post(post.id, pool).await.unwrap();
    assert_eq!(media.len(), 2);
    assert_eq!(media[0].position, 0);
    assert_eq!(media[0].url, "https://img/u1");
    assert_eq!(media[1].position, 1);
    assert_eq!(media[1].url, "https://img/u2");
    assert!(media.iter().all(|m| m.kind == "image"));
}

/// Legacy single-url fields and the list form both apply when both are
/// supplied.
#[test_context(TestHarness)]
#[tokio::test]
async fn legacy_and_list_media_forms_coexist(ctx: &TestHarness) {
    let pool = &ctx.db_pool;
    let deps = ctx.test_deps();
    let creator = create_test_member(pool, "Sam").await.unwrap();

    let params = CreatePostParams::builder()
        .image_url("https://img/legacy")
        .video_url("https://video/v")
        .image_urls(vec!["https://img/u1".to_string()])
        .build();
    let post = create_post(creator, params, &deps.deps).await.unwrap();

    let media = Media::find_for_post(post.id, pool).await.unwrap();
    let images: Vec<_> = media.iter().filter(|m| m.kind == "image").collect();
    let videos: Vec<_> = media.iter().filter(|m| m.kind == "video").collect();
    assert_eq!(images.len(), 2);
    assert_eq!(videos.len(), 1);
}

/// Docs are stored in the supplied order.
#[test_context(TestHarness)]
#[tokio::test]
async fn docs_preserve_supplied_order(ctx: &TestHarness) {
    let pool = &ctx.db_pool;
    let deps = ctx.test_deps();
    let creator = create_test_member(pool, "Sam").await.unwrap();

    let params = CreatePostParams::builder()
        .docs(vec![
            DocInput {
                url: "https://docs/first".to_string(),
                name: Some("First".to_string()),
            },
            DocInput {
                url: "https://docs/second".to_string(),
                name: Some("Second".to_string()),
            },
        ])
        .build();
    let post = create_post(creator, params, &deps.deps).await.unwrap();

    let media = Media::find_for_post(post.id, pool).await.unwrap();
    let docs: Vec<_> = media.iter().filter(|m| m.kind == "doc").collect();
    assert_eq!(docs.len(), 2);
    assert_eq!(docs[0].url, "https://docs/first");
    assert_eq!(docs[1].url, "https://docs/second");
}

/// Nested child requests land as request posts under the parent.
#[test_context(TestHarness)]
#[tokio::test]
async fn children_created_under_parent(ctx: &TestHarness) {
    let pool = &ctx.db_pool;
    let deps = ctx.test_deps();
    let creator = create_test_member(pool, "Sam").await.unwrap();

    let params = CreatePostParams::builder()
        .post_type("project")
        .children(vec![ChildRequestInput {
            title: "Need shovels".to_string(),
            description: Some("ten of them".to_string()),
        }])
        .build();
    let post = create_post(creator, params, &deps.deps).await.unwrap();

    let children = Post::find_children(post.id, pool).await.unwrap();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].post_type, "request");
    assert_eq!(children[0].user_id, creator);
    assert_eq!(children[0].title.as_deref(), Some("Need shovels"));
}

// =============================================================================
// Tags
// =============================================================================

/// Topic names resolve to tags; an existing tag of the same name is
/// reused rather than duplicated.
#[test_context(TestHarness)]
#[tokio::test]
async fn topic_names_reuse_existing_tags(ctx: &TestHarness) {
    let pool = &ctx.db_pool;
    let deps = ctx.test_deps();
    let creator = create_test_member(pool, "Sam").await.unwrap();
    let topic = unique_name("gardening");

    let first = create_post(
        creator,
        CreatePostParams::builder()
            .topic_names(vec![topic.clone()])
            .build(),
        &deps.deps,
    )
    .await
    .unwrap();

    let second = create_post(
        creator,
        CreatePostParams::builder()
            .topic_names(vec![topic.clone()])
            .build(),
        &deps.deps,
    )
    .await
    .unwrap();

    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tags WHERE name = $1")
        .bind(&topic)
        .fetch_one(pool)
        .await
        .unwrap();
    assert_eq!(count, 1);

    let tag = Tag::find_by_name(&topic, pool).await.unwrap().unwrap();
    assert_eq!(first.tag_ids(pool).await.unwrap(), vec![tag.id]);
    assert_eq!(second.tag_ids(pool).await.unwrap(), vec![tag.id]);
}
