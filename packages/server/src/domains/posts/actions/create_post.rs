//! Post creation action
//!
//! Centralized logic for creating posts with all associated data
//! (communities, followers, media, RSVPs, tags) and for driving the
//! post-commit fan-out.
//!
//! Side effects fall into two groups. Strict effects run on the creation
//! transaction: the post row and its associations commit together or not
//! at all. Best-effort effects run after commit: counter reconciliation,
//! realtime push, and job enqueueing are logged on failure but never fail
//! the creation.

use std::str::FromStr;

use anyhow::{Context, Result};
use sqlx::PgConnection;
use tracing::{info, warn};

use crate::common::{CommunityId, MemberId};
use crate::domains::posts::data::{
    ChildRequestInput, CreatePostParams, DocInput, PostAttrs, PostType,
};
use crate::domains::posts::models::{
    EventInvitation, Follow, InvitationResponse, Media, MediaKind, Post, ProjectMember,
};
use crate::domains::tag::models::Tag;
use crate::kernel::mentions::extract_member_mentions;
use crate::kernel::ServerDeps;

use super::counters::update_counters_for_post;
use super::notify::{enqueue_post_jobs, push_new_post};

/// Errors surfaced to callers of `create_post`.
///
/// Anything that fails after the creation transaction commits is not an
/// error of the creation: it is logged and the post is still returned.
#[derive(Debug, thiserror::Error)]
pub enum CreatePostError {
    /// The supplied attributes cannot form a valid post; nothing was written.
    #[error("invalid post: {0}")]
    Invalid(String),
    /// A write in the creation transaction failed; everything rolled back.
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// Merge caller-supplied parameters over platform defaults into the
/// canonical attribute record. No side effects.
pub fn setup_post_attrs(
    user_id: MemberId,
    params: &CreatePostParams,
) -> Result<PostAttrs, CreatePostError> {
    if user_id.is_nil() {
        return Err(CreatePostError::Invalid("owner id is required".to_string()));
    }

    let post_type = match &params.post_type {
        Some(raw) => {
            PostType::from_str(raw).map_err(|e| CreatePostError::Invalid(e.to_string()))?
        }
        None => PostType::Discussion,
    };

    Ok(PostAttrs {
        user_id,
        post_type,
        title: params.title.clone(),
        description: params.description.clone().unwrap_or_default(),
        announcement: params.announcement,
        location: params.location.clone(),
        active: true,
    })
}

/// One strict-consistency side effect of a post creation.
///
/// The planner turns the raw params into an ordered list of these and the
/// apply loop runs them on the creation transaction. Order matters: later
/// effects may read associations written by earlier ones.
#[derive(Debug, Clone, PartialEq)]
pub enum StrictEffect {
    AttachCommunities(Vec<CommunityId>),
    AddFollowers(Vec<MemberId>),
    CreateHostRsvp,
    AttachMedia {
        kind: MediaKind,
        url: String,
        position: i32,
    },
    ApplyChildren(Vec<ChildRequestInput>),
    AttachDoc {
        doc: DocInput,
        position: i32,
    },
    SetProjectMembers(Vec<MemberId>),
    SetEventInvitees(Vec<MemberId>),
    AttachTopics(Vec<String>),
}

/// Plan the ordered strict effects implied by the creation parameters.
///
/// Pure: reads the inserted post and the raw params, writes nothing.
pub fn plan_strict_effects(post: &Post, params: &CreatePostParams) -> Vec<StrictEffect> {
    let mut effects = Vec::new();

    if !params.community_ids.is_empty() {
        let mut ids: Vec<CommunityId> = Vec::new();
        for id in &params.community_ids {
            if !ids.contains(id) {
                ids.push(*id);
            }
        }
        effects.push(StrictEffect::AttachCommunities(ids));
    }

    // Creator plus everyone mentioned in the description, deduplicated
    let mut follower_ids = vec![post.user_id];
    for id in extract_member_mentions(&post.description) {
        if !follower_ids.contains(&id) {
            follower_ids.push(id);
        }
    }
    effects.push(StrictEffect::AddFollowers(follower_ids));

    if post.is_event() {
        effects.push(StrictEffect::CreateHostRsvp);
    }

    // Legacy single-url fields and url lists are independent forms; both
    // apply when both are supplied.
    if let Some(url) = &params.image_url {
        effects.push(StrictEffect::AttachMedia {
            kind: MediaKind::Image,
            url: url.clone(),
            position: 0,
        });
    }
    if let Some(url) = &params.video_url {
        effects.push(StrictEffect::AttachMedia {
            kind: MediaKind::Video,
            url: url.clone(),
            position: 0,
        });
    }
    if let Some(urls) = &params.image_urls {
        for (position, url) in urls.iter().enumerate() {
            effects.push(StrictEffect::AttachMedia {
                kind: MediaKind::Image,
                url: url.clone(),
                position: position as i32,
            });
        }
    }
    if let Some(urls) = &params.file_urls {
        for (position, url) in urls.iter().enumerate() {
            effects.push(StrictEffect::AttachMedia {
                kind: MediaKind::File,
                url: url.clone(),
                position: position as i32,
            });
        }
    }

    if let Some(children) = &params.children {
        if !children.is_empty() {
            effects.push(StrictEffect::ApplyChildren(children.clone()));
        }
    }

    if let Some(docs) = &params.docs {
        for (position, doc) in docs.iter().enumerate() {
            effects.push(StrictEffect::AttachDoc {
                doc: doc.clone(),
                position: position as i32,
            });
        }
    }

    if let Some(ids) = &params.member_ids {
        effects.push(StrictEffect::SetProjectMembers(ids.clone()));
    }
    if let Some(ids) = &params.event_invitee_ids {
        effects.push(StrictEffect::SetEventInvitees(ids.clone()));
    }

    if !params.topic_names.is_empty() {
        effects.push(StrictEffect::AttachTopics(params.topic_names.clone()));
    }

    effects
}

/// Apply one strict effect on the creation transaction.
async fn apply_strict_effect(
    effect: &StrictEffect,
    post: &Post,
    deps: &ServerDeps,
    conn: &mut PgConnection,
) -> Result<()> {
    match effect {
        StrictEffect::AttachCommunities(ids) => post.attach_communities(ids, conn).await,
        StrictEffect::AddFollowers(ids) => Follow::add_all(post.id, ids, conn).await,
        StrictEffect::CreateHostRsvp => EventInvitation::create(
            post.id,
            post.user_id,
            post.user_id,
            InvitationResponse::Yes,
            conn,
        )
        .await
        .map(|_| ()),
        StrictEffect::AttachMedia {
            kind,
            url,
            position,
        } => Media::create_for_post(post.id, *kind, url, *position, conn)
            .await
            .map(|_| ()),
        StrictEffect::ApplyChildren(children) => {
            deps.child_requests.apply(post.id, children, conn).await
        }
        StrictEffect::AttachDoc { doc, position } => {
            Media::create_doc(post.id, doc, *position, conn).await.map(|_| ())
        }
        StrictEffect::SetProjectMembers(ids) => {
            ProjectMember::set_members(post.id, ids, conn).await
        }
        StrictEffect::SetEventInvitees(ids) => {
            EventInvitation::set_invitees(post.id, ids, post.user_id, conn).await
        }
        StrictEffect::AttachTopics(names) => {
            for name in names {
                let tag = Tag::find_or_create(name, deps.tag_name_policy, conn).await?;
                tag.attach_to_post(post.id, conn).await?;
            }
            Ok(())
        }
    }
}

/// Create a post and run its fan-out.
///
/// The returned post has every strict association in place. Best-effort
/// fan-out failures do not surface here; callers may see them in logs.
pub async fn create_post(
    user_id: MemberId,
    params: CreatePostParams,
    deps: &ServerDeps,
) -> Result<Post, CreatePostError> {
    let attrs = setup_post_attrs(user_id, &params)?;

    let mut tx = deps
        .db_pool
        .begin()
        .await
        .context("failed to open post creation transaction")?;

    let post = Post::create(&attrs, &mut *tx).await?;

    let effects = plan_strict_effects(&post, &params);
    for effect in &effects {
        apply_strict_effect(effect, &post, deps, &mut *tx).await?;
    }

    tx.commit()
        .await
        .context("failed to commit post creation")?;

    info!(post_id = %post.id, post_type = %post.post_type, "Post created");

    run_post_commit_fanout(&post, deps).await;

    Ok(post)
}

/// Best-effort fan-out after the creation transaction commits.
///
/// The three sub-steps are independent and run concurrently. Each one
/// re-reads the post's associations from the database; failures are
/// logged per sub-step and never roll back the creation.
pub async fn run_post_commit_fanout(post: &Post, deps: &ServerDeps) {
    let (counters, push, jobs) = tokio::join!(
        update_counters_for_post(post, &deps.db_pool),
        push_new_post(post, deps),
        enqueue_post_jobs(post, deps),
    );

    if let Err(error) = counters {
        warn!(post_id = %post.id, %error, "Counter update failed after post creation");
    }
    if let Err(error) = push {
        warn!(post_id = %post.id, %error, "Realtime push failed after post creation");
    }
    if let Err(error) = jobs {
        warn!(post_id = %post.id, %error, "Job enqueue failed after post creation");
    }
}
