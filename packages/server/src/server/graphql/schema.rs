//! GraphQL schema definition.

use chrono::{DateTime, Utc};
use juniper::{
    EmptySubscription, FieldError, FieldResult, GraphQLInputObject, RootNode, Value,
};

use super::context::GraphQLContext;
use crate::common::{CommunityId, MemberId, PostId};
use crate::domains::community::models::Community;
use crate::domains::posts::actions as post_actions;
use crate::domains::posts::data::{ChildRequestInput, CreatePostParams, DocInput};
use crate::domains::posts::models::{Follow, Media, Post};

// =============================================================================
// Output types
// =============================================================================

/// Post as exposed over GraphQL
pub struct PostData {
    post: Post,
}

impl From<Post> for PostData {
    fn from(post: Post) -> Self {
        Self { post }
    }
}

#[juniper::graphql_object(context = GraphQLContext)]
impl PostData {
    fn id(&self) -> String {
        self.post.id.to_string()
    }

    fn post_type(&self) -> &str {
        &self.post.post_type
    }

    fn title(&self) -> Option<&str> {
        self.post.title.as_deref()
    }

    fn description(&self) -> &str {
        &self.post.description
    }

    fn announcement(&self) -> bool {
        self.post.announcement
    }

    fn location(&self) -> Option<&str> {
        self.post.location.as_deref()
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.post.created_at
    }

    async fn communities(&self, ctx: &GraphQLContext) -> FieldResult<Vec<CommunityData>> {
        let ids = self.post.community_ids(&ctx.deps.db_pool).await?;
        let communities = Community::find_by_ids(&ids, &ctx.deps.db_pool).await?;
        Ok(communities.into_iter().map(CommunityData::from).collect())
    }

    async fn follower_ids(&self, ctx: &GraphQLContext) -> FieldResult<Vec<String>> {
        let ids = Follow::find_member_ids(self.post.id, &ctx.deps.db_pool).await?;
        Ok(ids.into_iter().map(|id| id.to_string()).collect())
    }

    async fn media(&self, ctx: &GraphQLContext) -> FieldResult<Vec<MediaData>> {
        let media = Media::find_for_post(self.post.id, &ctx.deps.db_pool).await?;
        Ok(media.into_iter().map(MediaData::from).collect())
    }
}

/// Community as exposed over GraphQL
pub struct CommunityData {
    community: Community,
}

impl From<Community> for CommunityData {
    fn from(community: Community) -> Self {
        Self { community }
    }
}

#[juniper::graphql_object(context = GraphQLContext)]
impl CommunityData {
    fn id(&self) -> String {
        self.community.id.to_string()
    }

    fn name(&self) -> &str {
        &self.community.name
    }

    fn slug(&self) -> &str {
        &self.community.slug
    }
}

/// Media attachment as exposed over GraphQL
pub struct MediaData {
    media: Media,
}

impl From<Media> for MediaData {
    fn from(media: Media) -> Self {
        Self { media }
    }
}

#[juniper::graphql_object(context = GraphQLContext)]
impl MediaData {
    fn id(&self) -> String {
        self.media.id.to_string()
    }

    fn kind(&self) -> &str {
        &self.media.kind
    }

    fn url(&self) -> &str {
        &self.media.url
    }

    fn name(&self) -> Option<&str> {
        self.media.name.as_deref()
    }

    fn position(&self) -> i32 {
        self.media.position
    }
}

// =============================================================================
// Input types
// =============================================================================

#[derive(GraphQLInputObject)]
pub struct DocInputData {
    pub url: String,
    pub name: Option<String>,
}

#[derive(GraphQLInputObject)]
pub struct ChildRequestInputData {
    pub title: String,
    pub description: Option<String>,
}

#[derive(GraphQLInputObject)]
pub struct CreatePostInput {
    pub post_type: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub announcement: Option<bool>,
    pub location: Option<String>,
    pub community_ids: Option<Vec<String>>,
    pub topic_names: Option<Vec<String>>,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub image_urls: Option<Vec<String>>,
    pub file_urls: Option<Vec<String>>,
    pub docs: Option<Vec<DocInputData>>,
    pub member_ids: Option<Vec<String>>,
    pub event_invitee_ids: Option<Vec<String>>,
    pub children: Option<Vec<ChildRequestInputData>>,
}

fn parse_ids<T, V>(raw: &[String]) -> FieldResult<Vec<crate::common::Id<T, V>>> {
    raw.iter()
        .map(|s| {
            crate::common::Id::parse(s)
                .map_err(|_| FieldError::new(format!("Invalid id: {}", s), Value::null()))
        })
        .collect()
}

impl CreatePostInput {
    fn into_params(self) -> FieldResult<CreatePostParams> {
        let community_ids: Vec<CommunityId> = match &self.community_ids {
            Some(raw) => parse_ids(raw)?,
            None => Vec::new(),
        };
        let member_ids: Option<Vec<MemberId>> = match &self.member_ids {
            Some(raw) => Some(parse_ids(raw)?),
            None => None,
        };
        let event_invitee_ids: Option<Vec<MemberId>> = match &self.event_invitee_ids {
            Some(raw) => Some(parse_ids(raw)?),
            None => None,
        };

        Ok(CreatePostParams {
            post_type: self.post_type,
            title: self.title,
            description: self.description,
            announcement: self.announcement.unwrap_or(false),
            location: self.location,
            community_ids,
            topic_names: self.topic_names.unwrap_or_default(),
            image_url: self.image_url,
            video_url: self.video_url,
            image_urls: self.image_urls,
            file_urls: self.file_urls,
            docs: self.docs.map(|docs| {
                docs.into_iter()
                    .map(|d| DocInput {
                        url: d.url,
                        name: d.name,
                    })
                    .collect()
            }),
            member_ids,
            event_invitee_ids,
            children: self.children.map(|children| {
                children
                    .into_iter()
                    .map(|c| ChildRequestInput {
                        title: c.title,
                        description: c.description,
                    })
                    .collect()
            }),
        })
    }
}

// =============================================================================
// Root types
// =============================================================================

pub struct Query;

#[juniper::graphql_object(context = GraphQLContext)]
impl Query {
    /// Fetch one post by id
    async fn post(ctx: &GraphQLContext, id: String) -> FieldResult<Option<PostData>> {
        let post_id = PostId::parse(&id)
            .map_err(|_| FieldError::new(format!("Invalid id: {}", id), Value::null()))?;
        let post = Post::find_by_id(post_id, &ctx.deps.db_pool).await?;
        Ok(post.map(PostData::from))
    }
}

pub struct Mutation;

#[juniper::graphql_object(context = GraphQLContext)]
impl Mutation {
    /// Create a post and fan out its side effects
    async fn create_post(ctx: &GraphQLContext, input: CreatePostInput) -> FieldResult<PostData> {
        let member_id = ctx
            .current_member
            .ok_or_else(|| FieldError::new("Authentication required", Value::null()))?;

        let params = input.into_params()?;
        let post = post_actions::create_post(member_id, params, &ctx.deps).await?;
        Ok(PostData::from(post))
    }
}

pub type Schema = RootNode<'static, Query, Mutation, EmptySubscription<GraphQLContext>>;

pub fn create_schema() -> Schema {
    Schema::new(Query, Mutation, EmptySubscription::new())
}
