use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::common::{CommunityId, MemberId};

/// Post type enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PostType {
    Discussion,
    Request,
    Offer,
    Project,
    Event,
}

impl PostType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostType::Discussion => "discussion",
            PostType::Request => "request",
            PostType::Offer => "offer",
            PostType::Project => "project",
            PostType::Event => "event",
        }
    }
}

impl std::fmt::Display for PostType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PostType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "discussion" => Ok(PostType::Discussion),
            "request" => Ok(PostType::Request),
            "offer" => Ok(PostType::Offer),
            "project" => Ok(PostType::Project),
            "event" => Ok(PostType::Event),
            _ => Err(anyhow::anyhow!("Invalid post type: {}", s)),
        }
    }
}

/// External document attached to a post (e.g. a shared drive link)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocInput {
    pub url: String,
    pub name: Option<String>,
}

/// Nested child request submitted along with a parent post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildRequestInput {
    pub title: String,
    pub description: Option<String>,
}

/// Raw creation parameters as supplied by the caller.
///
/// Everything is optional; `setup_post_attrs` resolves defaults and the
/// fan-out planner decides which side effects the supplied fields imply.
/// `Option<Vec<_>>` distinguishes "not supplied" from "supplied empty"
/// where the two mean different things (replace semantics).
#[derive(Debug, Clone, Default, TypedBuilder)]
pub struct CreatePostParams {
    #[builder(default, setter(strip_option, into))]
    pub post_type: Option<String>,
    #[builder(default, setter(strip_option, into))]
    pub title: Option<String>,
    #[builder(default, setter(strip_option, into))]
    pub description: Option<String>,
    #[builder(default)]
    pub announcement: bool,
    #[builder(default, setter(strip_option, into))]
    pub location: Option<String>,
    #[builder(default)]
    pub community_ids: Vec<CommunityId>,
    #[builder(default)]
    pub topic_names: Vec<String>,
    #[builder(default, setter(strip_option, into))]
    pub image_url: Option<String>,
    #[builder(default, setter(strip_option, into))]
    pub video_url: Option<String>,
    #[builder(default, setter(strip_option))]
    pub image_urls: Option<Vec<String>>,
    #[builder(default, setter(strip_option))]
    pub file_urls: Option<Vec<String>>,
    #[builder(default, setter(strip_option))]
    pub docs: Option<Vec<DocInput>>,
    #[builder(default, setter(strip_option))]
    pub member_ids: Option<Vec<MemberId>>,
    #[builder(default, setter(strip_option))]
    pub event_invitee_ids: Option<Vec<MemberId>>,
    #[builder(default, setter(strip_option))]
    pub children: Option<Vec<ChildRequestInput>>,
}

/// Canonical post attributes with platform defaults resolved.
///
/// This is the record the transactional insert consumes; nothing here is
/// optional except genuinely nullable columns.
#[derive(Debug, Clone)]
pub struct PostAttrs {
    pub user_id: MemberId,
    pub post_type: PostType,
    pub title: Option<String>,
    pub description: String,
    pub announcement: bool,
    pub location: Option<String>,
    pub active: bool,
}
