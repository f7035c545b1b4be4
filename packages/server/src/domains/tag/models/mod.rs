pub mod community_tag;
pub mod tag;
pub mod tag_follow;

pub use community_tag::CommunityTag;
pub use tag::{Tag, TagNamePolicy};
pub use tag_follow::TagFollow;
