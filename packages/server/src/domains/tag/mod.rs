pub mod models;

pub use models::{CommunityTag, Tag, TagFollow, TagNamePolicy};
