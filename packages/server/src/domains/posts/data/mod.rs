pub mod types;

pub use types::{ChildRequestInput, CreatePostParams, DocInput, PostAttrs, PostType};
