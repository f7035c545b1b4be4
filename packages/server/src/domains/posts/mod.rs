pub mod actions;
pub mod data;
pub mod models;

// Re-export the creation contract
pub use actions::{create_post, CreatePostError};

// Re-export data types
pub use data::{ChildRequestInput, CreatePostParams, DocInput, PostAttrs, PostType};

// Re-export models
pub use models::Post;
