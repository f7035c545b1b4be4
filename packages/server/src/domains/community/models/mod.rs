pub mod community;
pub mod group;

pub use community::Community;
pub use group::{Group, GroupMembership};
