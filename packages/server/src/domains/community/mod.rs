pub mod models;

pub use models::{Community, Group, GroupMembership};
