// Business domains
pub mod community;
pub mod member;
pub mod posts;
pub mod tag;
