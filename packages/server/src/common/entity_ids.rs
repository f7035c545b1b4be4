//! Typed ID definitions for all domain entities.
//!
//! This module defines type aliases for each domain entity, providing
//! compile-time type safety for ID usage throughout the application.
//!
//! # Example
//!
//! ```rust
//! use server_core::common::{CommunityId, MemberId, PostId};
//!
//! // These are incompatible types - compiler prevents mixing them up
//! let member_id: MemberId = MemberId::new();
//! let post_id: PostId = PostId::new();
//!
//! // This would be a compile error:
//! // let wrong: PostId = member_id;
//! ```

// Re-export the core Id type and version markers
pub use super::id::{Id, V4, V7};

// ============================================================================
// Entity marker types
// ============================================================================

/// Marker type for Member entities (users).
pub struct Member;

/// Marker type for Community entities.
pub struct Community;

/// Marker type for Post entities.
pub struct Post;

/// Marker type for Tag entities (topics).
pub struct Tag;

/// Marker type for Media attachments.
pub struct Media;

/// Marker type for EventInvitation entities (RSVPs).
pub struct EventInvitation;

/// Marker type for Group entities (membership containers).
pub struct Group;

/// Marker type for TagFollow subscriptions.
pub struct TagFollow;

// ============================================================================
// Type aliases - the primary API
// ============================================================================

/// Typed ID for Member entities.
pub type MemberId = Id<Member>;

/// Typed ID for Community entities.
pub type CommunityId = Id<Community>;

/// Typed ID for Post entities.
pub type PostId = Id<Post>;

/// Typed ID for Tag entities.
pub type TagId = Id<Tag>;

/// Typed ID for Media attachments.
pub type MediaId = Id<Media>;

/// Typed ID for EventInvitation entities.
pub type InvitationId = Id<EventInvitation>;

/// Typed ID for Group entities.
pub type GroupId = Id<Group>;

/// Typed ID for TagFollow subscriptions.
pub type TagFollowId = Id<TagFollow>;
