pub mod event_invitation;
pub mod follow;
pub mod media;
pub mod post;
pub mod project_member;

pub use event_invitation::{EventInvitation, InvitationResponse};
pub use follow::Follow;
pub use media::{Media, MediaKind};
pub use post::Post;
pub use project_member::ProjectMember;
