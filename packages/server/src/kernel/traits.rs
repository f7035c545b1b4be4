//! Trait abstractions for external collaborators (using traits for testability)

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgConnection;

use crate::common::PostId;
use crate::domains::posts::data::ChildRequestInput;

/// Applies nested child requests to a freshly inserted post.
///
/// Runs inside the creation transaction: the connection handed in is the
/// same one the post insert used, so a failure here rolls everything back.
#[async_trait]
pub trait ChildRequestApplier: Send + Sync {
    async fn apply(
        &self,
        post_id: PostId,
        children: &[ChildRequestInput],
        conn: &mut PgConnection,
    ) -> Result<()>;
}

/// Default applier: stores each child as a request post under the parent.
pub struct PgChildRequestApplier;

#[async_trait]
impl ChildRequestApplier for PgChildRequestApplier {
    async fn apply(
        &self,
        post_id: PostId,
        children: &[ChildRequestInput],
        conn: &mut PgConnection,
    ) -> Result<()> {
        use crate::domains::posts::models::Post;

        for child in children {
            Post::create_child(post_id, child, conn).await?;
        }
        Ok(())
    }
}
