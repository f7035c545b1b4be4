//! Server dependencies for domain actions (using traits for testability)
//!
//! This module provides the central dependency container threaded through
//! domain actions. External collaborators (job queue, child-request
//! applier) use trait abstractions so tests can swap in doubles.

use std::sync::Arc;

use sqlx::PgPool;

use crate::domains::tag::models::TagNamePolicy;
use crate::kernel::job_queue::{JobQueue, PgJobQueue};
use crate::kernel::stream_hub::StreamHub;
use crate::kernel::traits::{ChildRequestApplier, PgChildRequestApplier};

/// Server dependencies accessible to domain actions
#[derive(Clone)]
pub struct ServerDeps {
    pub db_pool: PgPool,
    /// In-process pub/sub hub for real-time pushes to socket endpoints
    pub stream_hub: StreamHub,
    /// Queue for asynchronous post-commit jobs
    pub job_queue: Arc<dyn JobQueue>,
    /// Applier for nested child requests attached to a new post
    pub child_requests: Arc<dyn ChildRequestApplier>,
    /// How caller-supplied topic names resolve to tags
    pub tag_name_policy: TagNamePolicy,
}

impl ServerDeps {
    /// Create production dependencies backed by PostgreSQL.
    pub fn new(db_pool: PgPool, tag_name_policy: TagNamePolicy) -> Self {
        let job_queue = Arc::new(PgJobQueue::new(db_pool.clone()));
        Self {
            db_pool,
            stream_hub: StreamHub::new(),
            job_queue,
            child_requests: Arc::new(PgChildRequestApplier),
            tag_name_policy,
        }
    }

    /// Create dependencies with every collaborator supplied explicitly.
    pub fn with_collaborators(
        db_pool: PgPool,
        stream_hub: StreamHub,
        job_queue: Arc<dyn JobQueue>,
        child_requests: Arc<dyn ChildRequestApplier>,
        tag_name_policy: TagNamePolicy,
    ) -> Self {
        Self {
            db_pool,
            stream_hub,
            job_queue,
            child_requests,
            tag_name_policy,
        }
    }
}
