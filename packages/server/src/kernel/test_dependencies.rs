//! Test doubles for external collaborators.
//!
//! Compiled into the library (not behind `cfg(test)`) so integration tests
//! under `tests/` can use them too.

use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domains::tag::models::TagNamePolicy;
use crate::kernel::deps::ServerDeps;
use crate::kernel::job_queue::{EnqueueOptions, EnqueueResult, JobQueue};
use crate::kernel::stream_hub::StreamHub;
use crate::kernel::traits::PgChildRequestApplier;

/// Job queue double that records enqueued jobs instead of persisting them.
#[derive(Default)]
pub struct RecordingJobQueue {
    enqueued: Mutex<Vec<(String, serde_json::Value, EnqueueOptions)>>,
}

impl RecordingJobQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of (job_type, args, opts) tuples enqueued so far.
    pub fn enqueued(&self) -> Vec<(String, serde_json::Value, EnqueueOptions)> {
        self.enqueued.lock().unwrap().clone()
    }

    /// Job types enqueued so far, in order.
    pub fn job_types(&self) -> Vec<String> {
        self.enqueued
            .lock()
            .unwrap()
            .iter()
            .map(|(job_type, _, _)| job_type.clone())
            .collect()
    }
}

#[async_trait]
impl JobQueue for RecordingJobQueue {
    async fn enqueue(
        &self,
        job_type: &str,
        args: serde_json::Value,
        opts: EnqueueOptions,
    ) -> Result<EnqueueResult> {
        self.enqueued
            .lock()
            .unwrap()
            .push((job_type.to_string(), args, opts));
        Ok(EnqueueResult::Created(Uuid::new_v4()))
    }
}

/// Job queue double whose every enqueue fails.
pub struct FailingJobQueue;

#[async_trait]
impl JobQueue for FailingJobQueue {
    async fn enqueue(
        &self,
        job_type: &str,
        _args: serde_json::Value,
        _opts: EnqueueOptions,
    ) -> Result<EnqueueResult> {
        Err(anyhow!("job queue unavailable (enqueue {job_type})"))
    }
}

/// Bundle of test dependencies with handles to the doubles.
pub struct TestDependencies {
    pub deps: ServerDeps,
    pub job_queue: Arc<RecordingJobQueue>,
}

impl TestDependencies {
    /// Deps backed by the real database plus a recording job queue.
    pub fn new(db_pool: PgPool) -> Self {
        let job_queue = Arc::new(RecordingJobQueue::new());
        let deps = ServerDeps::with_collaborators(
            db_pool,
            StreamHub::new(),
            job_queue.clone(),
            Arc::new(PgChildRequestApplier),
            TagNamePolicy::Exact,
        );
        Self { deps, job_queue }
    }

    /// Deps whose job queue rejects every enqueue.
    pub fn with_failing_job_queue(db_pool: PgPool) -> ServerDeps {
        ServerDeps::with_collaborators(
            db_pool,
            StreamHub::new(),
            Arc::new(FailingJobQueue),
            Arc::new(PgChildRequestApplier),
            TagNamePolicy::Exact,
        )
    }
}
