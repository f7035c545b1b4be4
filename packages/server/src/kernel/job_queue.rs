//! PostgreSQL-backed job queue for asynchronous background work.
//!
//! Post-commit fan-out enqueues jobs here; dedicated workers (out of this
//! crate's scope) claim and execute them. Delivery is at-least-once, so
//! handlers are expected to be idempotent. Idempotency keys dedupe
//! pending/running jobs at enqueue time.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

/// Result of an enqueue operation that handles idempotency.
#[derive(Debug, Clone)]
pub enum EnqueueResult {
    /// Job was enqueued, returns the new job ID
    Created(Uuid),
    /// A matching pending/running job already exists, returns its ID
    Duplicate(Uuid),
}

impl EnqueueResult {
    /// Get the job ID regardless of whether it was created or a duplicate
    pub fn job_id(&self) -> Uuid {
        match self {
            EnqueueResult::Created(id) | EnqueueResult::Duplicate(id) => *id,
        }
    }

    /// Returns true if this was a newly created job
    pub fn is_created(&self) -> bool {
        matches!(self, EnqueueResult::Created(_))
    }
}

/// Options controlling how a job is enqueued.
#[derive(Debug, Clone, Default)]
pub struct EnqueueOptions {
    /// If set, only one pending/running job may exist with this key.
    pub idempotency_key: Option<String>,
    /// Entity the job refers to (e.g. a post id).
    pub reference_id: Option<Uuid>,
    pub max_retries: i32,
    pub priority: i32,
}

/// Trait for job queue operations.
///
/// Object-safe so deps can hold `Arc<dyn JobQueue>` and tests can swap in
/// recording or failing doubles.
#[async_trait]
pub trait JobQueue: Send + Sync {
    /// Enqueue a job for immediate execution.
    async fn enqueue(
        &self,
        job_type: &str,
        args: serde_json::Value,
        opts: EnqueueOptions,
    ) -> Result<EnqueueResult>;
}

/// PostgreSQL-backed job for background processing
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Job {
    pub id: Uuid,
    pub status: String,
    pub job_type: String,
    pub args: serde_json::Value,
    pub next_run_at: Option<DateTime<Utc>>,
    pub last_run_at: Option<DateTime<Utc>>,
    pub max_retries: i32,
    pub retry_count: i32,
    pub idempotency_key: Option<String>,
    pub reference_id: Option<Uuid>,
    pub priority: i32,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    /// Create a new job for immediate execution
    pub fn new(job_type: String, args: serde_json::Value, opts: &EnqueueOptions) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            status: "pending".to_string(),
            job_type,
            args,
            next_run_at: Some(now),
            last_run_at: None,
            max_retries: opts.max_retries,
            retry_count: 0,
            idempotency_key: opts.idempotency_key.clone(),
            reference_id: opts.reference_id,
            priority: opts.priority,
            error_message: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Insert the job into the database
    pub async fn insert(&self, pool: &PgPool) -> Result<Self> {
        let job = sqlx::query_as::<_, Job>(
            r#"
            INSERT INTO jobs (
                id, status, job_type, args, next_run_at, last_run_at,
                max_retries, retry_count, idempotency_key,
                reference_id, priority, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING *
            "#,
        )
        .bind(self.id)
        .bind(&self.status)
        .bind(&self.job_type)
        .bind(&self.args)
        .bind(self.next_run_at)
        .bind(self.last_run_at)
        .bind(self.max_retries)
        .bind(self.retry_count)
        .bind(&self.idempotency_key)
        .bind(self.reference_id)
        .bind(self.priority)
        .bind(self.created_at)
        .bind(self.updated_at)
        .fetch_one(pool)
        .await?;

        Ok(job)
    }

    /// Find jobs by type for a given reference entity (mainly for tests)
    pub async fn find_by_reference(reference_id: Uuid, pool: &PgPool) -> Result<Vec<Self>> {
        let jobs = sqlx::query_as::<_, Job>(
            "SELECT * FROM jobs WHERE reference_id = $1 ORDER BY created_at",
        )
        .bind(reference_id)
        .fetch_all(pool)
        .await?;
        Ok(jobs)
    }
}

/// PostgreSQL-backed job queue implementation.
pub struct PgJobQueue {
    db: PgPool,
}

impl PgJobQueue {
    /// Create a new queue using the provided database pool.
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Check if a job with the given idempotency key already exists.
    async fn find_by_idempotency_key(&self, key: &str) -> Result<Option<Job>> {
        let job = sqlx::query_as::<_, Job>(
            r#"
            SELECT *
            FROM jobs
            WHERE idempotency_key = $1
              AND status IN ('pending', 'running')
            LIMIT 1
            "#,
        )
        .bind(key)
        .fetch_optional(&self.db)
        .await?;

        Ok(job)
    }
}

#[async_trait]
impl JobQueue for PgJobQueue {
    async fn enqueue(
        &self,
        job_type: &str,
        args: serde_json::Value,
        opts: EnqueueOptions,
    ) -> Result<EnqueueResult> {
        // Check idempotency first
        if let Some(key) = &opts.idempotency_key {
            if let Some(existing) = self.find_by_idempotency_key(key).await? {
                debug!(
                    job_id = %existing.id,
                    idempotency_key = %key,
                    "Found existing job with idempotency key"
                );
                return Ok(EnqueueResult::Duplicate(existing.id));
            }
        }

        let job = Job::new(job_type.to_string(), args, &opts);

        debug!(
            job_id = %job.id,
            job_type = %job_type,
            "Enqueueing job"
        );

        let inserted = job.insert(&self.db).await?;

        Ok(EnqueueResult::Created(inserted.id))
    }
}
