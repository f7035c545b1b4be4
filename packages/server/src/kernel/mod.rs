//! Kernel module - server infrastructure and dependencies.

pub mod deps;
pub mod job_queue;
pub mod mentions;
pub mod stream_hub;
pub mod test_dependencies;
pub mod traits;

pub use deps::ServerDeps;
pub use job_queue::{EnqueueOptions, EnqueueResult, Job, JobQueue, PgJobQueue};
pub use mentions::extract_member_mentions;
pub use stream_hub::StreamHub;
pub use test_dependencies::{FailingJobQueue, RecordingJobQueue, TestDependencies};
pub use traits::{ChildRequestApplier, PgChildRequestApplier};
