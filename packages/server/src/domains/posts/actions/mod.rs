pub mod counters;
pub mod create_post;
pub mod notify;

pub use counters::update_counters_for_post;
pub use create_post::{
    create_post, plan_strict_effects, run_post_commit_fanout, setup_post_attrs, CreatePostError,
    StrictEffect,
};
pub use notify::{
    community_room, enqueue_post_jobs, narrowed_payloads, push_new_post, NewPostPayload,
    JOB_CREATE_ACTIVITIES, JOB_NOTIFY_EXTERNAL,
};
