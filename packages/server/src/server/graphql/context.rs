use std::sync::Arc;

use crate::common::MemberId;
use crate::kernel::ServerDeps;

/// GraphQL request context
///
/// Shared resources plus the per-request identity of the caller. The
/// member id comes from the upstream gateway; this crate does not
/// authenticate.
pub struct GraphQLContext {
    pub deps: Arc<ServerDeps>,
    pub current_member: Option<MemberId>,
}

impl juniper::Context for GraphQLContext {}

impl GraphQLContext {
    pub fn new(deps: Arc<ServerDeps>, current_member: Option<MemberId>) -> Self {
        Self {
            deps,
            current_member,
        }
    }
}
