//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::{Extension, Request},
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Method,
    },
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::common::MemberId;
use crate::domains::tag::models::TagNamePolicy;
use crate::kernel::ServerDeps;
use crate::server::graphql::{create_schema, GraphQLContext};
use crate::server::routes::{
    graphql_batch_handler, graphql_handler, graphql_playground, health_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub server_deps: Arc<ServerDeps>,
}

/// Middleware to create GraphQLContext per-request.
///
/// Authentication is the upstream gateway's concern; it forwards the
/// verified member id in the `x-member-id` header.
async fn create_graphql_context(
    Extension(state): Extension<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let current_member = request
        .headers()
        .get("x-member-id")
        .and_then(|value| value.to_str().ok())
        .and_then(|raw| MemberId::parse(raw).ok());

    let context = Arc::new(GraphQLContext::new(
        state.server_deps.clone(),
        current_member,
    ));
    request.extensions_mut().insert(context);

    next.run(request).await
}

/// Build the Axum application router.
///
/// Returns (Router, Arc<ServerDeps>) - deps are also handed back for
/// anything the binary wants to wire up around the server.
pub fn build_app(pool: PgPool, tag_name_policy: TagNamePolicy) -> (Router, Arc<ServerDeps>) {
    // Create GraphQL schema (singleton)
    let schema = Arc::new(create_schema());

    let server_deps = Arc::new(ServerDeps::new(pool.clone(), tag_name_policy));

    let app_state = AppState {
        db_pool: pool,
        server_deps: server_deps.clone(),
    };

    // CORS configuration - allow any origin for development
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    // Build router
    #[allow(unused_mut)]
    let mut router = Router::new()
        .route("/graphql", post(graphql_handler))
        .route("/graphql/batch", post(graphql_batch_handler));

    // GraphQL playground only in debug builds (development)
    #[cfg(debug_assertions)]
    {
        router = router.route("/graphql", get(graphql_playground));
    }

    let app = router
        // Health check
        .route("/health", get(health_handler))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(middleware::from_fn(create_graphql_context))
        .layer(Extension(app_state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        // State (schema for GraphQL handlers)
        .with_state(schema);

    (app, server_deps)
}
