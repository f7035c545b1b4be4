// HTTP server and GraphQL edge

pub mod app;
pub mod graphql;
pub mod routes;

pub use app::{build_app, AppState};
