//! REST API module
//!
//! This module provides the HTTP server and REST API endpoints including:
//! - API routing and request handling
//! - Authentication and authorization middleware
//! - Error handling and response formatting

pub mod handlers;
pub mod models;
pub mod routes;
pub mod server;

pub use handlers::AppState;
pub use routes::build_api_routes;
pub use server::ApiServer;
