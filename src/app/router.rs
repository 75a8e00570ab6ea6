use axum::{
    middleware,
    routing::{any, get},
    Router,
};
use std::sync::Arc;

use crate::handlers::{cors, gateway};
use crate::services::GatewayService;

pub fn build_router(service: Arc<GatewayService>) -> Router {
    Router::new()
        .route("/", any(gateway::handle_gateway))
        .route("/api/gateway", any(gateway::handle_gateway))
        .route("/health", get(gateway::health_handler))
        .layer(middleware::from_fn(cors::cors))
        .with_state(service)
}
