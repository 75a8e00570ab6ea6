use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::models::payment::GatewayQuery;
use crate::services::{GatewayError, GatewayService, RequestError};

/// Method-agnostic entry point: the action comes from the query string.
pub async fn handle_gateway(
    State(service): State<Arc<GatewayService>>,
    method: Method,
    query: Result<Query<GatewayQuery>, QueryRejection>,
) -> Response {
    let request_id = Uuid::new_v4();
    let span = info_span!("gateway", %request_id, %method);

    async move {
        let query = match query {
            Ok(Query(query)) => query,
            Err(rejection) => {
                return GatewayError::from(RequestError::MalformedQuery(rejection.body_text()))
                    .into_response();
            }
        };

        info!(action = query.action.as_deref().unwrap_or("-"), "received request");

        match service.handle(query).await {
            Ok(result) => (StatusCode::OK, Json(result)).into_response(),
            Err(e) => e.into_response(),
        }
    }
    .instrument(span)
    .await
}

pub async fn health_handler() -> StatusCode {
    StatusCode::OK
}
