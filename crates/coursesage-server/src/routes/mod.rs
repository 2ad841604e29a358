//! HTTP route handlers.

pub mod ai;
pub mod catalog;

use std::fmt;
use std::sync::Arc;

use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::error;

use coursesage_core::Error;

use crate::state::AppState;

/// Handler response: status plus JSON body.
pub type ApiResponse = (StatusCode, Json<Value>);

/// Build the main Axum router with all routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(welcome))
        .nest("/api/v1", api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn api_routes() -> Router<Arc<AppState>> {
    Router::new().merge(ai::routes()).merge(catalog::routes())
}

async fn welcome() -> Json<Value> {
    Json(json!({
        "success": true,
        "message": "Your server is up and running....",
    }))
}

/// `{success: false, message}` with the given status.
pub(crate) fn failure(status: StatusCode, message: impl Into<String>) -> ApiResponse {
    (
        status,
        Json(json!({ "success": false, "message": message.into() })),
    )
}

/// Map a store error to its HTTP status.
pub(crate) fn store_failure(err: Error) -> ApiResponse {
    match err {
        Error::NotFound(message) => failure(StatusCode::NOT_FOUND, message),
        Error::Validation(message) => failure(StatusCode::BAD_REQUEST, message),
        Error::Conflict(what) => failure(StatusCode::CONFLICT, format!("{} already exists", what)),
        other => {
            error!("Store failure: {}", other);
            failure(StatusCode::INTERNAL_SERVER_ERROR, other.to_string())
        }
    }
}

/// An entity reference sent either as a JSON number or a string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RefId {
    Number(i64),
    Text(String),
}

impl fmt::Display for RefId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefId::Number(n) => write!(f, "{}", n),
            RefId::Text(s) => write!(f, "{}", s.trim()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ref_id_accepts_numbers_and_strings() {
        let n: RefId = serde_json::from_str("42").unwrap();
        let s: RefId = serde_json::from_str(r#"" abc ""#).unwrap();
        assert_eq!(n.to_string(), "42");
        assert_eq!(s.to_string(), "abc");
    }

    #[test]
    fn test_store_failure_statuses() {
        assert_eq!(store_failure(Error::NotFound("x".into())).0, StatusCode::NOT_FOUND);
        assert_eq!(store_failure(Error::Validation("x".into())).0, StatusCode::BAD_REQUEST);
        assert_eq!(store_failure(Error::Conflict("x".into())).0, StatusCode::CONFLICT);
        assert_eq!(
            store_failure(Error::Database("locked".into())).0,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
