//! Endpoint handlers.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Response,
};

use crate::http::request::{AddParams, GetParams, NameParams, QueryPairs};
use crate::http::response::{self, ApiError, Message};
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::store::Insertion;

/// `GET /`: liveness greeting.
pub async fn hello() -> Result<Response, ApiError> {
    response::json(StatusCode::OK, &Message::new("Hello"))
}

/// `GET /name?q=`: greet by name. An empty name is allowed.
pub async fn greet(Query(query): Query<QueryPairs>) -> Result<Response, ApiError> {
    let params = NameParams::from(query);
    response::json(StatusCode::OK, &Message::new(format!("Hello {}!", params.q)))
}

/// `GET /add?k=&v=`: store `v` under `k` unless `k` already holds a value.
pub async fn add(
    State(state): State<AppState>,
    Query(query): Query<QueryPairs>,
) -> Result<Response, ApiError> {
    let params = AddParams::from(query);
    if params.k.is_empty() {
        return Err(ApiError::MissingKey);
    }

    match state.store.insert_if_absent(params.k.clone(), params.v).await {
        Insertion::Inserted => {
            tracing::debug!(key = %params.k, "Entry added");
            metrics::record_store_op("add", "inserted");
            Ok(response::text(StatusCode::OK, "Data successfully added"))
        }
        Insertion::Occupied { .. } => {
            tracing::debug!(key = %params.k, "Add rejected, key occupied");
            metrics::record_store_op("add", "conflict");
            Ok(response::text(
                StatusCode::CONFLICT,
                format!(
                    "This key:{} exists, try a different key or delete the existing key!",
                    params.k
                ),
            ))
        }
    }
}

/// `GET /get?k=`: fetch the value stored under `k`.
pub async fn get(
    State(state): State<AppState>,
    Query(query): Query<QueryPairs>,
) -> Result<Response, ApiError> {
    let params = GetParams::from(query);
    if params.k.is_empty() {
        return Err(ApiError::MissingKey);
    }

    match state.store.get(&params.k).await {
        Some(value) => {
            metrics::record_store_op("get", "found");
            response::json(StatusCode::OK, &Message::new(value))
        }
        None => {
            metrics::record_store_op("get", "missing");
            Ok(response::text(
                StatusCode::NOT_FOUND,
                format!("Key: '{}' doesn't exist", params.k),
            ))
        }
    }
}
