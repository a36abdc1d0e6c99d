//! `/api/items` - single endpoint dispatching on (method, action)
//!
//! `action` selects the operation: `list`/`get` on GET, `create`/`update`/
//! `delete` on POST. `action` and `id` resolve from the query string first,
//! then the POST body. Anything else gets the 404 help listing.

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::error::{ApiError, ApiResult};
use crate::models::{ItemPayload, ItemQuery};
use crate::repo::DEFAULT_LIMIT;
use crate::server::AppState;

/// Entry point for every method on `/api/items`.
pub async fn dispatch(
    State(state): State<AppState>,
    method: Method,
    Query(query): Query<ItemQuery>,
    body: Bytes,
) -> ApiResult<Response> {
    let payload = if method == Method::POST {
        ItemPayload::parse(&body)
    } else {
        ItemPayload::default()
    };

    let action = query
        .action
        .as_deref()
        .or(payload.action.as_deref())
        .unwrap_or_default()
        .to_string();

    match (method.as_str(), action.as_str()) {
        ("GET", "list") => list(&state, &query),
        ("GET", "get") => get(&state, require_id(query.id, None)?),
        ("POST", "create") => create(&state, &payload),
        ("POST", "update") => update(&state, require_id(query.id, payload.id)?, &payload),
        ("POST", "delete") => delete(&state, require_id(query.id, payload.id)?),
        _ => Err(ApiError::UnknownRoute),
    }
}

/// Fallback for paths outside the API surface.
pub async fn not_found() -> ApiError {
    ApiError::UnknownRoute
}

/// An id of zero counts as missing, mirroring the lenient integer parse on
/// the way in (unparseable ids have already become `None`).
fn require_id(query_id: Option<i64>, body_id: Option<i64>) -> ApiResult<i64> {
    match query_id.or(body_id) {
        Some(id) if id != 0 => Ok(id),
        _ => Err(ApiError::MissingId),
    }
}

fn list(state: &AppState, query: &ItemQuery) -> ApiResult<Response> {
    let items = state
        .repo
        .list(query.limit.unwrap_or(DEFAULT_LIMIT), query.offset.unwrap_or(0))
        .map_err(|e| ApiError::from_repo(e, state.debug))?;

    Ok(Json(json!({"ok": true, "data": items})).into_response())
}

fn get(state: &AppState, id: i64) -> ApiResult<Response> {
    let item = state
        .repo
        .get(id)
        .map_err(|e| ApiError::from_repo(e, state.debug))?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(json!({"ok": true, "data": item})).into_response())
}

fn create(state: &AppState, payload: &ItemPayload) -> ApiResult<Response> {
    let name = payload.name.as_deref().unwrap_or_default();
    let price = payload.price.unwrap_or(0.0);

    let item = state
        .repo
        .create(name, price)
        .map_err(|e| ApiError::from_repo(e, state.debug))?;

    Ok((StatusCode::CREATED, Json(json!({"ok": true, "data": item}))).into_response())
}

fn update(state: &AppState, id: i64, payload: &ItemPayload) -> ApiResult<Response> {
    let item = state
        .repo
        .update(id, payload.name.as_deref(), payload.price)
        .map_err(|e| ApiError::from_repo(e, state.debug))?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(json!({"ok": true, "data": item})).into_response())
}

fn delete(state: &AppState, id: i64) -> ApiResult<Response> {
    let deleted = state
        .repo
        .delete(id)
        .map_err(|e| ApiError::from_repo(e, state.debug))?;

    if deleted {
        Ok(Json(json!({"ok": true, "deleted": id})).into_response())
    } else {
        Err(ApiError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_resolution_prefers_query() {
        assert_eq!(require_id(Some(1), Some(2)).unwrap(), 1);
        assert_eq!(require_id(None, Some(2)).unwrap(), 2);
    }

    #[test]
    fn zero_or_absent_id_is_rejected() {
        assert!(matches!(require_id(None, None), Err(ApiError::MissingId)));
        assert!(matches!(require_id(Some(0), None), Err(ApiError::MissingId)));
    }
}
