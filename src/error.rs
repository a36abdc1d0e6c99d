//! Error types and their HTTP status mapping
//!
//! Repository calls return explicit results; the `ApiError` conversion at the
//! boundary owns status codes and the `{ok:false, ...}` envelope.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Failure from the underlying connection: malformed query, constraint
/// violation, connectivity loss.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Caller input violates a domain invariant.
///
/// The display strings are the API's wire messages; don't reword them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("El nombre es obligatorio")]
    EmptyName,

    #[error("El precio no puede ser negativo")]
    NegativePrice,
}

/// Error surface of the item repository.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Help listing returned with the unknown-route 404.
pub const ROUTE_HELP: [&str; 5] = [
    "GET  /api/items?action=list&limit=50&offset=0",
    "GET  /api/items?action=get&id=1",
    "POST /api/items?action=create {name, price}",
    "POST /api/items?action=update&id=1 {name?, price?}",
    "POST /api/items?action=delete&id=1",
];

pub type ApiResult<T> = Result<T, ApiError>;

/// API error with automatic HTTP status mapping.
#[derive(Debug)]
pub enum ApiError {
    /// Invalid input (400)
    Validation(ValidationError),

    /// Required `id` parameter absent or zero (400)
    MissingId,

    /// No item with the requested id (404)
    NotFound,

    /// Unknown method/action pair or path (404 + route help)
    UnknownRoute,

    /// Storage failure (500, logged; detail echoed only in debug mode)
    Storage { detail: Option<String> },
}

impl ApiError {
    /// Map a repository error, logging storage faults and withholding their
    /// detail from the response unless `debug` is set.
    pub fn from_repo(err: RepoError, debug: bool) -> Self {
        match err {
            RepoError::Validation(e) => Self::Validation(e),
            RepoError::Storage(e) => {
                tracing::error!("storage error: {}", e);
                Self::Storage {
                    detail: debug.then(|| e.to_string()),
                }
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::Validation(e) => (
                StatusCode::BAD_REQUEST,
                json!({"ok": false, "error": e.to_string()}),
            ),
            Self::MissingId => (
                StatusCode::BAD_REQUEST,
                json!({"ok": false, "error": "id requerido"}),
            ),
            Self::NotFound => (
                StatusCode::NOT_FOUND,
                json!({"ok": false, "error": "no encontrado"}),
            ),
            Self::UnknownRoute => (
                StatusCode::NOT_FOUND,
                json!({"ok": false, "error": "Ruta no encontrada", "help": ROUTE_HELP}),
            ),
            Self::Storage { detail } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({
                    "ok": false,
                    "error": detail.unwrap_or_else(|| "error interno".to_string()),
                }),
            ),
        };

        (status, Json(body)).into_response()
    }
}
