//! items-server: minimal HTTP JSON API for item CRUD
//!
//! A single `/api/items` endpoint dispatches on method + `action` parameter
//! to list/get/create/update/delete operations over a SQLite-backed items
//! table. Responses are always JSON envelopes carrying an `ok` flag.

pub mod db;
pub mod error;
pub mod models;
pub mod repo;
pub mod routes;
pub mod server;

pub use db::Database;
pub use error::{ApiError, RepoError, StorageError, ValidationError};
pub use models::Item;
pub use repo::ItemRepo;
pub use server::{run_server, ServerArgs};
