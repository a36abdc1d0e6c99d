//! Item repository - validation and SQL mapping
//!
//! Owns the domain invariants (non-empty trimmed name, non-negative price)
//! and translates operations into storage gateway calls. Writes re-fetch the
//! row afterwards so callers always see canonical stored values.

use chrono::Utc;
use rusqlite::params;

use crate::db::{parse_datetime, Database};
use crate::error::{RepoError, ValidationError};
use crate::models::Item;

/// Default page size for `list` when the caller gives none.
pub const DEFAULT_LIMIT: i64 = 50;

/// Hard cap on `list` page size.
pub const MAX_LIMIT: i64 = 200;

/// Repository over the items table. Cheap to clone; shares the handle.
#[derive(Clone)]
pub struct ItemRepo {
    db: Database,
}

impl ItemRepo {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// List items, newest first. Out-of-range paging input is clamped, not
    /// rejected.
    pub fn list(&self, limit: i64, offset: i64) -> Result<Vec<Item>, RepoError> {
        let (limit, offset) = clamp_page(limit, offset);
        let items = self.db.select(
            "SELECT id, name, price, created_at FROM items ORDER BY id DESC LIMIT ?1 OFFSET ?2",
            params![limit, offset],
            map_item,
        )?;
        Ok(items)
    }

    /// Fetch a single item; `None` when the id does not exist.
    pub fn get(&self, id: i64) -> Result<Option<Item>, RepoError> {
        let rows = self.db.select(
            "SELECT id, name, price, created_at FROM items WHERE id = ?1",
            params![id],
            map_item,
        )?;
        Ok(rows.into_iter().next())
    }

    /// Insert a new item and return the stored row.
    pub fn create(&self, name: &str, price: f64) -> Result<Item, RepoError> {
        let name = name.trim();
        validate(name, price)?;

        self.db.execute(
            "INSERT INTO items (name, price) VALUES (?1, ?2)",
            params![name, price],
        )?;
        let id = self.db.last_insert_id();

        // The read-back runs as a separate statement, so a concurrent delete
        // can make it come up empty; synthesize the row from the input then.
        match self.get(id)? {
            Some(item) => Ok(item),
            None => Ok(Item {
                id,
                name: name.to_string(),
                price,
                created_at: Utc::now(),
            }),
        }
    }

    /// Merge the given fields into an existing item and persist. Unspecified
    /// fields keep their stored value. `None` when the id does not exist.
    pub fn update(
        &self,
        id: i64,
        name: Option<&str>,
        price: Option<f64>,
    ) -> Result<Option<Item>, RepoError> {
        let Some(current) = self.get(id)? else {
            return Ok(None);
        };

        let name = name.map_or(current.name, |n| n.trim().to_string());
        let price = price.unwrap_or(current.price);
        validate(&name, price)?;

        self.db.execute(
            "UPDATE items SET name = ?1, price = ?2 WHERE id = ?3",
            params![name, price, id],
        )?;
        self.get(id)
    }

    /// Hard-delete an item. `false` when nothing matched.
    pub fn delete(&self, id: i64) -> Result<bool, RepoError> {
        let rows_affected = self
            .db
            .execute("DELETE FROM items WHERE id = ?1", params![id])?;
        Ok(rows_affected > 0)
    }
}

/// Clamp paging input: limit into [1, MAX_LIMIT], offset non-negative.
fn clamp_page(limit: i64, offset: i64) -> (i64, i64) {
    (limit.clamp(1, MAX_LIMIT), offset.max(0))
}

fn validate(name: &str, price: f64) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if price < 0.0 {
        return Err(ValidationError::NegativePrice);
    }
    Ok(())
}

fn map_item(row: &rusqlite::Row<'_>) -> rusqlite::Result<Item> {
    Ok(Item {
        id: row.get(0)?,
        name: row.get(1)?,
        price: row.get(2)?,
        created_at: parse_datetime(row.get::<_, String>(3)?),
    })
}
