//! Request and response models
//!
//! Incoming scalars are loosely typed on the wire (form fields arrive as
//! strings, JSON clients may send numbers or strings). They are parsed once
//! here into typed optionals; domain logic never sees raw request data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// The sole domain entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub created_at: DateTime<Utc>,
}

/// Query-string parameters of `/api/items`.
#[derive(Debug, Default, Deserialize)]
pub struct ItemQuery {
    pub action: Option<String>,
    #[serde(default, deserialize_with = "de_opt_i64")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "de_opt_i64")]
    pub limit: Option<i64>,
    #[serde(default, deserialize_with = "de_opt_i64")]
    pub offset: Option<i64>,
}

/// POST body of `/api/items`, accepted as form encoding or JSON.
#[derive(Debug, Default, Deserialize)]
pub struct ItemPayload {
    pub action: Option<String>,
    #[serde(default, deserialize_with = "de_opt_i64")]
    pub id: Option<i64>,
    pub name: Option<String>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    pub price: Option<f64>,
}

impl ItemPayload {
    pub fn is_empty(&self) -> bool {
        self.action.is_none() && self.id.is_none() && self.name.is_none() && self.price.is_none()
    }

    /// Resolve a POST body: form fields first, then raw JSON, then empty.
    pub fn parse(body: &[u8]) -> Self {
        if let Ok(payload) = serde_urlencoded::from_bytes::<ItemPayload>(body) {
            if !payload.is_empty() {
                return payload;
            }
        }
        serde_json::from_slice(body).unwrap_or_default()
    }
}

/// Number-or-string scalar as it appears on the wire.
#[derive(Deserialize)]
#[serde(untagged)]
enum LooseNum {
    Int(i64),
    Float(f64),
    Str(String),
}

fn de_opt_i64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
    Ok(match Option::<LooseNum>::deserialize(d)? {
        None => None,
        Some(LooseNum::Int(v)) => Some(v),
        Some(LooseNum::Float(v)) => Some(v as i64),
        Some(LooseNum::Str(s)) => s.trim().parse().ok(),
    })
}

fn de_opt_f64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    Ok(match Option::<LooseNum>::deserialize(d)? {
        None => None,
        Some(LooseNum::Int(v)) => Some(v as f64),
        Some(LooseNum::Float(v)) => Some(v),
        Some(LooseNum::Str(s)) => s.trim().parse().ok(),
    })
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub database: DatabaseHealth,
}

#[derive(Debug, Serialize)]
pub struct DatabaseHealth {
    pub connected: bool,
    pub path: String,
    pub size_bytes: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_form_encoded_body() {
        let payload = ItemPayload::parse(b"name=Widget&price=9.99");
        assert_eq!(payload.name.as_deref(), Some("Widget"));
        assert_eq!(payload.price, Some(9.99));
        assert_eq!(payload.id, None);
    }

    #[test]
    fn falls_back_to_json_body() {
        let payload = ItemPayload::parse(br#"{"name": "Widget", "price": 9.99}"#);
        assert_eq!(payload.name.as_deref(), Some("Widget"));
        assert_eq!(payload.price, Some(9.99));
    }

    #[test]
    fn json_string_scalars_are_coerced() {
        let payload = ItemPayload::parse(br#"{"id": "7", "price": "12.50"}"#);
        assert_eq!(payload.id, Some(7));
        assert_eq!(payload.price, Some(12.5));
    }

    #[test]
    fn garbage_body_yields_empty_payload() {
        let payload = ItemPayload::parse(b"\xff\xfenot a body");
        assert!(payload.is_empty());

        let payload = ItemPayload::parse(b"");
        assert!(payload.is_empty());
    }

    #[test]
    fn non_numeric_scalars_become_none() {
        let payload = ItemPayload::parse(b"id=abc&price=cheap&name=x");
        assert_eq!(payload.id, None);
        assert_eq!(payload.price, None);
        assert_eq!(payload.name.as_deref(), Some("x"));
    }

    #[test]
    fn action_can_ride_in_the_body() {
        let payload = ItemPayload::parse(b"action=create&name=Widget&price=1");
        assert_eq!(payload.action.as_deref(), Some("create"));
        assert_eq!(payload.price, Some(1.0));
    }
}
