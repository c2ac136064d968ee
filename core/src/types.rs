//! Domain DTOs for the doable API.
//!
//! # Design
//! These types mirror the server's JSON schema (camelCase keys) but keep only
//! the fields the client reads. Unknown keys such as `creationDate` or
//! `hiveIcon` are ignored on input. The mock-server crate defines its own
//! copies; integration tests catch any schema drift between the two.

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};

/// A todo list as returned by `GET api/lists`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct List {
    pub id: String,
    pub name: String,
    /// RGB triple used for the list badge.
    pub color: [u8; 3],
}

/// A single todo item as returned by `GET api/todos`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Soft reference to a [`List`]. Empty means "no list"; a non-empty id
    /// may name a list that no longer exists.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub list_id: String,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default, with = "timestamp")]
    pub last_modified: NaiveDateTime,
}

impl Todo {
    /// The list id, or `None` when the todo belongs to no list.
    pub fn list_ref(&self) -> Option<&str> {
        if self.list_id.is_empty() {
            None
        } else {
            Some(&self.list_id)
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// `lastModified` codec.
///
/// The server writes naive local timestamps (`2024-01-02T10:00:00.000`).
/// Other ISO 8601 shapes are accepted as well: minute precision, offsets with
/// or without a colon (`Z`, `+0100`, `+01:00`), and bare dates. Offset values
/// are normalized to UTC. Output always uses the server's own format.
pub mod timestamp {
    use chrono::{DateTime, NaiveDate, NaiveDateTime};
    use serde::{Deserialize, Deserializer, Serializer};
    use tracing::warn;

    const FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

    const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%#z", "%Y-%m-%dT%H:%M%#z"];
    const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&value.format(FORMAT))
    }

    /// An unreadable value sorts last (epoch) instead of failing the payload.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        Ok(parse(&raw).unwrap_or_else(|| {
            warn!(raw = %raw, "unreadable lastModified, sorting it last");
            NaiveDateTime::default()
        }))
    }

    /// Parse any accepted timestamp form. An empty string maps to the epoch
    /// so that undated todos sort last.
    pub fn parse(raw: &str) -> Option<NaiveDateTime> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Some(NaiveDateTime::default());
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.naive_utc());
        }
        let with_offset = OFFSET_FORMATS
            .iter()
            .find_map(|fmt| DateTime::parse_from_str(raw, fmt).ok())
            .map(|dt| dt.naive_utc());
        with_offset
            .or_else(|| {
                NAIVE_FORMATS
                    .iter()
                    .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            })
            .or_else(|| {
                NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .ok()
                    .and_then(|date| date.and_hms_opt(0, 0, 0))
            })
    }

    /// Format a timestamp the way the server does.
    pub fn format(value: &NaiveDateTime) -> String {
        value.format(FORMAT).to_string()
    }
}
