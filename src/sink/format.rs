//! Record formats

use crate::harvest::types::WorkItem;
use serde::Serialize;
use serde_json::Value;
use std::str::FromStr;

#[derive(Serialize)]
struct JsonRecord<'a> {
    user_id: &'a str,
    user: &'a Value,
    wall: &'a Value,
}

/// How a fetched user is rendered into one output line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordFormat {
    /// `User Info: <users.get> Wall: <wall.get>`
    #[default]
    Text,
    /// `{"user_id": .., "user": .., "wall": ..}`
    Json,
}

impl RecordFormat {
    /// Render one record, newline-terminated
    pub fn render(&self, item: &WorkItem, user: &Value, wall: &Value) -> String {
        match self {
            RecordFormat::Text => format!("User Info: {} Wall: {}\n", user, wall),
            RecordFormat::Json => {
                let record = JsonRecord {
                    user_id: item.as_str(),
                    user,
                    wall,
                };
                // Serialising borrowed `Value`s cannot fail
                let line = serde_json::to_string(&record).unwrap_or_default();
                format!("{}\n", line)
            }
        }
    }
}

impl FromStr for RecordFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(RecordFormat::Text),
            "json" => Ok(RecordFormat::Json),
            other => Err(format!(
                "unknown output format '{}' (expected 'text' or 'json')",
                other
            )),
        }
    }
}
