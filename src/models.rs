use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::dates::optional_timestamp;

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Workspace {
    pub id: u64,
    pub name: String,
    pub premium: bool,
    pub admin: bool,
    #[serde(with = "optional_timestamp", skip_serializing_if = "Option::is_none")]
    pub at: Option<DateTime<FixedOffset>>,
}

/// A customer billed for work, not the software client.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Client {
    #[serde(skip_serializing_if = "is_zero")]
    pub id: u64,
    pub wid: u64,
    pub name: String,
    pub notes: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_private: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<bool>,
    #[serde(with = "optional_timestamp", skip_serializing_if = "Option::is_none")]
    pub at: Option<DateTime<FixedOffset>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Project {
    #[serde(skip_serializing_if = "is_zero")]
    pub id: u64,
    pub wid: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cid: Option<u64>,
    pub name: String,
    pub billable: bool,
    pub is_private: bool,
    pub active: bool,
    pub template: bool,
    pub auto_estimates: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hex_color: Option<String>,
    #[serde(with = "optional_timestamp", skip_serializing_if = "Option::is_none")]
    pub at: Option<DateTime<FixedOffset>>,
    #[serde(with = "optional_timestamp", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<FixedOffset>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_hours: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_hours: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeEntry {
    #[serde(skip_serializing_if = "is_zero")]
    pub id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guid: Option<String>,
    pub wid: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pid: Option<u64>,
    pub billable: bool,
    #[serde(with = "optional_timestamp", skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTime<FixedOffset>>,
    #[serde(with = "optional_timestamp", skip_serializing_if = "Option::is_none")]
    pub stop: Option<DateTime<FixedOffset>>,
    /// Seconds. Negative while the entry is running; the service computes it
    /// from `start` and `stop` when omitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<i64>,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_with: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl TimeEntry {
    pub fn is_running(&self) -> bool {
        self.stop.is_none() && self.duration.is_none_or(|duration| duration < 0)
    }
}

fn is_zero(value: &u64) -> bool {
    *value == 0
}
