use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::pet::Pet;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Job {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator_user_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pets: Option<Vec<Pet>>,
}

impl Job {
    /// A job may not end before it starts. Open-ended windows are accepted.
    pub fn has_valid_window(&self) -> bool {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => start <= end,
            _ => true,
        }
    }
}
