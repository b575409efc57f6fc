//! Request and response shapes of the Yume API.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Body of `GET /health`
#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Filters for `GET /attendance`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeaderboardQuery {
    pub event: Option<String>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub limit: Option<u32>,
}

impl LeaderboardQuery {
    /// Query pairs for the filters that are set, in a stable order.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(event) = &self.event {
            query.push(("event", event.clone()));
        }
        push_date(&mut query, "start", self.start);
        push_date(&mut query, "end", self.end);
        if let Some(limit) = self.limit {
            query.push(("limit", limit.to_string()));
        }
        query
    }
}

/// Filters for `GET /attendance/records`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordsQuery {
    pub name: Option<String>,
    pub event: Option<String>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl RecordsQuery {
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(name) = &self.name {
            query.push(("name", name.clone()));
        }
        if let Some(event) = &self.event {
            query.push(("event", event.clone()));
        }
        push_date(&mut query, "start", self.start);
        push_date(&mut query, "end", self.end);
        if let Some(page) = self.page {
            query.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit {
            query.push(("limit", limit.to_string()));
        }
        query
    }
}

fn push_date(query: &mut Vec<(&'static str, String)>, key: &'static str, date: Option<NaiveDate>) {
    if let Some(date) = date {
        query.push((key, date.format("%Y-%m-%d").to_string()));
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub count: u64,
}

/// Body of `GET /attendance`. Entries are already ranked by the API.
#[derive(Debug, Clone, Deserialize)]
pub struct LeaderboardResponse {
    pub results: Vec<LeaderboardEntry>,
    #[serde(default)]
    pub total: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AttendanceRecord {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    pub event: String,
    /// `YYYY-MM-DD`, possibly followed by a time part
    pub date: String,
}

/// Body of `GET /attendance/records`, most recent first
#[derive(Debug, Clone, Deserialize)]
pub struct AttendanceRecordsResponse {
    pub results: Vec<AttendanceRecord>,
    #[serde(default)]
    pub total: Option<u64>,
}

/// Body of `POST /attendance/records`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewAttendanceRecord {
    pub name: String,
    pub event: String,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TileEvent {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub is_active: bool,
    #[serde(default)]
    pub tile_count: u32,
    #[serde(default)]
    pub participant_count: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TileEventsResponse {
    pub events: Vec<TileEvent>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Tile {
    pub title: String,
    #[serde(default)]
    pub is_start: bool,
    #[serde(default)]
    pub is_end: bool,
}

/// Body of `GET /tile-events/{id}`. `event` is null for unknown ids.
#[derive(Debug, Clone, Deserialize)]
pub struct TileEventDetails {
    #[serde(default)]
    pub event: Option<TileEvent>,
    #[serde(default)]
    pub tiles: Vec<Tile>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TileProgress {
    pub discord_id: String,
    #[serde(default)]
    pub discord_username: Option<String>,
    #[serde(default)]
    pub global_name: Option<String>,
    pub current_tile: u32,
    #[serde(default, deserialize_with = "unlocked_tiles")]
    pub tiles_unlocked: Vec<u32>,
    #[serde(default)]
    pub completed_at: Option<String>,
}

/// Anything other than a list of tile numbers counts as nothing unlocked.
fn unlocked_tiles<'de, D>(deserializer: D) -> Result<Vec<u32>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

impl TileProgress {
    pub fn unlocked(&self) -> usize {
        self.tiles_unlocked.len()
    }

    /// Completion timestamp, if the participant reached the end
    pub fn completed(&self) -> Option<&str> {
        self.completed_at.as_deref().filter(|c| !c.is_empty())
    }

    pub fn display_name(&self) -> String {
        self.discord_username
            .clone()
            .or_else(|| self.global_name.clone())
            .unwrap_or_else(|| format!("User {}", self.discord_id))
    }
}

/// Body of `GET /tile-events/{id}/progress`
#[derive(Debug, Clone, Deserialize)]
pub struct TileProgressResponse {
    #[serde(default)]
    pub event_name: Option<String>,
    #[serde(default)]
    pub total_tiles: Option<u32>,
    pub progress: Vec<TileProgress>,
}

/// Body of `GET /admin/users`. Only the identity and permission list are
/// typed; anything else the API sends is kept as-is.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminUser {
    #[serde(default)]
    pub discord_id: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}
