//! Yume API access

pub mod client;
pub mod types;

use async_trait::async_trait;

use crate::error::ApiError;

pub use client::ApiClient;
pub use types::{
    AdminUser, AttendanceRecord, AttendanceRecordsResponse, HealthResponse, LeaderboardEntry,
    LeaderboardQuery, LeaderboardResponse, NewAttendanceRecord, RecordsQuery, Tile, TileEvent,
    TileEventDetails, TileEventsResponse, TileProgress, TileProgressResponse,
};

/// Operations the bot performs against the Yume API.
///
/// Implemented over HTTP by [`ApiClient`]; command handlers only see this
/// trait so they can be driven by a mock in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait YumeApi: Send + Sync {
    /// `GET /health`
    async fn health(&self) -> Result<HealthResponse, ApiError>;

    /// `GET /attendance`
    async fn leaderboard(&self, query: &LeaderboardQuery) -> Result<LeaderboardResponse, ApiError>;

    /// `GET /attendance/records`
    async fn attendance_records(
        &self,
        query: &RecordsQuery,
    ) -> Result<AttendanceRecordsResponse, ApiError>;

    /// `POST /attendance/records`, returns the created record
    async fn create_attendance_record(
        &self,
        record: &NewAttendanceRecord,
    ) -> Result<AttendanceRecord, ApiError>;

    /// `GET /tile-events`
    async fn tile_events(&self) -> Result<TileEventsResponse, ApiError>;

    /// `GET /tile-events/{id}`
    async fn tile_event(&self, event_id: u32) -> Result<TileEventDetails, ApiError>;

    /// `GET /tile-events/{id}/progress`, optionally narrowed to one Discord user
    async fn tile_event_progress(
        &self,
        event_id: u32,
        discord_id: Option<String>,
    ) -> Result<TileProgressResponse, ApiError>;

    /// `GET /admin/users`
    async fn admin_user(&self, discord_id: &str) -> Result<AdminUser, ApiError>;
}
