//! HTTP implementation of [`YumeApi`].

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use super::types::{
    AdminUser, AttendanceRecord, AttendanceRecordsResponse, HealthResponse, LeaderboardQuery,
    LeaderboardResponse, NewAttendanceRecord, RecordsQuery, TileEventDetails, TileEventsResponse,
    TileProgressResponse,
};
use super::YumeApi;
use crate::error::ApiError;

/// Stateless Yume API client. Cheap to build, one per invocation.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    token: Option<String>,
    http_client: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str, token: Option<&str>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.map(str::to_string),
            http_client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let builder = self
            .http_client
            .request(method, url)
            .header(CONTENT_TYPE, "application/json");
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        debug!("GET {} {:?}", url, query);
        let builder = self.request(Method::GET, &url).query(query);
        self.send(builder, url).await
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        debug!("POST {}", url);
        let builder = self.request(Method::POST, &url).json(body);
        self.send(builder, url).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        url: String,
    ) -> Result<T, ApiError> {
        let response = builder.send().await.map_err(|source| {
            warn!("Request to {} failed: {}", url, source);
            ApiError::Transport {
                url: url.clone(),
                source,
            }
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|source| ApiError::Transport {
            url: url.clone(),
            source,
        })?;

        if !status.is_success() {
            let message = error_message(status, &body);
            warn!("{} answered {}: {}", url, status, message);
            return Err(ApiError::Status { status, message });
        }

        serde_json::from_str(&body).map_err(|e| {
            warn!("Could not decode response from {}: {}", url, e);
            ApiError::Decode {
                url,
                message: e.to_string(),
            }
        })
    }
}

/// Message for a failed call: the body's `error` field, or the status text
/// when the body is not JSON.
fn error_message(status: StatusCode, body: &str) -> String {
    let fallback = || format!("API Error: {}", status.as_u16());
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => value
            .get("error")
            .and_then(|e| e.as_str())
            .filter(|e| !e.is_empty())
            .map(str::to_string)
            .unwrap_or_else(fallback),
        Err(_) => status
            .canonical_reason()
            .map(str::to_string)
            .unwrap_or_else(fallback),
    }
}

#[async_trait]
impl YumeApi for ApiClient {
    async fn health(&self) -> Result<HealthResponse, ApiError> {
        self.get("/health", &[]).await
    }

    async fn leaderboard(&self, query: &LeaderboardQuery) -> Result<LeaderboardResponse, ApiError> {
        self.get("/attendance", &query.to_query()).await
    }

    async fn attendance_records(
        &self,
        query: &RecordsQuery,
    ) -> Result<AttendanceRecordsResponse, ApiError> {
        self.get("/attendance/records", &query.to_query()).await
    }

    async fn create_attendance_record(
        &self,
        record: &NewAttendanceRecord,
    ) -> Result<AttendanceRecord, ApiError> {
        self.post("/attendance/records", record).await
    }

    async fn tile_events(&self) -> Result<TileEventsResponse, ApiError> {
        self.get("/tile-events", &[]).await
    }

    async fn tile_event(&self, event_id: u32) -> Result<TileEventDetails, ApiError> {
        self.get(&format!("/tile-events/{}", event_id), &[]).await
    }

    async fn tile_event_progress(
        &self,
        event_id: u32,
        discord_id: Option<String>,
    ) -> Result<TileProgressResponse, ApiError> {
        let query: Vec<(&'static str, String)> =
            discord_id.into_iter().map(|id| ("discord_id", id)).collect();
        self.get(&format!("/tile-events/{}/progress", event_id), &query)
            .await
    }

    async fn admin_user(&self, discord_id: &str) -> Result<AdminUser, ApiError> {
        self.get("/admin/users", &[("discord_id", discord_id.to_string())])
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    #[tokio::test]
    async fn test_health_sends_json_content_type() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/health")
            .match_header("content-type", "application/json")
            .match_header("authorization", Matcher::Missing)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"status": "ok"}"#)
            .create_async()
            .await;

        let client = ApiClient::new(&server.url(), None);
        let health = client.health().await.unwrap();
        assert_eq!(health.status, "ok");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_bearer_token_is_forwarded() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/tile-events")
            .match_header("authorization", "Bearer secret-key")
            .with_status(200)
            .with_body(r#"{"events": []}"#)
            .create_async()
            .await;

        let client = ApiClient::new(&server.url(), Some("secret-key"));
        let events = client.tile_events().await.unwrap();
        assert!(events.events.is_empty());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_leaderboard_omits_absent_filters() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/attendance")
            .match_query(Matcher::Exact("limit=10".to_string()))
            .with_status(200)
            .with_body(r#"{"results": [{"name": "Zezima", "count": 12}], "total": 1}"#)
            .create_async()
            .await;

        let client = ApiClient::new(&server.url(), None);
        let query = LeaderboardQuery {
            limit: Some(10),
            ..Default::default()
        };
        let leaderboard = client.leaderboard(&query).await.unwrap();
        assert_eq!(leaderboard.results.len(), 1);
        assert_eq!(leaderboard.results[0].name, "Zezima");
        assert_eq!(leaderboard.total, Some(1));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_attendance_records_query() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/attendance/records")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("name".to_string(), "Iron Yumi".to_string()),
                Matcher::UrlEncoded("limit".to_string(), "5".to_string()),
            ]))
            .with_status(200)
            .with_body(
                r#"{"results": [{"id": 7, "name": "Iron Yumi", "event": "PvM Sunday", "date": "2025-02-02"}], "total": 1}"#,
            )
            .create_async()
            .await;

        let client = ApiClient::new(&server.url(), None);
        let query = RecordsQuery {
            name: Some("Iron Yumi".to_string()),
            limit: Some(5),
            ..Default::default()
        };
        let records = client.attendance_records(&query).await.unwrap();
        assert_eq!(records.results[0].id, Some(7));
        assert_eq!(records.results[0].event, "PvM Sunday");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_create_attendance_record_posts_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/attendance/records")
            .match_header("authorization", "Bearer write-key")
            .match_body(Matcher::Json(serde_json::json!({
                "name": "Zezima",
                "event": "Bingo Night",
                "date": "2025-12-25"
            })))
            .with_status(201)
            .with_body(r#"{"id": 99, "name": "Zezima", "event": "Bingo Night", "date": "2025-12-25"}"#)
            .create_async()
            .await;

        let client = ApiClient::new(&server.url(), Some("write-key"));
        let created = client
            .create_attendance_record(&NewAttendanceRecord {
                name: "Zezima".to_string(),
                event: "Bingo Night".to_string(),
                date: "2025-12-25".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(created.id, Some(99));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_progress_filters_by_discord_id() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/tile-events/4/progress")
            .match_query(Matcher::UrlEncoded(
                "discord_id".to_string(),
                "1234".to_string(),
            ))
            .with_status(200)
            .with_body(
                r#"{"event_name": "Spring Path", "total_tiles": 8, "progress": [{"discord_id": "1234", "current_tile": 2, "tiles_unlocked": [0, 1, 2]}]}"#,
            )
            .create_async()
            .await;

        let client = ApiClient::new(&server.url(), None);
        let progress = client
            .tile_event_progress(4, Some("1234".to_string()))
            .await
            .unwrap();
        assert_eq!(progress.total_tiles, Some(8));
        assert_eq!(progress.progress[0].unlocked(), 3);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_progress_without_discord_id_sends_no_query() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/tile-events/4/progress")
            .match_query(Matcher::Missing)
            .with_status(200)
            .with_body(
                r#"{"progress": [{"discord_id": "1", "current_tile": 0}, {"discord_id": "2", "current_tile": 5}]}"#,
            )
            .create_async()
            .await;

        let client = ApiClient::new(&server.url(), None);
        let progress = client.tile_event_progress(4, None).await.unwrap();
        assert_eq!(progress.progress.len(), 2);
        assert_eq!(progress.event_name, None);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_admin_user_lookup_by_discord_id() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/admin/users")
            .match_header("authorization", "Bearer admin-key")
            .match_query(Matcher::UrlEncoded(
                "discord_id".to_string(),
                "5550001".to_string(),
            ))
            .with_status(200)
            .with_body(
                r#"{"discord_id": "5550001", "username": "yumi", "permissions": ["attendance:write"], "role": "officer"}"#,
            )
            .create_async()
            .await;

        let client = ApiClient::new(&server.url(), Some("admin-key"));
        let user = client.admin_user("5550001").await.unwrap();
        assert_eq!(user.username.as_deref(), Some("yumi"));
        assert_eq!(user.permissions, vec!["attendance:write".to_string()]);
        assert_eq!(user.extra.get("role"), Some(&serde_json::json!("officer")));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_error_body_message_is_used() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/tile-events/1")
            .with_status(500)
            .with_body(r#"{"error": "boom"}"#)
            .create_async()
            .await;

        let client = ApiClient::new(&server.url(), None);
        let err = client.tile_event(1).await.unwrap_err();
        assert_eq!(err.to_string(), "boom");
        assert_eq!(err.api_message(), Some("boom"));
    }

    #[tokio::test]
    async fn test_unparseable_error_body_falls_back_to_status_text() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/health")
            .with_status(500)
            .with_body("<html>oops</html>")
            .create_async()
            .await;

        let client = ApiClient::new(&server.url(), None);
        let err = client.health().await.unwrap_err();
        assert_eq!(err.to_string(), "Internal Server Error");
    }

    #[tokio::test]
    async fn test_malformed_success_body_is_decode_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/attendance")
            .with_status(200)
            .with_body(r#"{"rows": []}"#)
            .create_async()
            .await;

        let client = ApiClient::new(&server.url(), None);
        let err = client
            .leaderboard(&LeaderboardQuery::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Decode { .. }));
    }

    #[test]
    fn test_error_message_without_error_field() {
        assert_eq!(
            error_message(StatusCode::NOT_FOUND, r#"{"detail": "nope"}"#),
            "API Error: 404"
        );
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let client = ApiClient::new("https://api.example.test/", None);
        assert_eq!(client.url("/health"), "https://api.example.test/health");
    }
}
