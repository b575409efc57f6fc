use chrono::{Datelike, NaiveDate};
use tracing::error;

use crate::api::{LeaderboardQuery, LeaderboardResponse, YumeApi};
use crate::reply::{rank_marker, Reply};
use crate::{Context, Error};

pub const DEFAULT_LIMIT: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, poise::ChoiceParameter)]
pub enum Period {
    #[name = "This Month"]
    Month,
    #[name = "This Year"]
    Year,
    #[name = "All Time"]
    All,
}

impl Period {
    /// First day covered by the period, or `None` for all time.
    pub fn start(self, today: NaiveDate) -> Option<NaiveDate> {
        match self {
            Period::Month => Some(today - chrono::Duration::days(i64::from(today.day0()))),
            Period::Year => Some(today - chrono::Duration::days(i64::from(today.ordinal0()))),
            Period::All => None,
        }
    }

    pub fn label(self, today: NaiveDate) -> String {
        match self {
            Period::Month => today.format("%B %Y").to_string(),
            Period::Year => today.year().to_string(),
            Period::All => "All Time".to_string(),
        }
    }
}

/// View event attendance leaderboard
#[poise::command(slash_command, category = "Attendance")]
pub async fn leaderboard(
    ctx: Context<'_>,
    #[description = "Filter by event name (e.g., \"Wildy Wednesday\")"] event: Option<String>,
    #[description = "Time period for the leaderboard"] period: Option<Period>,
    #[description = "Number of results to show (default: 10)"]
    #[min = 1]
    #[max = 25]
    limit: Option<u32>,
) -> Result<(), Error> {
    ctx.defer().await?;

    let today = chrono::Local::now().date_naive();
    let reply = attendance_leaderboard(
        &ctx.data().api(),
        event,
        period.unwrap_or(Period::All),
        limit.unwrap_or(DEFAULT_LIMIT),
        today,
    )
    .await;

    ctx.send(reply.into()).await?;
    Ok(())
}

pub async fn attendance_leaderboard(
    api: &impl YumeApi,
    event: Option<String>,
    period: Period,
    limit: u32,
    today: NaiveDate,
) -> Reply {
    let query = LeaderboardQuery {
        event: event.clone(),
        start: period.start(today),
        end: None,
        limit: Some(limit),
    };

    match api.leaderboard(&query).await {
        Ok(data) => render(&data, event.as_deref(), &period.label(today)),
        Err(e) => {
            error!("Leaderboard error: {}", e);
            Reply::failed("Failed to fetch leaderboard data. Please try again later.")
        }
    }
}

fn render(data: &LeaderboardResponse, event: Option<&str>, period_label: &str) -> Reply {
    if data.results.is_empty() {
        return Reply::no_data(
            "📊 Attendance Leaderboard",
            "No attendance records found for the specified criteria.",
        );
    }

    let entries: Vec<String> = data
        .results
        .iter()
        .enumerate()
        .map(|(i, entry)| format!("{} **{}** — {} events", rank_marker(i), entry.name, entry.count))
        .collect();

    let total = data.total.unwrap_or(data.results.len() as u64);

    Reply::success("📊 Attendance Leaderboard")
        .description(entries.join("\n"))
        .field("📅 Period", period_label, true)
        .field("🎯 Event", event.unwrap_or("All Events"), true)
        .field("👥 Total Players", total.to_string(), true)
        .footer("Yume Tools • Data from api.itai.gg")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{LeaderboardEntry, MockYumeApi};
    use crate::reply::ReplyKind;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_period_start() {
        let today = date(2025, 8, 17);
        assert_eq!(Period::Month.start(today), Some(date(2025, 8, 1)));
        assert_eq!(Period::Year.start(today), Some(date(2025, 1, 1)));
        assert_eq!(Period::All.start(today), None);

        let new_year = date(2026, 1, 1);
        assert_eq!(Period::Month.start(new_year), Some(new_year));
        assert_eq!(Period::Year.start(new_year), Some(new_year));
    }

    #[test]
    fn test_period_label() {
        let today = date(2025, 8, 17);
        assert_eq!(Period::Month.label(today), "August 2025");
        assert_eq!(Period::Year.label(today), "2025");
        assert_eq!(Period::All.label(today), "All Time");
    }

    #[tokio::test]
    async fn test_month_sends_start_boundary() {
        let mut api = MockYumeApi::new();
        api.expect_leaderboard()
            .withf(|q| {
                q.start == NaiveDate::from_ymd_opt(2025, 8, 1)
                    && q.event.as_deref() == Some("PvM Sunday")
                    && q.limit == Some(5)
                    && q.end.is_none()
            })
            .times(1)
            .returning(|_| {
                Ok(LeaderboardResponse {
                    results: vec![
                        LeaderboardEntry { name: "Zezima".to_string(), count: 9 },
                        LeaderboardEntry { name: "Lynx Titan".to_string(), count: 7 },
                        LeaderboardEntry { name: "Woox".to_string(), count: 7 },
                        LeaderboardEntry { name: "B0aty".to_string(), count: 3 },
                    ],
                    total: Some(12),
                })
            });

        let reply = attendance_leaderboard(
            &api,
            Some("PvM Sunday".to_string()),
            Period::Month,
            5,
            date(2025, 8, 17),
        )
        .await;

        assert_eq!(reply.kind, ReplyKind::Success);
        let lines: Vec<&str> = reply.description.as_deref().unwrap().lines().collect();
        assert_eq!(lines[0], "🥇 **Zezima** — 9 events");
        assert_eq!(lines[2], "🥉 **Woox** — 7 events");
        assert_eq!(lines[3], "4. **B0aty** — 3 events");
        assert_eq!(reply.field_value("📅 Period"), Some("August 2025"));
        assert_eq!(reply.field_value("🎯 Event"), Some("PvM Sunday"));
        assert_eq!(reply.field_value("👥 Total Players"), Some("12"));
    }

    #[tokio::test]
    async fn test_all_time_has_no_boundary() {
        let mut api = MockYumeApi::new();
        api.expect_leaderboard()
            .withf(|q| q.start.is_none() && q.event.is_none())
            .returning(|_| {
                Ok(LeaderboardResponse {
                    results: vec![LeaderboardEntry { name: "Zezima".to_string(), count: 1 }],
                    total: None,
                })
            });

        let reply = attendance_leaderboard(&api, None, Period::All, 10, date(2025, 8, 17)).await;
        assert_eq!(reply.field_value("🎯 Event"), Some("All Events"));
        assert_eq!(reply.field_value("👥 Total Players"), Some("1"));
    }

    #[tokio::test]
    async fn test_empty_results() {
        let mut api = MockYumeApi::new();
        api.expect_leaderboard().returning(|_| {
            Ok(LeaderboardResponse {
                results: vec![],
                total: Some(0),
            })
        });

        let reply = attendance_leaderboard(&api, None, Period::Year, 10, date(2025, 8, 17)).await;
        assert_eq!(reply.kind, ReplyKind::NoData);
    }

    #[tokio::test]
    async fn test_api_failure() {
        let mut api = MockYumeApi::new();
        api.expect_leaderboard().returning(|_| {
            Err(crate::error::ApiError::Decode {
                url: "/attendance".to_string(),
                message: "missing field `results`".to_string(),
            })
        });

        let reply = attendance_leaderboard(&api, None, Period::All, 10, date(2025, 8, 17)).await;
        assert_eq!(reply.kind, ReplyKind::Failed);
        assert_eq!(reply.title, "❌ Error");
    }
}
