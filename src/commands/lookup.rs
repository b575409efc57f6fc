use std::collections::HashSet;

use chrono::NaiveDate;
use tracing::error;

use crate::api::{AttendanceRecordsResponse, RecordsQuery, YumeApi};
use crate::dates::short_date;
use crate::reply::Reply;
use crate::{Context, Error};

pub const DEFAULT_LIMIT: u32 = 10;
/// The embed never lists more events than this, whatever the limit
const MAX_LISTED: usize = 10;

/// Look up a player's attendance history
#[poise::command(slash_command, category = "Attendance")]
pub async fn lookup(
    ctx: Context<'_>,
    #[description = "Player name to look up (RuneScape name)"] name: String,
    #[description = "Number of recent events to show (default: 10)"]
    #[min = 1]
    #[max = 25]
    limit: Option<u32>,
) -> Result<(), Error> {
    ctx.defer().await?;

    let today = chrono::Local::now().date_naive();
    let reply = player_lookup(
        &ctx.data().api(),
        &name,
        limit.unwrap_or(DEFAULT_LIMIT),
        today,
    )
    .await;

    ctx.send(reply.into()).await?;
    Ok(())
}

pub async fn player_lookup(api: &impl YumeApi, name: &str, limit: u32, today: NaiveDate) -> Reply {
    let query = RecordsQuery {
        name: Some(name.to_string()),
        limit: Some(limit),
        ..Default::default()
    };

    match api.attendance_records(&query).await {
        Ok(data) => render(&data, name, limit, today),
        Err(e) => {
            error!("Lookup error: {}", e);
            Reply::failed("Failed to look up player. Please try again later.")
        }
    }
}

fn render(data: &AttendanceRecordsResponse, name: &str, limit: u32, today: NaiveDate) -> Reply {
    let Some(first) = data.results.first() else {
        return Reply::no_data(
            format!("🔍 Player Lookup: {}", name),
            "No attendance records found for this player.",
        )
        .field(
            "💡 Tip",
            "Make sure you're using the exact RuneScape name (spaces matter!)",
            false,
        );
    };

    let unique_events: HashSet<&str> = data.results.iter().map(|r| r.event.as_str()).collect();

    let recent: Vec<String> = data
        .results
        .iter()
        .take(MAX_LISTED)
        .map(|r| format!("• **{}** — {}", r.event, short_date(&r.date, today)))
        .collect();

    let total = data.total.unwrap_or(data.results.len() as u64);
    let shown = (limit as usize).min(data.results.len());

    Reply::success(format!("🔍 Player Lookup: {}", first.name))
        .description(recent.join("\n"))
        .field("📊 Total Events", total.to_string(), true)
        .field("🎯 Unique Events", unique_events.len().to_string(), true)
        .footer(format!("Showing {} most recent events", shown))
}
