use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::api::YumeApi;
use crate::error::ApiError;
use crate::reply::Reply;
use crate::{Context, Error};

/// Display available commands and bot information
#[poise::command(slash_command, category = "Utility")]
pub async fn help(ctx: Context<'_>) -> Result<(), Error> {
    ctx.send(help_reply().into()).await?;
    Ok(())
}

pub fn help_reply() -> Reply {
    Reply::success("🌸 Yume Bot Commands")
        .description("Your companion for clan event tracking and management!")
        .field(
            "📊 Attendance",
            [
                "`/leaderboard` - View event attendance leaderboard",
                "`/lookup <name>` - Look up a player's attendance history",
                "`/record` - Log attendance for an event (Admin)",
            ]
            .join("\n"),
            false,
        )
        .field(
            "🎮 Tile Events",
            [
                "`/tileevent list` - View active tile events",
                "`/tileevent info <event>` - View details about a tile event",
                "`/tileevent progress <event>` - Check your progress",
                "`/tileevent leaderboard <event>` - View event leaderboard",
            ]
            .join("\n"),
            false,
        )
        .field(
            "🔧 Utility",
            [
                "`/ping` - Check bot and API status",
                "`/help` - Show this help message",
            ]
            .join("\n"),
            false,
        )
        .footer("Yume Tools • github.com/yume-tools")
}

/// Check bot latency and API status
#[poise::command(slash_command, category = "Utility")]
pub async fn ping(ctx: Context<'_>) -> Result<(), Error> {
    let started = Instant::now();
    let handle = ctx.say("🏓 Pinging...").await?;
    let bot_latency = started.elapsed();
    let ws_latency = ctx.ping().await;

    let probe = probe_api(&ctx.data().api()).await;
    info!("API health probe: {:?}", probe);

    let reply = status_reply(bot_latency, ws_latency, &probe);
    handle
        .edit(
            ctx,
            poise::CreateReply::default()
                .content("")
                .embed(reply.to_embed()),
        )
        .await?;
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiStatus {
    Online,
    Degraded,
    Error,
    Offline,
}

impl ApiStatus {
    pub fn label(self) -> &'static str {
        match self {
            ApiStatus::Online => "✅ Online",
            ApiStatus::Degraded => "⚠️ Degraded",
            ApiStatus::Error => "❌ Error",
            ApiStatus::Offline => "❌ Offline",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiProbe {
    pub status: ApiStatus,
    /// Absent when no response came back at all
    pub latency: Option<Duration>,
}

/// Timed `GET /health`.
pub async fn probe_api(api: &impl YumeApi) -> ApiProbe {
    let started = Instant::now();
    let result = api.health().await;
    let latency = started.elapsed();

    let status = match &result {
        Ok(health) if health.status == "ok" => ApiStatus::Online,
        Ok(_) => ApiStatus::Degraded,
        Err(ApiError::Status { .. }) => ApiStatus::Error,
        // An unreadable body has no status value to report
        Err(ApiError::Decode { .. }) | Err(ApiError::Transport { .. }) => ApiStatus::Offline,
    };
    if let Err(e) = &result {
        warn!("API health probe failed: {}", e);
    }

    let answered = !matches!(result, Err(ApiError::Transport { .. }));
    ApiProbe {
        status,
        latency: answered.then_some(latency),
    }
}

pub fn status_reply(bot_latency: Duration, ws_latency: Duration, probe: &ApiProbe) -> Reply {
    let api_latency = probe
        .latency
        .map(|l| format!("{}ms", l.as_millis()))
        .unwrap_or_else(|| "N/A".to_string());

    Reply::success("🌸 Yume Bot Status")
        .field("🤖 Bot Latency", format!("{}ms", bot_latency.as_millis()), true)
        .field("💓 WebSocket", format!("{}ms", ws_latency.as_millis()), true)
        .field("🔗 API Status", probe.status.label(), true)
        .field("⚡ API Latency", api_latency, true)
        .footer("Yume Tools")
}
