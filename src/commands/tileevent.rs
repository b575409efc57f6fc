use std::cmp::Ordering;

use tracing::error;

use crate::api::{TileEventDetails, TileEventsResponse, TileProgress, TileProgressResponse, YumeApi};
use crate::dates::{long_date, parse_timestamp};
use crate::error::ApiError;
use crate::reply::{
    rank_marker, Reply, COMPLETED_GOLD, ENDED_GREY, ERROR_RED, SUCCESS_GREEN, YUME_PINK,
};
use crate::{Context, Error};

const PREVIEW_TILES: usize = 5;
const MAX_PAST_EVENTS: usize = 3;
const LEADERBOARD_SIZE: usize = 10;
const BAR_SEGMENTS: usize = 10;

/// View tile event information
#[poise::command(
    slash_command,
    category = "Tile Events",
    subcommands("list", "info", "progress", "standings"),
    subcommand_required
)]
pub async fn tileevent(_ctx: Context<'_>) -> Result<(), Error> {
    Ok(())
}

/// View all active tile events
#[poise::command(slash_command)]
pub async fn list(ctx: Context<'_>) -> Result<(), Error> {
    ctx.defer().await?;
    let reply = event_list(&ctx.data().api()).await;
    ctx.send(reply.into()).await?;
    Ok(())
}

/// View details about a specific tile event
#[poise::command(slash_command)]
pub async fn info(
    ctx: Context<'_>,
    #[description = "The tile event ID"] event_id: u32,
) -> Result<(), Error> {
    ctx.defer().await?;
    let reply = event_info(&ctx.data().api(), event_id).await;
    ctx.send(reply.into()).await?;
    Ok(())
}

/// Check your progress in a tile event
#[poise::command(slash_command)]
pub async fn progress(
    ctx: Context<'_>,
    #[description = "The tile event ID"] event_id: u32,
) -> Result<(), Error> {
    ctx.defer().await?;
    let discord_id = ctx.author().id.to_string();
    let reply = own_progress(&ctx.data().api(), event_id, discord_id).await;
    ctx.send(reply.into()).await?;
    Ok(())
}

/// View tile event leaderboard
#[poise::command(slash_command, rename = "leaderboard")]
pub async fn standings(
    ctx: Context<'_>,
    #[description = "The tile event ID"] event_id: u32,
) -> Result<(), Error> {
    ctx.defer().await?;
    let reply = event_standings(&ctx.data().api(), event_id).await;
    ctx.send(reply.into()).await?;
    Ok(())
}

fn failed(e: ApiError) -> Reply {
    error!("Tile event error: {}", e);
    Reply::failed("Failed to fetch tile event data. Please try again later.")
}

pub async fn event_list(api: &impl YumeApi) -> Reply {
    match api.tile_events().await {
        Ok(data) => render_list(&data),
        Err(e) => failed(e),
    }
}

fn render_list(data: &TileEventsResponse) -> Reply {
    if data.events.is_empty() {
        return Reply::no_data("🎮 Tile Events", "No tile events are currently active.");
    }

    let (active, ended): (Vec<_>, Vec<_>) = data.events.iter().partition(|e| e.is_active);

    let mut reply = Reply::success("🎮 Tile Events")
        .description("Use `/tileevent info <event_id>` for details")
        .footer("Yume Tools");

    if !active.is_empty() {
        let active_list: Vec<String> = active
            .iter()
            .map(|e| {
                format!(
                    "**#{}** {}\n↳ {} tiles • {} participants",
                    e.id, e.name, e.tile_count, e.participant_count
                )
            })
            .collect();
        reply = reply.field("🟢 Active Events", active_list.join("\n\n"), false);
    }

    if !ended.is_empty() && ended.len() <= MAX_PAST_EVENTS {
        let ended_list: Vec<String> = ended
            .iter()
            .map(|e| format!("**#{}** {} (ended)", e.id, e.name))
            .collect();
        reply = reply.field("⚫ Past Events", ended_list.join("\n"), false);
    }

    reply
}

pub async fn event_info(api: &impl YumeApi, event_id: u32) -> Reply {
    match api.tile_event(event_id).await {
        Ok(data) => render_info(&data, event_id),
        Err(e) => failed(e),
    }
}

fn render_info(data: &TileEventDetails, event_id: u32) -> Reply {
    let Some(event) = &data.event else {
        return Reply::no_data(
            "❌ Event Not Found",
            format!("No tile event found with ID **{}**", event_id),
        )
        .colour(ERROR_RED);
    };

    let (status, colour) = if event.is_active {
        ("🟢 Active", SUCCESS_GREEN)
    } else {
        ("⚫ Ended", ENDED_GREY)
    };

    let mut reply = Reply::success(format!("🎮 {}", event.name))
        .colour(colour)
        .description(
            event
                .description
                .as_deref()
                .filter(|d| !d.is_empty())
                .unwrap_or("No description provided."),
        )
        .field("Status", status, true)
        .field("Tiles", data.tiles.len().to_string(), true)
        .field("Participants", event.participant_count.to_string(), true)
        .footer(format!("Event ID: {}", event_id));

    if !data.tiles.is_empty() {
        let mut preview: Vec<String> = data
            .tiles
            .iter()
            .take(PREVIEW_TILES)
            .enumerate()
            .map(|(i, tile)| {
                let icon = if tile.is_start {
                    "🏁"
                } else if tile.is_end {
                    "🏆"
                } else {
                    "▫️"
                };
                format!("{} **{}.** {}", icon, i + 1, tile.title)
            })
            .collect();
        if data.tiles.len() > PREVIEW_TILES {
            preview.push("... and more".to_string());
        }
        reply = reply.field(
            format!("📋 Tile Path Preview ({} total)", data.tiles.len()),
            preview.join("\n"),
            false,
        );
    }

    reply
}

/// Share of unlocked tiles, rounded to the nearest whole percent.
pub fn percentage(unlocked: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (unlocked as f64 / total as f64 * 100.0).round() as u32
}

/// Ten segment bar, one segment per rounded ten percent.
pub fn progress_bar(percent: u32) -> String {
    let filled = ((percent as usize * BAR_SEGMENTS + 50) / 100).min(BAR_SEGMENTS);
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_SEGMENTS - filled))
}

fn event_label(data: &TileProgressResponse, event_id: u32) -> String {
    data.event_name
        .clone()
        .unwrap_or_else(|| format!("Event #{}", event_id))
}

pub async fn own_progress(api: &impl YumeApi, event_id: u32, discord_id: String) -> Reply {
    match api.tile_event_progress(event_id, Some(discord_id)).await {
        Ok(data) => render_progress(&data, event_id),
        Err(e) => failed(e),
    }
}

fn render_progress(data: &TileProgressResponse, event_id: u32) -> Reply {
    let Some(progress) = data.progress.first() else {
        return Reply::no_data(
            "🎮 Your Progress",
            "You haven't started this tile event yet!\n\nVisit the website to begin your journey.",
        );
    };

    let unlocked = progress.unlocked();
    let total = data
        .total_tiles
        .map(|t| t as usize)
        .filter(|t| *t > 0)
        .unwrap_or(unlocked);
    let percent = percentage(unlocked, total);
    let completed = progress.completed();

    let (title, colour) = match completed {
        Some(_) => ("🏆 Event Completed!", COMPLETED_GOLD),
        None => ("🎮 Your Progress", YUME_PINK),
    };

    let mut reply = Reply::success(title)
        .colour(colour)
        .description(format!("**Event:** {}", event_label(data, event_id)))
        .field("Current Tile", format!("#{}", u64::from(progress.current_tile) + 1), true)
        .field("Tiles Completed", format!("{}/{}", unlocked, total), true)
        .field("Progress", format!("{} {}%", progress_bar(percent), percent), false);

    if let Some(completed_at) = completed {
        reply = reply.field("🎉 Completed On", long_date(completed_at), false);
    }

    reply
}

/// Leaderboard order: most unlocked tiles first. Ties go to whoever finished,
/// earliest finish first; unfinished ties keep the API's order.
pub fn compare_participants(a: &TileProgress, b: &TileProgress) -> Ordering {
    b.unlocked()
        .cmp(&a.unlocked())
        .then_with(|| match (a.completed(), b.completed()) {
            (Some(x), Some(y)) => compare_timestamps(x, y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
}

/// Readable timestamps order by instant and sort before unreadable ones,
/// which order lexically among themselves.
fn compare_timestamps(x: &str, y: &str) -> Ordering {
    match (parse_timestamp(x), parse_timestamp(y)) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => x.cmp(y),
    }
}

pub fn rank_participants(participants: &[TileProgress]) -> Vec<&TileProgress> {
    let mut ranked: Vec<&TileProgress> = participants.iter().collect();
    ranked.sort_by(|a, b| compare_participants(a, b));
    ranked
}

pub async fn event_standings(api: &impl YumeApi, event_id: u32) -> Reply {
    match api.tile_event_progress(event_id, None).await {
        Ok(data) => render_standings(&data, event_id),
        Err(e) => failed(e),
    }
}

fn render_standings(data: &TileProgressResponse, event_id: u32) -> Reply {
    if data.progress.is_empty() {
        return Reply::no_data("🏆 Tile Event Leaderboard", "No participants yet for this event.");
    }

    let entries: Vec<String> = rank_participants(&data.progress)
        .into_iter()
        .take(LEADERBOARD_SIZE)
        .enumerate()
        .map(|(i, p)| {
            let done = if p.completed().is_some() { " ✅" } else { "" };
            format!(
                "{} **{}** — {} tiles{}",
                rank_marker(i),
                p.display_name(),
                p.unlocked(),
                done
            )
        })
        .collect();

    Reply::success("🏆 Tile Event Leaderboard")
        .description(entries.join("\n"))
        .field("Event", event_label(data, event_id), true)
        .field("Participants", data.progress.len().to_string(), true)
        .footer("Yume Tools")
}
