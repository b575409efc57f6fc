use chrono::NaiveDate;
use thiserror::Error as ThisError;
use tracing::{error, info};

use crate::api::{NewAttendanceRecord, YumeApi};
use crate::dates::parse_strict_date;
use crate::reply::{Reply, ReplyKind, SUCCESS_GREEN};
use crate::{Context, Error};

#[derive(Debug, Clone, Copy, PartialEq, Eq, poise::ChoiceParameter)]
pub enum ClanEvent {
    #[name = "Wildy Wednesday"]
    WildyWednesday,
    #[name = "PvM Sunday"]
    PvmSunday,
    #[name = "Skill & Chill"]
    SkillAndChill,
    #[name = "Bingo Night"]
    BingoNight,
    #[name = "CoX Mass"]
    CoxMass,
    #[name = "ToB Mass"]
    TobMass,
    #[name = "ToA Mass"]
    ToaMass,
    #[name = "Other"]
    Other,
}

impl ClanEvent {
    pub fn event_name(self) -> &'static str {
        match self {
            ClanEvent::WildyWednesday => "Wildy Wednesday",
            ClanEvent::PvmSunday => "PvM Sunday",
            ClanEvent::SkillAndChill => "Skill & Chill",
            ClanEvent::BingoNight => "Bingo Night",
            ClanEvent::CoxMass => "CoX Mass",
            ClanEvent::TobMass => "ToB Mass",
            ClanEvent::ToaMass => "ToA Mass",
            ClanEvent::Other => "Other",
        }
    }
}

#[derive(Debug, ThisError, PartialEq, Eq)]
pub enum RecordInputError {
    #[error("Please provide a custom event name when selecting \"Other\".")]
    MissingCustomEvent,

    #[error("Date must be in YYYY-MM-DD format (e.g., 2025-12-25)")]
    InvalidDate,
}

impl RecordInputError {
    fn title(&self) -> &'static str {
        match self {
            RecordInputError::MissingCustomEvent => "❌ Missing Custom Event Name",
            RecordInputError::InvalidDate => "❌ Invalid Date Format",
        }
    }
}

impl From<RecordInputError> for Reply {
    fn from(err: RecordInputError) -> Self {
        Reply::invalid(err.title(), err.to_string())
    }
}

/// Log attendance for a clan event (Admin only)
#[poise::command(
    slash_command,
    category = "Attendance",
    default_member_permissions = "MANAGE_GUILD"
)]
pub async fn record(
    ctx: Context<'_>,
    #[description = "RuneScape player name"] player: String,
    #[description = "Event name (e.g., \"Wildy Wednesday\")"] event: ClanEvent,
    #[description = "Custom event name (if \"Other\" selected)"] custom_event: Option<String>,
    #[description = "Date of event (YYYY-MM-DD, defaults to today)"] date: Option<String>,
) -> Result<(), Error> {
    let today = chrono::Local::now().date_naive();
    let prepared = prepare_record(
        ctx.data().config.can_write(),
        &player,
        event,
        custom_event.as_deref(),
        date.as_deref(),
        today,
    );

    let reply = match prepared {
        Ok(new_record) => {
            ctx.defer().await?;
            submit_record(&ctx.data().api(), &new_record, &ctx.author().tag()).await
        }
        Err(reply) => reply,
    };

    ctx.send(reply.into()).await?;
    Ok(())
}

/// Pick the event name sent to the API.
pub fn resolve_event(event: ClanEvent, custom_event: Option<&str>) -> Result<String, RecordInputError> {
    match event {
        ClanEvent::Other => custom_event
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .ok_or(RecordInputError::MissingCustomEvent),
        other => Ok(other.event_name().to_string()),
    }
}

/// Today when omitted, otherwise a strict `YYYY-MM-DD` calendar date.
pub fn resolve_date(input: Option<&str>, today: NaiveDate) -> Result<NaiveDate, RecordInputError> {
    match input {
        None => Ok(today),
        Some(raw) => parse_strict_date(raw).ok_or(RecordInputError::InvalidDate),
    }
}

/// Everything `/record` checks before touching the network. The error side is
/// the reply to send instead.
pub fn prepare_record(
    can_write: bool,
    player: &str,
    event: ClanEvent,
    custom_event: Option<&str>,
    date: Option<&str>,
    today: NaiveDate,
) -> Result<NewAttendanceRecord, Reply> {
    if !can_write {
        return Err(Reply::new(ReplyKind::NotConfigured, "❌ Not Configured")
            .description("API key not configured. Contact an administrator.")
            .ephemeral());
    }

    let event = resolve_event(event, custom_event)?;
    let date = resolve_date(date, today)?;

    Ok(NewAttendanceRecord {
        name: player.to_string(),
        event,
        date: date.format("%Y-%m-%d").to_string(),
    })
}

pub async fn submit_record(api: &impl YumeApi, new_record: &NewAttendanceRecord, recorded_by: &str) -> Reply {
    match api.create_attendance_record(new_record).await {
        Ok(created) => {
            info!(
                "Recorded {} at '{}' on {} (by {})",
                new_record.name, new_record.event, new_record.date, recorded_by
            );
            let record_id = created
                .id
                .map(|id| id.to_string())
                .unwrap_or_else(|| "Created".to_string());

            Reply::success("✅ Attendance Recorded")
                .colour(SUCCESS_GREEN)
                .description(format!("Successfully logged attendance for **{}**", new_record.name))
                .field("🎯 Event", &new_record.event, true)
                .field("📅 Date", &new_record.date, true)
                .field("🆔 Record ID", record_id, true)
                .footer(format!("Recorded by {}", recorded_by))
        }
        Err(e) => {
            error!("Record error: {}", e);
            let message = e
                .api_message()
                .unwrap_or("Failed to create attendance record. Please try again.");
            Reply::new(ReplyKind::Failed, "❌ Failed to Record").description(message)
        }
    }
}
