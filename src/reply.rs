//! Platform-independent command replies.
//!
//! Handlers build a [`Reply`]; the poise adapters turn it into an embed.

use poise::serenity_prelude as serenity;

pub const YUME_PINK: u32 = 0xE8B4D8;
pub const NO_DATA_ORANGE: u32 = 0xF5A623;
pub const ERROR_RED: u32 = 0xFF4444;
pub const SUCCESS_GREEN: u32 = 0x4CAF50;
pub const ENDED_GREY: u32 = 0x9E9E9E;
pub const COMPLETED_GOLD: u32 = 0xFFD700;

/// What a reply means, independent of its wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyKind {
    Success,
    /// The request worked but matched nothing
    NoData,
    /// Rejected locally before any API call
    Invalid,
    /// A write was attempted without an API token
    NotConfigured,
    /// The API call failed
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub kind: ReplyKind,
    pub title: String,
    pub description: Option<String>,
    pub colour: u32,
    pub fields: Vec<Field>,
    pub footer: Option<String>,
    pub ephemeral: bool,
}

impl Reply {
    pub fn new(kind: ReplyKind, title: impl Into<String>) -> Self {
        let colour = match kind {
            ReplyKind::Success => YUME_PINK,
            ReplyKind::NoData => NO_DATA_ORANGE,
            ReplyKind::Invalid | ReplyKind::NotConfigured | ReplyKind::Failed => ERROR_RED,
        };
        Self {
            kind,
            title: title.into(),
            description: None,
            colour,
            fields: Vec::new(),
            footer: None,
            ephemeral: false,
        }
    }

    pub fn success(title: impl Into<String>) -> Self {
        Self::new(ReplyKind::Success, title)
    }

    pub fn no_data(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(ReplyKind::NoData, title).description(description)
    }

    pub fn invalid(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(ReplyKind::Invalid, title).description(description)
    }

    /// The uniform reply for a failed API call
    pub fn failed(description: impl Into<String>) -> Self {
        Self::new(ReplyKind::Failed, "❌ Error").description(description)
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn colour(mut self, colour: u32) -> Self {
        self.colour = colour;
        self
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        self.fields.push(Field {
            name: name.into(),
            value: value.into(),
            inline,
        });
        self
    }

    pub fn footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }

    pub fn ephemeral(mut self) -> Self {
        self.ephemeral = true;
        self
    }

    pub fn to_embed(&self) -> serenity::CreateEmbed {
        let mut embed = serenity::CreateEmbed::new()
            .title(&self.title)
            .colour(self.colour)
            .timestamp(serenity::Timestamp::now());
        if let Some(description) = &self.description {
            embed = embed.description(description);
        }
        for field in &self.fields {
            embed = embed.field(&field.name, &field.value, field.inline);
        }
        if let Some(footer) = &self.footer {
            embed = embed.footer(serenity::CreateEmbedFooter::new(footer));
        }
        embed
    }
}

#[cfg(test)]
impl Reply {
    /// Value of the first field with this name
    pub fn field_value(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }
}

impl From<Reply> for poise::CreateReply {
    fn from(reply: Reply) -> Self {
        poise::CreateReply::default()
            .embed(reply.to_embed())
            .ephemeral(reply.ephemeral)
    }
}

/// 🥇 🥈 🥉 for the podium, `n.` after that. `index` is zero-based.
pub fn rank_marker(index: usize) -> String {
    match index {
        0 => "🥇".to_string(),
        1 => "🥈".to_string(),
        2 => "🥉".to_string(),
        n => format!("{}.", n + 1),
    }
}
