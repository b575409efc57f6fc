//! Slash command registration with Discord.

use poise::serenity_prelude as serenity;
use tracing::info;

use crate::config::Config;
use crate::error::{BotError, Result};
use crate::{commands, Data, Error};

/// Push the command list to one guild (instant) or globally (can take up to
/// an hour to show up).
pub async fn register_commands(
    http: &serenity::Http,
    commands: &[poise::Command<Data, Error>],
    guild_id: Option<u64>,
) -> Result<Vec<serenity::Command>> {
    let create_commands = poise::builtins::create_application_commands(commands);

    let deployed = match guild_id {
        Some(guild_id) => {
            info!("Registering commands to guild: {}", guild_id);
            serenity::GuildId::new(guild_id)
                .set_commands(http, create_commands)
                .await?
        }
        None => {
            info!("Registering commands globally (may take up to 1 hour to propagate)");
            serenity::Command::set_global_commands(http, create_commands).await?
        }
    };

    info!("Successfully registered {} command(s)", deployed.len());
    Ok(deployed)
}

/// Register the commands over plain HTTP, without opening a gateway session.
pub async fn deploy_only(config: &Config) -> Result<()> {
    let application_id = config.application_id.ok_or(BotError::MissingEnv {
        name: "DISCORD_CLIENT_ID",
    })?;

    let http = serenity::Http::new(&config.discord_token);
    http.set_application_id(serenity::ApplicationId::new(application_id));

    let deployed = register_commands(&http, &commands::all(), config.guild_id).await?;
    for command in &deployed {
        info!("  /{} - {}", command.name, command.description);
    }
    Ok(())
}
