use anyhow::Result;
use clap::Parser;
use dotenv::dotenv;
use poise::serenity_prelude as serenity;
use tracing::{error, info, warn};

/// Discord bot for Yume clan attendance and tile events
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Register commands to this guild instead of globally (overrides DISCORD_GUILD_ID)
    #[arg(long)]
    guild_id: Option<u64>,

    /// Register the slash commands and exit without connecting to the gateway
    #[arg(long)]
    deploy_only: bool,

    /// Connect without re-registering slash commands
    #[arg(long, conflicts_with = "deploy_only")]
    skip_register: bool,
}

mod api;
mod commands;
mod config;
mod dates;
mod deploy;
mod error;
mod logging;
mod reply;

use api::ApiClient;
use config::Config;

type Error = Box<dyn std::error::Error + Send + Sync>;
type Context<'a> = poise::Context<'a, Data, Error>;

/// Shared application state, immutable once the bot is running
pub struct Data {
    pub config: Config,
}

impl Data {
    /// A fresh Yume API client for one invocation
    pub fn api(&self) -> ApiClient {
        ApiClient::new(&self.config.api_base_url, self.config.api_key.as_deref())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let args = Args::parse();

    logging::init();

    let mut config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return Err(e.into());
        }
    };
    if args.guild_id.is_some() {
        config.guild_id = args.guild_id;
    }

    if args.deploy_only {
        deploy::deploy_only(&config).await?;
        return Ok(());
    }

    info!("Starting Yume Bot...");
    let token = config.discord_token.clone();
    let register = !args.skip_register;

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: commands::all(),
            pre_command: |ctx| {
                Box::pin(async move {
                    info!(
                        "Command '{}' invoked by {} (ID: {}) in {}",
                        ctx.command().qualified_name,
                        ctx.author().name,
                        ctx.author().id,
                        ctx.guild_id().map(|g| g.to_string()).unwrap_or_else(|| "DM".to_string())
                    );
                })
            },
            post_command: |ctx| {
                Box::pin(async move {
                    info!(
                        "Command '{}' completed for {}",
                        ctx.command().qualified_name,
                        ctx.author().name
                    );
                })
            },
            on_error: |error| {
                Box::pin(async move {
                    match error {
                        poise::FrameworkError::Command { error, ctx, .. } => {
                            error!("Error executing '{}': {}", ctx.command().qualified_name, error);
                            let reply = poise::CreateReply::default()
                                .content("❌ There was an error executing this command!")
                                .ephemeral(true);
                            if let Err(e) = ctx.send(reply).await {
                                error!("Failed to send error reply: {}", e);
                            }
                        }
                        poise::FrameworkError::ArgumentParse { error, input, ctx, .. } => {
                            error!("Argument parse error in '{}': {} (input: {:?})", ctx.command().qualified_name, error, input);
                        }
                        poise::FrameworkError::MissingUserPermissions { missing_permissions, ctx, .. } => {
                            warn!("User {} missing permissions for '{}': {:?}", ctx.author().name, ctx.command().qualified_name, missing_permissions);
                        }
                        poise::FrameworkError::UnknownInteraction { interaction, .. } => {
                            warn!("No command matching '{}' was found", interaction.data.name);
                        }
                        other => {
                            error!("Other framework error: {}", other);
                        }
                    }
                })
            },
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!("Yume Bot is online!");
                info!("Logged in as: {}", ready.user.tag());
                info!("Serving {} guild(s)", ready.guilds.len());
                info!("API: {}", config.api_base_url);

                ctx.set_presence(
                    Some(serenity::ActivityData::playing("🌸 /help for commands")),
                    serenity::OnlineStatus::Online,
                );

                if register {
                    if let Err(e) = deploy::register_commands(
                        &ctx.http,
                        &framework.options().commands,
                        config.guild_id,
                    )
                    .await
                    {
                        error!("Failed to register commands: {}", e);
                    }
                } else {
                    info!("--skip-register: keeping the commands already registered with Discord");
                }

                if !config.can_write() {
                    warn!("API_KEY not set: /record will refuse to write attendance");
                }

                Ok(Data { config })
            })
        })
        .build();

    // Slash commands only, no privileged intents needed
    let intents = serenity::GatewayIntents::non_privileged();

    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await?;

    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        info!("Shutting down Yume Bot...");
        shard_manager.shutdown_all().await;
    });

    info!("Starting bot...");
    client.start().await?;
    warn!("Bot ended.");

    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
