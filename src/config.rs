//! Runtime configuration read from the environment.

use base64::Engine;

use crate::error::{BotError, Result};

pub const DEFAULT_API_BASE_URL: &str = "https://api.itai.gg";

#[derive(Clone)]
pub struct Config {
    pub discord_token: String,
    /// Application id, needed to deploy commands without a gateway session
    pub application_id: Option<u64>,
    /// Register commands to this guild instead of globally
    pub guild_id: Option<u64>,
    pub api_base_url: String,
    /// Bearer token for the Yume API. Writes are refused without it.
    pub api_key: Option<String>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("application_id", &self.application_id)
            .field("guild_id", &self.guild_id)
            .field("api_base_url", &self.api_base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<set>"))
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the config from any variable source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let discord_token = var("DISCORD_TOKEN").ok_or(BotError::MissingEnv {
            name: "DISCORD_TOKEN",
        })?;

        let application_id = match var("DISCORD_CLIENT_ID") {
            Some(raw) => Some(parse_id("DISCORD_CLIENT_ID", &raw)?),
            None => application_id_from_token(&discord_token),
        };

        let guild_id = var("DISCORD_GUILD_ID")
            .map(|raw| parse_id("DISCORD_GUILD_ID", &raw))
            .transpose()?;

        Ok(Self {
            discord_token,
            application_id,
            guild_id,
            api_base_url: var("API_BASE_URL").unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            api_key: var("API_KEY"),
        })
    }

    pub fn can_write(&self) -> bool {
        self.api_key.is_some()
    }
}

fn parse_id(name: &'static str, raw: &str) -> Result<u64> {
    raw.trim().parse::<u64>().map_err(|e| BotError::InvalidEnv {
        name,
        message: e.to_string(),
    })
}

/// The first segment of a bot token is the base64 encoded application id.
pub fn application_id_from_token(token: &str) -> Option<u64> {
    let encoded = token.split('.').next()?;
    // Discord tokens use URL-safe base64 without padding
    let decoded = base64::engine::general_purpose::STANDARD_NO_PAD
        .decode(encoded)
        .or_else(|_| base64::engine::general_purpose::URL_SAFE_NO_PAD.decode(encoded))
        .ok()?;
    String::from_utf8(decoded).ok()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_missing_token_is_an_error() {
        let err = Config::from_lookup(lookup(&[("API_KEY", "k")])).unwrap_err();
        assert!(matches!(err, BotError::MissingEnv { name: "DISCORD_TOKEN" }));
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[("DISCORD_TOKEN", "not-a-real-token")])).unwrap();
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert!(config.api_key.is_none());
        assert!(config.guild_id.is_none());
        assert!(!config.can_write());
    }

    #[test]
    fn test_empty_api_key_counts_as_unset() {
        let config = Config::from_lookup(lookup(&[
            ("DISCORD_TOKEN", "token"),
            ("API_KEY", "  "),
        ]))
        .unwrap();
        assert!(!config.can_write());
    }

    #[test]
    fn test_invalid_guild_id() {
        let err = Config::from_lookup(lookup(&[
            ("DISCORD_TOKEN", "token"),
            ("DISCORD_GUILD_ID", "guild"),
        ]))
        .unwrap_err();
        assert!(matches!(err, BotError::InvalidEnv { name: "DISCORD_GUILD_ID", .. }));
    }

    #[test]
    fn test_application_id_from_token() {
        // "1446582844553035918" base64 encoded without padding
        let token = "MTQ0NjU4Mjg0NDU1MzAzNTkxOA.GxYzAb.signature";
        assert_eq!(application_id_from_token(token), Some(1446582844553035918));

        let config = Config::from_lookup(lookup(&[("DISCORD_TOKEN", token)])).unwrap();
        assert_eq!(config.application_id, Some(1446582844553035918));
    }

    #[test]
    fn test_explicit_client_id_wins() {
        let config = Config::from_lookup(lookup(&[
            ("DISCORD_TOKEN", "MTQ0NjU4Mjg0NDU1MzAzNTkxOA.x.y"),
            ("DISCORD_CLIENT_ID", "42"),
        ]))
        .unwrap();
        assert_eq!(config.application_id, Some(42));
    }
}
