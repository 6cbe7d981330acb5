#[cfg(feature = "cli")]
pub mod cli;
pub mod env;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;

use crate::utils::error::Result;
use crate::utils::validation::{
    validate_range, validate_secret, validate_snowflake, validate_url, Validate,
};
use std::fmt;
use std::time::Duration;

pub const DEFAULT_VERIFY_ENDPOINT: &str = "https://www.google.com/recaptcha/api/siteverify";
pub const DEFAULT_DISCORD_API_BASE: &str = "https://discordapp.com/api";
pub const DEFAULT_INVITE_BASE_URL: &str = "https://discord.gg/";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Process-wide settings, built once at startup and borrowed by the broker.
#[derive(Clone, PartialEq, Eq)]
pub struct BrokerConfig {
    pub recaptcha_secret: String,
    pub discord_channel_id: String,
    pub discord_token: String,
    pub verify_endpoint: String,
    pub discord_api_base: String,
    pub invite_base_url: String,
    pub request_timeout_secs: u64,
}

impl BrokerConfig {
    pub fn new(
        recaptcha_secret: impl Into<String>,
        discord_channel_id: impl Into<String>,
        discord_token: impl Into<String>,
    ) -> Self {
        Self {
            recaptcha_secret: recaptcha_secret.into(),
            discord_channel_id: discord_channel_id.into(),
            discord_token: discord_token.into(),
            verify_endpoint: DEFAULT_VERIFY_ENDPOINT.to_string(),
            discord_api_base: DEFAULT_DISCORD_API_BASE.to_string(),
            invite_base_url: DEFAULT_INVITE_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn invites_url(&self) -> String {
        format!(
            "{}/channels/{}/invites",
            self.discord_api_base.trim_end_matches('/'),
            self.discord_channel_id
        )
    }

    pub fn invite_link(&self, code: &str) -> String {
        format!("{}{}", self.invite_base_url, code)
    }
}

// 手寫 Debug，避免 secret 跟 bot token 被印進 log
impl fmt::Debug for BrokerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BrokerConfig")
            .field("recaptcha_secret", &"<redacted>")
            .field("discord_channel_id", &self.discord_channel_id)
            .field("discord_token", &"<redacted>")
            .field("verify_endpoint", &self.verify_endpoint)
            .field("discord_api_base", &self.discord_api_base)
            .field("invite_base_url", &self.invite_base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl Validate for BrokerConfig {
    fn validate(&self) -> Result<()> {
        validate_secret("recaptcha_secret", &self.recaptcha_secret)?;
        validate_secret("discord_token", &self.discord_token)?;
        validate_snowflake("discord_channel_id", &self.discord_channel_id)?;

        validate_url("verify_endpoint", &self.verify_endpoint)?;
        validate_url("discord_api_base", &self.discord_api_base)?;
        validate_url("invite_base_url", &self.invite_base_url)?;

        validate_range("request_timeout_secs", self.request_timeout_secs, 1, 60)?;

        tracing::debug!("✅ Broker configuration validation passed");
        Ok(())
    }
}
