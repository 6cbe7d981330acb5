use crate::config::{
    BrokerConfig, DEFAULT_DISCORD_API_BASE, DEFAULT_INVITE_BASE_URL,
    DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_VERIFY_ENDPOINT,
};
use crate::utils::error::{BrokerError, Result};
use crate::utils::validation::validate_required_field;
use std::env;

pub const RECAPTCHA_SECRET: &str = "RECAPTCHA_SECRET";
pub const DISCORD_CHANNEL_ID: &str = "DISCORD_CHANNEL_ID";
pub const DISCORD_TOKEN: &str = "DISCORD_TOKEN";
pub const RECAPTCHA_VERIFY_URL: &str = "RECAPTCHA_VERIFY_URL";
pub const DISCORD_API_BASE: &str = "DISCORD_API_BASE";
pub const DISCORD_INVITE_BASE: &str = "DISCORD_INVITE_BASE";
pub const REQUEST_TIMEOUT_SECS: &str = "REQUEST_TIMEOUT_SECS";

impl BrokerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 以任意查詢函式建構，測試時不必動到行程的環境變數
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let recaptcha_secret = get(RECAPTCHA_SECRET);
        let discord_channel_id = get(DISCORD_CHANNEL_ID);
        let discord_token = get(DISCORD_TOKEN);

        let request_timeout_secs = match get(REQUEST_TIMEOUT_SECS) {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| BrokerError::InvalidConfigValueError {
                    field: REQUEST_TIMEOUT_SECS.to_string(),
                    value: raw.clone(),
                    reason: "Expected a whole number of seconds".to_string(),
                })?,
            None => DEFAULT_REQUEST_TIMEOUT_SECS,
        };

        Ok(Self {
            recaptcha_secret: validate_required_field(RECAPTCHA_SECRET, &recaptcha_secret)?
                .clone(),
            discord_channel_id: validate_required_field(DISCORD_CHANNEL_ID, &discord_channel_id)?
                .clone(),
            discord_token: validate_required_field(DISCORD_TOKEN, &discord_token)?.clone(),
            verify_endpoint: get(RECAPTCHA_VERIFY_URL)
                .unwrap_or_else(|| DEFAULT_VERIFY_ENDPOINT.to_string()),
            discord_api_base: get(DISCORD_API_BASE)
                .unwrap_or_else(|| DEFAULT_DISCORD_API_BASE.to_string()),
            invite_base_url: get(DISCORD_INVITE_BASE)
                .unwrap_or_else(|| DEFAULT_INVITE_BASE_URL.to_string()),
            request_timeout_secs,
        })
    }
}
