use crate::config::{
    BrokerConfig, DEFAULT_DISCORD_API_BASE, DEFAULT_INVITE_BASE_URL,
    DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_VERIFY_ENDPOINT,
};
use crate::utils::error::{BrokerError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// On-disk layout of a broker config file.
///
/// ```toml
/// [recaptcha]
/// secret = "${RECAPTCHA_SECRET}"
///
/// [discord]
/// channel_id = "123456789012345678"
/// token = "${DISCORD_TOKEN}"
///
/// [http]
/// timeout_seconds = 5
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub recaptcha: RecaptchaSection,
    pub discord: DiscordSection,
    pub http: Option<HttpSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecaptchaSection {
    pub secret: String,
    pub verify_endpoint: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscordSection {
    pub channel_id: String,
    pub token: String,
    pub api_base: Option<String>,
    pub invite_base_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpSection {
    pub timeout_seconds: Option<u64>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content, |name| std::env::var(name).ok())?;
        Ok(toml::from_str(&processed_content)?)
    }

    /// 替換環境變數 (例如 ${DISCORD_TOKEN})，找不到的變數直接報錯
    pub(crate) fn substitute_env_vars<F>(content: &str, lookup: F) -> Result<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let re = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").map_err(|e| {
            BrokerError::ConfigError {
                message: format!("Invalid placeholder pattern: {}", e),
            }
        })?;

        let mut missing = None;
        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            match lookup(var_name) {
                Some(value) => value,
                None => {
                    missing.get_or_insert_with(|| var_name.to_string());
                    String::new()
                }
            }
        });

        match missing {
            Some(field) => Err(BrokerError::MissingConfigError { field }),
            None => Ok(result.into_owned()),
        }
    }
}

impl From<TomlConfig> for BrokerConfig {
    fn from(file: TomlConfig) -> Self {
        Self {
            recaptcha_secret: file.recaptcha.secret,
            discord_channel_id: file.discord.channel_id,
            discord_token: file.discord.token,
            verify_endpoint: file
                .recaptcha
                .verify_endpoint
                .unwrap_or_else(|| DEFAULT_VERIFY_ENDPOINT.to_string()),
            discord_api_base: file
                .discord
                .api_base
                .unwrap_or_else(|| DEFAULT_DISCORD_API_BASE.to_string()),
            invite_base_url: file
                .discord
                .invite_base_url
                .unwrap_or_else(|| DEFAULT_INVITE_BASE_URL.to_string()),
            request_timeout_secs: file
                .http
                .and_then(|h| h.timeout_seconds)
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

impl BrokerConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        TomlConfig::from_file(path).map(Into::into)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        TomlConfig::from_toml_str(content).map(Into::into)
    }
}
