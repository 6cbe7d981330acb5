use thiserror::Error;

#[derive(Error, Debug)]
pub enum BrokerError {
    #[error("{service} request failed: {source}")]
    Transport {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{service} returned an unexpected response: {reason}")]
    UnexpectedResponse {
        service: &'static str,
        reason: String,
    },

    #[error("No invite code received from Discord")]
    MissingInviteCode,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Upstream,
    System,
}

impl BrokerError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            BrokerError::Transport { .. }
            | BrokerError::UnexpectedResponse { .. }
            | BrokerError::MissingInviteCode => ErrorCategory::Upstream,
            BrokerError::ConfigError { .. }
            | BrokerError::MissingConfigError { .. }
            | BrokerError::InvalidConfigValueError { .. }
            | BrokerError::TomlError(_) => ErrorCategory::Configuration,
            BrokerError::IoError(_) => ErrorCategory::System,
        }
    }

    /// 給 CLI 使用者看的訊息，不帶內部細節
    pub fn user_friendly_message(&self) -> String {
        match self {
            BrokerError::MissingConfigError { field } => {
                format!("Missing required setting `{}`. Set it in the environment or the config file.", field)
            }
            BrokerError::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting `{}` is invalid: {}", field, reason)
            }
            BrokerError::Transport { service, .. } => {
                format!("Could not reach {}. Check your network connection.", service)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BrokerError>;
