use crate::config::BrokerConfig;
use crate::utils::error::{BrokerError, Result};
use reqwest::Client;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// One client per process; both upstream adapters share its connection pool.
/// The timeout bounds every outbound call end to end.
pub fn build_client(config: &BrokerConfig) -> Result<Client> {
    Client::builder()
        .timeout(config.request_timeout())
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| BrokerError::ConfigError {
            message: format!("Failed to build HTTP client: {}", e),
        })
}
