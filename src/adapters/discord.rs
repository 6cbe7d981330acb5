use crate::config::BrokerConfig;
use crate::domain::model::{InviteRequestSpec, InviteResult};
use crate::domain::ports::InviteIssuer;
use crate::utils::error::{BrokerError, Result};
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;

pub const SERVICE: &str = "Discord";

#[derive(Debug, Default, Deserialize)]
struct InvitePayload {
    code: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorPayload {
    code: Option<Value>,
    message: Option<String>,
}

#[derive(Clone)]
pub struct DiscordInviteClient {
    client: Client,
    invites_url: String,
    bot_token: String,
}

impl DiscordInviteClient {
    pub fn new(client: Client, config: &BrokerConfig) -> Self {
        Self {
            client,
            invites_url: config.invites_url(),
            bot_token: config.discord_token.clone(),
        }
    }
}

/// Anything in `[200, 400)` counts as an answer; the body then decides.
fn is_accepted(status: StatusCode) -> bool {
    (200..400).contains(&status.as_u16())
}

fn failed(status: StatusCode, body: &str) -> InviteResult {
    // 錯誤內容不是 JSON 時，用 HTTP 狀態補上 code 跟 message
    let payload: ErrorPayload = serde_json::from_str(body).unwrap_or_default();
    InviteResult::Failed {
        http_status: status.as_u16(),
        error_code: payload
            .code
            .or_else(|| Some(Value::from(status.as_u16()))),
        error_message: payload
            .message
            .or_else(|| status.canonical_reason().map(str::to_string)),
    }
}

fn issued(body: &str) -> Result<InviteResult> {
    let payload: InvitePayload = serde_json::from_str(body).map_err(|e| {
        tracing::debug!("Invite response was not valid JSON: {}", e);
        BrokerError::MissingInviteCode
    })?;

    match payload.code {
        Some(Value::String(code)) if !code.is_empty() => Ok(InviteResult::Issued { code }),
        _ => Err(BrokerError::MissingInviteCode),
    }
}

#[async_trait]
impl InviteIssuer for DiscordInviteClient {
    async fn create_invite(&self, spec: &InviteRequestSpec) -> Result<InviteResult> {
        tracing::debug!("Requesting invite from: {}", self.invites_url);
        let response = self
            .client
            .post(&self.invites_url)
            .header(AUTHORIZATION, format!("Bot {}", self.bot_token))
            .json(spec)
            .send()
            .await
            .map_err(|source| BrokerError::Transport {
                service: SERVICE,
                source,
            })?;

        let status = response.status();
        tracing::debug!("Invite response status: {}", status);

        let body = response
            .text()
            .await
            .map_err(|source| BrokerError::Transport {
                service: SERVICE,
                source,
            })?;

        if !is_accepted(status) {
            return Ok(failed(status, &body));
        }
        issued(&body)
    }
}
