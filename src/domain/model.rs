use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingRequest {
    pub captcha_token: Option<String>,
    pub source_address: String,
}

impl IncomingRequest {
    pub fn new(captcha_token: Option<String>, source_address: impl Into<String>) -> Self {
        Self {
            captcha_token,
            source_address: source_address.into(),
        }
    }

    /// 空字串視同沒帶 token
    pub fn token(&self) -> Option<&str> {
        self.captcha_token.as_deref().filter(|t| !t.is_empty())
    }
}

/// Parsed body of a `siteverify` call.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VerificationOutcome {
    pub success: bool,
    #[serde(rename = "error-codes", default)]
    pub error_codes: Vec<String>,
}

impl VerificationOutcome {
    pub fn error_description(&self) -> Option<String> {
        if self.error_codes.is_empty() {
            None
        } else {
            Some(format!("Error(s): {}", self.error_codes.join(", ")))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InviteRequestSpec {
    pub max_uses: u32,
    pub max_age: u32,
    pub unique: bool,
}

impl InviteRequestSpec {
    /// One use, valid for ten minutes, never reused across callers.
    pub const SINGLE_USE: InviteRequestSpec = InviteRequestSpec {
        max_uses: 1,
        max_age: 600,
        unique: true,
    };
}

#[derive(Debug, Clone, PartialEq)]
pub enum InviteResult {
    Issued {
        code: String,
    },
    Failed {
        http_status: u16,
        error_code: Option<serde_json::Value>,
        error_message: Option<String>,
    },
}

/// Pipeline position of an invocation, attached to every log event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrokerStage {
    AwaitingToken,
    VerifyingCaptcha,
    Rejected,
    CreatingInvite,
    InviteFailed,
    InviteIssued,
}

impl BrokerStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            BrokerStage::AwaitingToken => "awaiting_token",
            BrokerStage::VerifyingCaptcha => "verifying_captcha",
            BrokerStage::Rejected => "rejected",
            BrokerStage::CreatingInvite => "creating_invite",
            BrokerStage::InviteFailed => "invite_failed",
            BrokerStage::InviteIssued => "invite_issued",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedResponse {
    pub status_code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    pub headers: BTreeMap<String, String>,
}

impl NormalizedResponse {
    pub fn text(status_code: u16, body: impl Into<String>) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("Content-Type".to_string(), "text/plain".to_string());
        Self {
            status_code,
            body: Some(body.into()),
            headers,
        }
    }

    pub fn redirect(location: impl Into<String>) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("Location".to_string(), location.into());
        Self {
            status_code: 302,
            body: None,
            headers,
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}
