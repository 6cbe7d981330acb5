use crate::domain::model::{BrokerStage, InviteRequestSpec, InviteResult, VerificationOutcome};
use crate::utils::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait CaptchaVerifier: Send + Sync {
    async fn verify(&self, token: &str, source_address: &str) -> Result<VerificationOutcome>;
}

#[async_trait]
pub trait InviteIssuer: Send + Sync {
    async fn create_invite(&self, spec: &InviteRequestSpec) -> Result<InviteResult>;
}

/// Observability side channel. Never influences the returned response.
#[derive(Debug, Clone, PartialEq)]
pub enum BrokerEvent {
    CaptchaRejected {
        source_address: String,
        description: String,
    },
    InviteFailed {
        source_address: String,
        message: String,
    },
    InviteIssued {
        source_address: String,
        code: String,
    },
    UpstreamUnavailable {
        source_address: String,
        error: String,
    },
    UpstreamContractViolation {
        source_address: String,
        error: String,
    },
}

pub trait BrokerLog: Send + Sync {
    fn record(&self, stage: BrokerStage, event: BrokerEvent);
}
