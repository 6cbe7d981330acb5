use crate::domain::model::BrokerStage;
use crate::domain::ports::{BrokerEvent, BrokerLog};

/// Forwards broker events to `tracing` as structured fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLog;

impl BrokerLog for TracingLog {
    fn record(&self, stage: BrokerStage, event: BrokerEvent) {
        let stage = stage.as_str();
        match event {
            BrokerEvent::CaptchaRejected {
                source_address,
                description,
            } => {
                tracing::warn!(stage, %source_address, error = %description, "Captcha rejected");
            }
            BrokerEvent::InviteFailed {
                source_address,
                message,
            } => {
                tracing::error!(stage, %source_address, error = %message, "Invite creation failed");
            }
            BrokerEvent::InviteIssued {
                source_address,
                code,
            } => {
                tracing::info!(stage, %source_address, %code, "Invite issued");
            }
            BrokerEvent::UpstreamUnavailable {
                source_address,
                error,
            } => {
                tracing::error!(stage, %source_address, %error, "Upstream service unavailable");
            }
            BrokerEvent::UpstreamContractViolation {
                source_address,
                error,
            } => {
                tracing::error!(stage, %source_address, %error, "Unexpected upstream response");
            }
        }
    }
}
