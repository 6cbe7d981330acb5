pub mod broker;

pub use crate::domain::model::{
    BrokerStage, IncomingRequest, InviteRequestSpec, InviteResult, NormalizedResponse,
    VerificationOutcome,
};
pub use crate::domain::ports::{BrokerEvent, BrokerLog, CaptchaVerifier, InviteIssuer};
pub use crate::utils::error::Result;
pub use broker::{HttpInviteBroker, InviteBroker};
