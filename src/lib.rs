pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::BrokerConfig;
pub use core::{HttpInviteBroker, IncomingRequest, InviteBroker, NormalizedResponse};
pub use utils::error::{BrokerError, Result};
