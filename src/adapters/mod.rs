// Adapters layer: concrete implementations of the domain ports (http, logging, gateway envelope).

pub mod discord;
pub mod gateway;
pub mod http;
pub mod recaptcha;
pub mod tracing_log;

pub use discord::DiscordInviteClient;
pub use gateway::ApiGatewayRequest;
pub use recaptcha::RecaptchaVerifier;
pub use tracing_log::TracingLog;
