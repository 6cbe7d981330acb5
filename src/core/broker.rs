use crate::adapters::{http, DiscordInviteClient, RecaptchaVerifier, TracingLog};
use crate::config::BrokerConfig;
use crate::core::{
    BrokerEvent, BrokerLog, BrokerStage, CaptchaVerifier, IncomingRequest, InviteIssuer,
    InviteRequestSpec, InviteResult, NormalizedResponse,
};
use crate::utils::error::{BrokerError, Result};

pub const NO_CAPTCHA: &str = "No captcha specified.";
pub const CAPTCHA_INVALID: &str = "Captcha not valid. Please retry.";
pub const CAPTCHA_UNEXPECTED: &str = "Captcha verification returned an unexpected response.";
pub const NO_INVITE_CODE: &str = "No invite code received from Discord";
pub const UPSTREAM_UNAVAILABLE: &str = "Upstream service unavailable. Please retry later.";

/// Broker wired to the real reCAPTCHA and Discord endpoints.
pub type HttpInviteBroker = InviteBroker<RecaptchaVerifier, DiscordInviteClient, TracingLog>;

pub struct InviteBroker<V: CaptchaVerifier, I: InviteIssuer, L: BrokerLog> {
    verifier: V,
    issuer: I,
    log: L,
    invite_base_url: String,
}

impl HttpInviteBroker {
    pub fn from_config(config: &BrokerConfig) -> Result<Self> {
        let client = http::build_client(config)?;
        Ok(Self::new(
            config,
            RecaptchaVerifier::new(client.clone(), config),
            DiscordInviteClient::new(client, config),
            TracingLog,
        ))
    }
}

impl<V: CaptchaVerifier, I: InviteIssuer, L: BrokerLog> InviteBroker<V, I, L> {
    pub fn new(config: &BrokerConfig, verifier: V, issuer: I, log: L) -> Self {
        Self {
            verifier,
            issuer,
            log,
            invite_base_url: config.invite_base_url.clone(),
        }
    }

    /// Runs one invocation. Every outcome, including upstream faults, is
    /// turned into a response here.
    pub async fn handle(&self, request: &IncomingRequest) -> NormalizedResponse {
        let Some(token) = request.token() else {
            tracing::debug!(stage = BrokerStage::AwaitingToken.as_str(), "Request without captcha");
            return NormalizedResponse::text(401, NO_CAPTCHA);
        };
        let source = request.source_address.as_str();

        tracing::debug!(stage = BrokerStage::VerifyingCaptcha.as_str(), "Verifying captcha");
        let outcome = match self.verifier.verify(token, source).await {
            Ok(outcome) => outcome,
            Err(err) => return self.upstream_failure(BrokerStage::VerifyingCaptcha, source, err),
        };

        if !outcome.success {
            let description = outcome.error_description();
            self.log.record(
                BrokerStage::Rejected,
                BrokerEvent::CaptchaRejected {
                    source_address: source.to_string(),
                    description: description
                        .clone()
                        .unwrap_or_else(|| "no error codes".to_string()),
                },
            );
            let body = match description {
                Some(errors) => format!("{} {}", CAPTCHA_INVALID, errors),
                None => CAPTCHA_INVALID.to_string(),
            };
            return NormalizedResponse::text(401, body);
        }

        tracing::debug!(stage = BrokerStage::CreatingInvite.as_str(), "Creating invite");
        match self.issuer.create_invite(&InviteRequestSpec::SINGLE_USE).await {
            Ok(InviteResult::Issued { code }) => {
                let location = format!("{}{}", self.invite_base_url, code);
                self.log.record(
                    BrokerStage::InviteIssued,
                    BrokerEvent::InviteIssued {
                        source_address: source.to_string(),
                        code,
                    },
                );
                NormalizedResponse::redirect(location)
            }
            Ok(InviteResult::Failed {
                http_status,
                error_code,
                error_message,
            }) => {
                let code = match error_code {
                    Some(serde_json::Value::String(code)) => code,
                    Some(other) => other.to_string(),
                    None => http_status.to_string(),
                };
                let message = format!(
                    "Discord returned error {}: {}",
                    code,
                    error_message.as_deref().unwrap_or("unknown error")
                );
                self.invite_failed(source, message)
            }
            Err(err) => self.upstream_failure(BrokerStage::CreatingInvite, source, err),
        }
    }

    fn invite_failed(&self, source: &str, message: String) -> NormalizedResponse {
        self.log.record(
            BrokerStage::InviteFailed,
            BrokerEvent::InviteFailed {
                source_address: source.to_string(),
                message: message.clone(),
            },
        );
        NormalizedResponse::text(500, message)
    }

    fn upstream_failure(
        &self,
        stage: BrokerStage,
        source: &str,
        err: BrokerError,
    ) -> NormalizedResponse {
        match (stage, err) {
            (_, BrokerError::MissingInviteCode)
            | (BrokerStage::CreatingInvite, BrokerError::UnexpectedResponse { .. }) => {
                self.invite_failed(source, NO_INVITE_CODE.to_string())
            }
            (_, err @ BrokerError::UnexpectedResponse { .. }) => {
                self.log.record(
                    stage,
                    BrokerEvent::UpstreamContractViolation {
                        source_address: source.to_string(),
                        error: err.to_string(),
                    },
                );
                NormalizedResponse::text(500, CAPTCHA_UNEXPECTED)
            }
            (_, err) => {
                self.log.record(
                    stage,
                    BrokerEvent::UpstreamUnavailable {
                        source_address: source.to_string(),
                        error: err.to_string(),
                    },
                );
                NormalizedResponse::text(500, UPSTREAM_UNAVAILABLE)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::VerificationOutcome;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    type Reply<T> = Box<dyn Fn() -> Result<T> + Send + Sync>;

    struct MockVerifier {
        reply: Reply<VerificationOutcome>,
        calls: Arc<AtomicUsize>,
        seen: Arc<Mutex<Vec<(String, String)>>>,
    }

    #[async_trait]
    impl CaptchaVerifier for MockVerifier {
        async fn verify(&self, token: &str, source_address: &str) -> Result<VerificationOutcome> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen
                .lock()
                .unwrap()
                .push((token.to_string(), source_address.to_string()));
            (self.reply)()
        }
    }

    struct MockIssuer {
        reply: Reply<InviteResult>,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl InviteIssuer for MockIssuer {
        async fn create_invite(&self, spec: &InviteRequestSpec) -> Result<InviteResult> {
            assert_eq!(*spec, InviteRequestSpec::SINGLE_USE);
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.reply)()
        }
    }

    #[derive(Clone, Default)]
    struct RecordingLog {
        events: Arc<Mutex<Vec<(BrokerStage, BrokerEvent)>>>,
    }

    impl BrokerLog for RecordingLog {
        fn record(&self, stage: BrokerStage, event: BrokerEvent) {
            self.events.lock().unwrap().push((stage, event));
        }
    }

    struct Harness {
        broker: InviteBroker<MockVerifier, MockIssuer, RecordingLog>,
        verify_calls: Arc<AtomicUsize>,
        invite_calls: Arc<AtomicUsize>,
        seen: Arc<Mutex<Vec<(String, String)>>>,
        log: RecordingLog,
    }

    impl Harness {
        fn events(&self) -> Vec<(BrokerStage, BrokerEvent)> {
            self.log.events.lock().unwrap().clone()
        }
    }

    fn harness(verify: Reply<VerificationOutcome>, invite: Reply<InviteResult>) -> Harness {
        let config = BrokerConfig::new("secret", "42", "bot-token");
        let verify_calls = Arc::new(AtomicUsize::new(0));
        let invite_calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = RecordingLog::default();

        let broker = InviteBroker::new(
            &config,
            MockVerifier {
                reply: verify,
                calls: verify_calls.clone(),
                seen: seen.clone(),
            },
            MockIssuer {
                reply: invite,
                calls: invite_calls.clone(),
            },
            log.clone(),
        );

        Harness {
            broker,
            verify_calls,
            invite_calls,
            seen,
            log,
        }
    }

    fn passed() -> Reply<VerificationOutcome> {
        Box::new(|| {
            Ok(VerificationOutcome {
                success: true,
                error_codes: vec![],
            })
        })
    }

    fn rejected(codes: &[&str]) -> Reply<VerificationOutcome> {
        let codes: Vec<String> = codes.iter().map(|c| c.to_string()).collect();
        Box::new(move || {
            Ok(VerificationOutcome {
                success: false,
                error_codes: codes.clone(),
            })
        })
    }

    fn issued(code: &'static str) -> Reply<InviteResult> {
        Box::new(move || {
            Ok(InviteResult::Issued {
                code: code.to_string(),
            })
        })
    }

    fn unreachable_invite() -> Reply<InviteResult> {
        Box::new(|| -> Result<InviteResult> { panic!("invite endpoint must not be called") })
    }

    fn request(token: Option<&str>) -> IncomingRequest {
        IncomingRequest::new(token.map(str::to_string), "203.0.113.9")
    }

    #[tokio::test]
    async fn test_missing_captcha_makes_no_calls() {
        let h = harness(passed(), unreachable_invite());

        for token in [None, Some("")] {
            let response = h.broker.handle(&request(token)).await;
            assert_eq!(response.status_code, 401);
            assert_eq!(response.body.as_deref(), Some(NO_CAPTCHA));
            assert_eq!(response.header("Content-Type"), Some("text/plain"));
        }

        assert_eq!(h.verify_calls.load(Ordering::SeqCst), 0);
        assert_eq!(h.invite_calls.load(Ordering::SeqCst), 0);
        assert!(h.events().is_empty());
    }

    #[tokio::test]
    async fn test_rejected_captcha_lists_error_codes() {
        let h = harness(rejected(&["x", "y"]), unreachable_invite());

        let response = h.broker.handle(&request(Some("tok"))).await;
        assert_eq!(response.status_code, 401);
        let body = response.body.unwrap();
        assert!(body.starts_with(CAPTCHA_INVALID));
        assert!(body.ends_with("Error(s): x, y"));
        assert_eq!(h.invite_calls.load(Ordering::SeqCst), 0);

        assert_eq!(
            h.events(),
            vec![(
                BrokerStage::Rejected,
                BrokerEvent::CaptchaRejected {
                    source_address: "203.0.113.9".to_string(),
                    description: "Error(s): x, y".to_string(),
                }
            )]
        );
    }

    #[tokio::test]
    async fn test_rejected_captcha_without_codes_has_no_suffix() {
        let h = harness(rejected(&[]), unreachable_invite());

        let response = h.broker.handle(&request(Some("tok"))).await;
        assert_eq!(response.status_code, 401);
        assert_eq!(response.body.as_deref(), Some(CAPTCHA_INVALID));
    }

    #[tokio::test]
    async fn test_token_and_source_are_forwarded() {
        let h = harness(passed(), issued("abc123"));
        h.broker.handle(&request(Some("tok"))).await;

        assert_eq!(
            *h.seen.lock().unwrap(),
            vec![("tok".to_string(), "203.0.113.9".to_string())]
        );
    }

    #[tokio::test]
    async fn test_discord_error_is_reported() {
        let h = harness(
            passed(),
            Box::new(|| {
                Ok(InviteResult::Failed {
                    http_status: 403,
                    error_code: Some(json!(50013)),
                    error_message: Some("Missing Permissions".to_string()),
                })
            }),
        );

        let response = h.broker.handle(&request(Some("tok"))).await;
        assert_eq!(response.status_code, 500);
        assert_eq!(
            response.body.as_deref(),
            Some("Discord returned error 50013: Missing Permissions")
        );

        let events = h.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].0, BrokerStage::InviteFailed);
    }

    #[tokio::test]
    async fn test_string_error_code_is_not_quoted() {
        let h = harness(
            passed(),
            Box::new(|| {
                Ok(InviteResult::Failed {
                    http_status: 400,
                    error_code: Some(json!("INVALID")),
                    error_message: None,
                })
            }),
        );

        let response = h.broker.handle(&request(Some("tok"))).await;
        assert_eq!(
            response.body.as_deref(),
            Some("Discord returned error INVALID: unknown error")
        );
    }

    #[tokio::test]
    async fn test_missing_invite_code() {
        let h = harness(passed(), Box::new(|| Err(BrokerError::MissingInviteCode)));

        let response = h.broker.handle(&request(Some("tok"))).await;
        assert_eq!(response.status_code, 500);
        assert_eq!(response.body.as_deref(), Some(NO_INVITE_CODE));
        assert_eq!(
            h.events(),
            vec![(
                BrokerStage::InviteFailed,
                BrokerEvent::InviteFailed {
                    source_address: "203.0.113.9".to_string(),
                    message: NO_INVITE_CODE.to_string(),
                }
            )]
        );
    }

    #[tokio::test]
    async fn test_unexpected_captcha_response_stops_pipeline() {
        let h = harness(
            Box::new(|| {
                Err(BrokerError::UnexpectedResponse {
                    service: "reCAPTCHA",
                    reason: "HTTP 200: expected value".to_string(),
                })
            }),
            unreachable_invite(),
        );

        let response = h.broker.handle(&request(Some("tok"))).await;
        assert_eq!(response.status_code, 500);
        assert_eq!(response.body.as_deref(), Some(CAPTCHA_UNEXPECTED));
        assert_eq!(h.invite_calls.load(Ordering::SeqCst), 0);
        assert!(matches!(
            h.events()[0],
            (
                BrokerStage::VerifyingCaptcha,
                BrokerEvent::UpstreamContractViolation { .. }
            )
        ));
    }

    #[tokio::test]
    async fn test_success_redirects_to_invite() {
        let h = harness(passed(), issued("abc123"));

        let response = h.broker.handle(&request(Some("tok"))).await;
        assert_eq!(response.status_code, 302);
        assert_eq!(response.body, None);
        assert_eq!(response.header("Location"), Some("https://discord.gg/abc123"));
        assert_eq!(response.headers.len(), 1);

        assert_eq!(
            h.events(),
            vec![(
                BrokerStage::InviteIssued,
                BrokerEvent::InviteIssued {
                    source_address: "203.0.113.9".to_string(),
                    code: "abc123".to_string(),
                }
            )]
        );
    }

    #[tokio::test]
    async fn test_independent_invocations() {
        let h = harness(passed(), issued("abc123"));

        let first = h.broker.handle(&request(Some("token-a"))).await;
        let second = h.broker.handle(&request(Some("token-b"))).await;
        assert_eq!(first.status_code, 302);
        assert_eq!(second.status_code, 302);
        assert_eq!(h.verify_calls.load(Ordering::SeqCst), 2);
        assert_eq!(h.invite_calls.load(Ordering::SeqCst), 2);
    }
}
