use crate::config::BrokerConfig;
use crate::domain::model::VerificationOutcome;
use crate::domain::ports::CaptchaVerifier;
use crate::utils::error::{BrokerError, Result};
use async_trait::async_trait;
use reqwest::Client;

pub const SERVICE: &str = "reCAPTCHA";

#[derive(Clone)]
pub struct RecaptchaVerifier {
    client: Client,
    endpoint: String,
    secret: String,
}

impl RecaptchaVerifier {
    pub fn new(client: Client, config: &BrokerConfig) -> Self {
        Self {
            client,
            endpoint: config.verify_endpoint.clone(),
            secret: config.recaptcha_secret.clone(),
        }
    }
}

#[async_trait]
impl CaptchaVerifier for RecaptchaVerifier {
    async fn verify(&self, token: &str, source_address: &str) -> Result<VerificationOutcome> {
        let mut form = vec![("secret", self.secret.as_str()), ("response", token)];
        // remoteip 是選填欄位，沒有來源位址就不送
        if !source_address.is_empty() {
            form.push(("remoteip", source_address));
        }

        tracing::debug!("Verifying captcha token at: {}", self.endpoint);
        let response = self
            .client
            .post(&self.endpoint)
            .form(&form)
            .send()
            .await
            .map_err(|source| BrokerError::Transport {
                service: SERVICE,
                source,
            })?;

        let status = response.status();
        tracing::debug!("Captcha verification response status: {}", status);

        let body = response
            .text()
            .await
            .map_err(|source| BrokerError::Transport {
                service: SERVICE,
                source,
            })?;

        serde_json::from_str(&body).map_err(|e| BrokerError::UnexpectedResponse {
            service: SERVICE,
            reason: format!("HTTP {}: {}", status.as_u16(), e),
        })
    }
}
