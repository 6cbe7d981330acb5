//! API Gateway (REST, proxy integration) request envelope.
//!
//! Only the two fields the broker reads are modelled; everything else in the
//! event is ignored by serde.

use crate::domain::model::IncomingRequest;
use serde::Deserialize;
use std::collections::HashMap;

pub const CAPTCHA_PARAM: &str = "captcha";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiGatewayRequest {
    #[serde(default)]
    pub query_string_parameters: Option<HashMap<String, String>>,
    #[serde(default)]
    pub request_context: Option<RequestContext>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestContext {
    #[serde(default)]
    pub identity: Option<Identity>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    #[serde(default)]
    pub source_ip: Option<String>,
}

impl From<ApiGatewayRequest> for IncomingRequest {
    fn from(event: ApiGatewayRequest) -> Self {
        let captcha_token = event
            .query_string_parameters
            .and_then(|mut params| params.remove(CAPTCHA_PARAM));
        let source_address = event
            .request_context
            .and_then(|ctx| ctx.identity)
            .and_then(|identity| identity.source_ip)
            .unwrap_or_default();

        IncomingRequest::new(captcha_token, source_address)
    }
}
