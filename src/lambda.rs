use captcha_invite::adapters::ApiGatewayRequest;
use captcha_invite::utils::{logger, validation::Validate};
use captcha_invite::{BrokerConfig, HttpInviteBroker, IncomingRequest, NormalizedResponse};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};

async fn function_handler(
    broker: &HttpInviteBroker,
    event: LambdaEvent<ApiGatewayRequest>,
) -> Result<NormalizedResponse, Error> {
    tracing::debug!(request_id = %event.context.request_id, "Handling invite request");

    let request = IncomingRequest::from(event.payload);
    Ok(broker.handle(&request).await)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    // 設定在冷啟動時載入一次，缺少任何必要值就直接失敗
    let config = BrokerConfig::from_env()?;
    config.validate()?;

    let broker = HttpInviteBroker::from_config(&config)?;
    let broker = &broker;

    run(service_fn(move |event: LambdaEvent<ApiGatewayRequest>| async move {
        function_handler(broker, event).await
    }))
    .await
}
