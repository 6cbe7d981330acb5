use captcha_invite::utils::{error::ErrorCategory, logger, validation::Validate};
use captcha_invite::{CliConfig, HttpInviteBroker, IncomingRequest};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 本機執行時讀 .env，Lambda 上則直接用環境變數
    dotenvy::dotenv().ok();

    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose);

    tracing::info!("Starting captcha-invite CLI");
    if cli.verbose {
        tracing::debug!("CLI args: {:?}", cli);
    }

    let config = match cli.broker_config().and_then(|c| c.validate().map(|_| c)) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration failed: {} (Category: {:?})", e, e.category());
            eprintln!("❌ {}", e.user_friendly_message());
            let exit_code = match e.category() {
                ErrorCategory::Configuration => 3,
                _ => 1,
            };
            std::process::exit(exit_code);
        }
    };
    tracing::debug!("Broker config: {:?}", config);

    let broker = HttpInviteBroker::from_config(&config)?;
    let request = IncomingRequest::new(cli.captcha.clone(), cli.source_ip.clone());
    let response = broker.handle(&request).await;

    println!("{}", serde_json::to_string_pretty(&response)?);

    if response.status_code != 302 {
        std::process::exit(1);
    }
    Ok(())
}
