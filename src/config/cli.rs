use crate::config::BrokerConfig;
use crate::utils::error::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "captcha-invite")]
#[command(about = "Verify a reCAPTCHA token and mint a single-use Discord invite")]
pub struct CliConfig {
    #[arg(long, help = "reCAPTCHA response token from the client")]
    pub captcha: Option<String>,

    #[arg(long, default_value = "127.0.0.1")]
    pub source_ip: String,

    #[arg(long, help = "TOML config file; environment variables are used when omitted")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    pub fn broker_config(&self) -> Result<BrokerConfig> {
        match &self.config {
            Some(path) => BrokerConfig::from_file(path),
            None => BrokerConfig::from_env(),
        }
    }
}
