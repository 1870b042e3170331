use reqwest::Client;
use thiserror::Error;

use crate::config::ResolvedConfig;
use steamscrape_infra::steam::{SteamClient, SteamClientConfig};

#[derive(Debug, Error)]
pub enum WiringError {
    #[error("http client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

pub fn build_client(config: &ResolvedConfig) -> Result<SteamClient, WiringError> {
    let http = Client::builder().timeout(config.request_timeout()).build()?;
    Ok(SteamClient::new(
        http,
        SteamClientConfig {
            comments_url: config.steam_url().to_string(),
            max_pagination_depth: config.max_pagination_depth(),
            cookies: config.session_cookies(),
            user_agent: config.user_agent().to_string(),
            request_delay_ms: config.request_delay_ms(),
            dry_run: config.dry_run(),
        },
    ))
}
