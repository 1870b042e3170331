use std::fmt;

use reqwest::Client;
use reqwest::header::{COOKIE, USER_AGENT};
use thiserror::Error;
use tracing::debug;

use crate::steam::dry_run::DryRun;
use crate::steam::rate_limiter::RateLimiter;

pub const ALL_COMMENTS_SUFFIX: &str = "/allcomments";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestFailure {
    Http(u16),
    Network,
    Unknown,
}

impl fmt::Display for RequestFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestFailure::Http(status) => write!(f, "HTTP {status}"),
            RequestFailure::Network => f.write_str("network error"),
            RequestFailure::Unknown => f.write_str("unknown error"),
        }
    }
}

#[derive(Debug, Error)]
pub enum SteamClientError {
    #[error("max pagination depth of {max} exceeded (requested page {page})")]
    MaxPaginationDepthExceeded { page: u32, max: u32 },
    #[error("steam request failed: {reason}")]
    RequestFailed {
        reason: RequestFailure,
        #[source]
        source: Option<reqwest::Error>,
    },
}

impl From<reqwest::Error> for SteamClientError {
    fn from(err: reqwest::Error) -> Self {
        let reason = if let Some(status) = err.status() {
            RequestFailure::Http(status.as_u16())
        } else if err.is_timeout() || err.is_connect() || err.is_request() || err.is_body() {
            RequestFailure::Network
        } else {
            RequestFailure::Unknown
        };
        SteamClientError::RequestFailed {
            reason,
            source: Some(err),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCookies {
    pub steam_login_secure: String,
    pub session_id: String,
}

impl SessionCookies {
    pub fn header_value(&self) -> String {
        format!(
            "steamLoginSecure={}; sessionid={}",
            self.steam_login_secure, self.session_id
        )
    }
}

#[derive(Debug, Clone)]
pub struct SteamClientConfig {
    /// Profile comments URL, already ending with `/allcomments`.
    pub comments_url: String,
    pub max_pagination_depth: u32,
    pub cookies: Option<SessionCookies>,
    pub user_agent: String,
    pub request_delay_ms: u64,
    pub dry_run: bool,
}

/// Fetches comment thread pages, one request at a time.
#[derive(Debug)]
pub struct SteamClient {
    http: Client,
    comments_url: String,
    max_pagination_depth: u32,
    cookies: Option<SessionCookies>,
    user_agent: String,
    limiter: RateLimiter,
    dry_run: DryRun,
}

impl SteamClient {
    pub fn new(http: Client, config: SteamClientConfig) -> Self {
        Self {
            http,
            comments_url: config.comments_url,
            max_pagination_depth: config.max_pagination_depth,
            cookies: config.cookies,
            user_agent: config.user_agent,
            limiter: RateLimiter::new(config.request_delay_ms),
            dry_run: DryRun::new(config.dry_run),
        }
    }

    pub fn page_url(&self, page: u32) -> String {
        format!("{}?ctp={page}", self.comments_url)
    }

    pub fn dry_run(&self) -> &DryRun {
        &self.dry_run
    }

    /// Returns the raw page body, or `None` when the request was suppressed by dry-run.
    pub async fn fetch_comments_page(
        &mut self,
        page: u32,
    ) -> Result<Option<Vec<u8>>, SteamClientError> {
        if page > self.max_pagination_depth {
            return Err(SteamClientError::MaxPaginationDepthExceeded {
                page,
                max: self.max_pagination_depth,
            });
        }
        let url = self.page_url(page);
        if self.dry_run.intercept(format!("GET {url}")) {
            return Ok(None);
        }

        self.limiter.wait().await;
        debug!(page, %url, "fetching comments page");
        let mut request = self
            .http
            .get(&url)
            .header(USER_AGENT, self.user_agent.as_str());
        if let Some(cookies) = &self.cookies {
            request = request.header(COOKIE, cookies.header_value());
        }
        let response = request.send().await?.error_for_status()?;
        let body = response.bytes().await?;
        debug!(page, bytes = body.len(), "comments page fetched");
        Ok(Some(body.to_vec()))
    }
}
