pub mod client;
pub mod dry_run;
pub mod parser;
pub mod rate_limiter;

pub use client::{
    ALL_COMMENTS_SUFFIX, RequestFailure, SessionCookies, SteamClient, SteamClientConfig,
    SteamClientError,
};
pub use dry_run::DryRun;
pub use parser::SteamPageParser;
pub use rate_limiter::RateLimiter;
