use std::path::PathBuf;

use clap::Parser;

use crate::config::{DEFAULT_CONFIG_PATH, Settings};

/// Scrape a Steam profile's comment thread.
#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Path to the key=value settings file.
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,
    #[arg(long)]
    pub steam_url: Option<String>,
    #[arg(long)]
    pub steam_login_secure: Option<String>,
    #[arg(long)]
    pub session_id: Option<String>,
    /// Maximum number of comment pages to request.
    #[arg(long)]
    pub max_pages: Option<u32>,
    /// Minimum delay between requests, in milliseconds.
    #[arg(long)]
    pub request_delay_ms: Option<u64>,
    /// One of: safe, full, none.
    #[arg(long)]
    pub print_config: Option<String>,
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
    #[arg(long, default_value_t = false)]
    pub no_dry_run: bool,
    /// One of: json, csv, xml, text.
    #[arg(long)]
    pub format: Option<String>,
    /// Write the rendered output to this file instead of stdout.
    #[arg(long)]
    pub output: Option<PathBuf>,
}

impl Cli {
    pub fn check_conflicts(&self) -> Result<(), String> {
        if self.dry_run && self.no_dry_run {
            return Err("--dry-run cannot be combined with --no-dry-run".to_string());
        }
        Ok(())
    }

    pub fn overrides(&self) -> Settings {
        let dry_run = match (self.dry_run, self.no_dry_run) {
            (true, _) => Some("true".to_string()),
            (false, true) => Some("false".to_string()),
            (false, false) => None,
        };
        Settings {
            steam_url: self.steam_url.clone(),
            steam_login_secure: self.steam_login_secure.clone(),
            session_id: self.session_id.clone(),
            max_pagination_depth: self.max_pages.map(|value| value.to_string()),
            request_delay_ms: self.request_delay_ms.map(|value| value.to_string()),
            print_config_mode: self.print_config.clone(),
            dry_run,
            output_format: self.format.clone(),
            output_file: self
                .output
                .as_ref()
                .map(|path| path.display().to_string()),
            ..Settings::default()
        }
    }
}
