use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use steamscrape_core::error::CoreError;
use steamscrape_core::types::{ConfigPrintMode, OutputFormat};
use steamscrape_infra::steam::{ALL_COMMENTS_SUFFIX, SessionCookies};

pub const DEFAULT_CONFIG_PATH: &str = "config/.env";
const DEFAULT_MAX_PAGINATION_DEPTH: u32 = 100;
const DEFAULT_REQUEST_DELAY_MS: u64 = 0;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";
const MASKED: &str = "*****";
const TRUTHY: [&str; 4] = ["1", "true", "yes", "on"];

pub mod keys {
    pub const STEAM_URL: &str = "steam_url";
    pub const STEAM_LOGIN_SECURE: &str = "steamLoginSecure";
    pub const SESSION_ID: &str = "sessionid";
    pub const MAX_PAGINATION_DEPTH: &str = "MAX_PAGINATION_DEPTH";
    pub const REQUEST_DELAY_MS: &str = "request_delay_ms";
    pub const PRINT_CONFIG_MODE: &str = "print_config_mode";
    pub const DRY_RUN: &str = "dry_run";
    pub const OUTPUT_FORMAT: &str = "output_format";
    pub const OUTPUT_FILE: &str = "output_file";
    pub const REQUEST_TIMEOUT_SECS: &str = "request_timeout_secs";
    pub const USER_AGENT: &str = "user_agent";
}

#[derive(Debug, Error)]
pub enum EnvLoadError {
    #[error("environment file path not provided; pass --config <path>")]
    PathNotProvided,
    #[error("environment file not found at path: {0}")]
    NotFound(PathBuf),
    #[error("failed to load environment file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required config: {0}")]
    MissingRequired(&'static str),
    #[error(transparent)]
    InvalidChoice(#[from] CoreError),
}

/// Raw, unvalidated values from one configuration source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub steam_url: Option<String>,
    pub steam_login_secure: Option<String>,
    pub session_id: Option<String>,
    pub max_pagination_depth: Option<String>,
    pub request_delay_ms: Option<String>,
    pub print_config_mode: Option<String>,
    pub dry_run: Option<String>,
    pub output_format: Option<String>,
    pub output_file: Option<String>,
    pub request_timeout_secs: Option<String>,
    pub user_agent: Option<String>,
}

impl Settings {
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut settings = Settings::default();
        for (key, value) in pairs {
            settings.set(&key, value);
        }
        settings
    }

    /// Unrecognized keys are ignored.
    fn set(&mut self, key: &str, value: String) {
        let slot = match key {
            keys::STEAM_URL => &mut self.steam_url,
            keys::STEAM_LOGIN_SECURE => &mut self.steam_login_secure,
            keys::SESSION_ID => &mut self.session_id,
            keys::MAX_PAGINATION_DEPTH => &mut self.max_pagination_depth,
            keys::REQUEST_DELAY_MS => &mut self.request_delay_ms,
            keys::PRINT_CONFIG_MODE => &mut self.print_config_mode,
            keys::DRY_RUN => &mut self.dry_run,
            keys::OUTPUT_FORMAT => &mut self.output_format,
            keys::OUTPUT_FILE => &mut self.output_file,
            keys::REQUEST_TIMEOUT_SECS => &mut self.request_timeout_secs,
            keys::USER_AGENT => &mut self.user_agent,
            _ => return,
        };
        *slot = Some(value);
    }

    /// Layers `self` on top of `lower`; non-blank values in `self` win.
    pub fn over(self, lower: Settings) -> Settings {
        Settings {
            steam_url: pick(self.steam_url, lower.steam_url),
            steam_login_secure: pick(self.steam_login_secure, lower.steam_login_secure),
            session_id: pick(self.session_id, lower.session_id),
            max_pagination_depth: pick(self.max_pagination_depth, lower.max_pagination_depth),
            request_delay_ms: pick(self.request_delay_ms, lower.request_delay_ms),
            print_config_mode: pick(self.print_config_mode, lower.print_config_mode),
            dry_run: pick(self.dry_run, lower.dry_run),
            output_format: pick(self.output_format, lower.output_format),
            output_file: pick(self.output_file, lower.output_file),
            request_timeout_secs: pick(self.request_timeout_secs, lower.request_timeout_secs),
            user_agent: pick(self.user_agent, lower.user_agent),
        }
    }
}

/// Fully validated configuration for one run.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    config_path: PathBuf,
    steam_url: String,
    steam_login_secure: Option<String>,
    session_id: Option<String>,
    max_pagination_depth: u32,
    request_delay_ms: u64,
    request_timeout: Duration,
    user_agent: String,
    print_config_mode: ConfigPrintMode,
    dry_run: bool,
    output_format: OutputFormat,
    output_file: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
pub struct ConfigView {
    pub config_path: String,
    pub steam_url: String,
    #[serde(rename = "steamLoginSecure")]
    pub steam_login_secure: Option<String>,
    #[serde(rename = "sessionid")]
    pub session_id: Option<String>,
    #[serde(rename = "MAX_PAGINATION_DEPTH")]
    pub max_pagination_depth: u32,
    pub request_delay_ms: u64,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub print_config_mode: &'static str,
    pub dry_run: bool,
    pub output_format: &'static str,
    pub output_file: Option<String>,
    pub cookies_enabled: bool,
}

impl ResolvedConfig {
    pub fn steam_url(&self) -> &str {
        &self.steam_url
    }

    pub fn max_pagination_depth(&self) -> u32 {
        self.max_pagination_depth
    }

    pub fn request_delay_ms(&self) -> u64 {
        self.request_delay_ms
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn print_config_mode(&self) -> ConfigPrintMode {
        self.print_config_mode
    }

    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    pub fn output_format(&self) -> OutputFormat {
        self.output_format
    }

    pub fn output_file(&self) -> Option<&Path> {
        self.output_file.as_deref()
    }

    pub fn cookies_enabled(&self) -> bool {
        self.missing_credentials().is_empty()
    }

    /// Credential keys that are absent or blank.
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        [
            (keys::STEAM_LOGIN_SECURE, &self.steam_login_secure),
            (keys::SESSION_ID, &self.session_id),
        ]
        .into_iter()
        .filter(|(_, value)| value.as_deref().is_none_or(|value| value.trim().is_empty()))
        .map(|(key, _)| key)
        .collect()
    }

    pub fn session_cookies(&self) -> Option<SessionCookies> {
        if !self.cookies_enabled() {
            return None;
        }
        Some(SessionCookies {
            steam_login_secure: self.steam_login_secure.clone()?,
            session_id: self.session_id.clone()?,
        })
    }

    /// Printable form of the configuration, `None` when printing is disabled.
    pub fn view(&self) -> Option<ConfigView> {
        let mask = |value: &Option<String>| match self.print_config_mode {
            ConfigPrintMode::Safe => value.as_ref().map(|_| MASKED.to_string()),
            _ => value.clone(),
        };
        if self.print_config_mode == ConfigPrintMode::None {
            return None;
        }
        Some(ConfigView {
            config_path: self.config_path.display().to_string(),
            steam_url: self.steam_url.clone(),
            steam_login_secure: mask(&self.steam_login_secure),
            session_id: mask(&self.session_id),
            max_pagination_depth: self.max_pagination_depth,
            request_delay_ms: self.request_delay_ms,
            request_timeout_secs: self.request_timeout.as_secs(),
            user_agent: self.user_agent.clone(),
            print_config_mode: self.print_config_mode.as_str(),
            dry_run: self.dry_run,
            output_format: self.output_format.as_str(),
            output_file: self
                .output_file
                .as_ref()
                .map(|path| path.display().to_string()),
            cookies_enabled: self.cookies_enabled(),
        })
    }
}

/// Merges file settings with explicit overrides and validates the result at once.
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config_path: PathBuf,
    file: Settings,
    overrides: Settings,
}

impl ConfigBuilder {
    pub fn new(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
            ..Self::default()
        }
    }

    pub fn file_settings(mut self, settings: Settings) -> Self {
        self.file = settings;
        self
    }

    pub fn overrides(mut self, settings: Settings) -> Self {
        self.overrides = settings;
        self
    }

    pub fn build(self) -> Result<ResolvedConfig, ConfigError> {
        let merged = self.overrides.over(self.file);

        let steam_url = non_empty(merged.steam_url)
            .ok_or(ConfigError::MissingRequired(keys::STEAM_URL))?;
        let print_config_mode = non_empty(merged.print_config_mode)
            .map(|raw| raw.parse::<ConfigPrintMode>())
            .transpose()?
            .unwrap_or_default();
        let output_format = non_empty(merged.output_format)
            .map(|raw| raw.parse::<OutputFormat>())
            .transpose()?
            .unwrap_or_default();

        Ok(ResolvedConfig {
            config_path: self.config_path,
            steam_url: normalize_steam_url(&steam_url),
            steam_login_secure: merged.steam_login_secure,
            session_id: merged.session_id,
            max_pagination_depth: parse_positive(
                merged.max_pagination_depth.as_deref(),
                DEFAULT_MAX_PAGINATION_DEPTH,
            ),
            request_delay_ms: merged
                .request_delay_ms
                .as_deref()
                .and_then(|raw| raw.trim().parse::<u64>().ok())
                .unwrap_or(DEFAULT_REQUEST_DELAY_MS),
            request_timeout: Duration::from_secs(parse_positive(
                merged.request_timeout_secs.as_deref(),
                DEFAULT_REQUEST_TIMEOUT_SECS,
            )),
            user_agent: non_empty(merged.user_agent)
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            print_config_mode,
            dry_run: merged.dry_run.as_deref().is_some_and(parse_bool),
            output_format,
            output_file: non_empty(merged.output_file).map(PathBuf::from),
        })
    }
}

/// Loads the env file at `path` and layers `overrides` on top. A missing or
/// unreadable file is logged and treated as empty.
pub fn resolve(path: &Path, overrides: Settings) -> Result<ResolvedConfig, ConfigError> {
    let file_settings = load_settings_file(path).unwrap_or_else(|err| {
        warn!(error = %err, "env file not loaded; continuing with explicit settings");
        Settings::default()
    });
    ConfigBuilder::new(path)
        .file_settings(file_settings)
        .overrides(overrides)
        .build()
}

pub fn load_settings_file(path: &Path) -> Result<Settings, EnvLoadError> {
    if path.as_os_str().is_empty() {
        return Err(EnvLoadError::PathNotProvided);
    }
    let contents = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            EnvLoadError::NotFound(path.to_path_buf())
        } else {
            EnvLoadError::Read {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    Ok(Settings::from_pairs(parse_dotenv(&contents)))
}

pub fn normalize_steam_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.ends_with(ALL_COMMENTS_SUFFIX) {
        trimmed.to_string()
    } else {
        format!("{trimmed}{ALL_COMMENTS_SUFFIX}")
    }
}

fn pick(upper: Option<String>, lower: Option<String>) -> Option<String> {
    upper
        .filter(|value| !value.trim().is_empty())
        .or(lower)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_positive<T>(raw: Option<&str>, default: T) -> T
where
    T: std::str::FromStr + PartialOrd + Default,
{
    raw.and_then(|raw| raw.trim().parse::<T>().ok())
        .filter(|value| *value > T::default())
        .unwrap_or(default)
}

fn parse_bool(raw: &str) -> bool {
    let lowered = raw.trim().to_ascii_lowercase();
    TRUTHY.contains(&lowered.as_str())
}

fn parse_dotenv(contents: &str) -> Vec<(String, String)> {
    contents
        .lines()
        .filter_map(parse_dotenv_line)
        .collect()
}

fn parse_dotenv_line(line: &str) -> Option<(String, String)> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }
    let trimmed = trimmed.strip_prefix("export ").unwrap_or(trimmed);
    let (key, value) = trimmed.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    let value = parse_dotenv_value(value.trim());
    Some((key.to_string(), value))
}

fn parse_dotenv_value(value: &str) -> String {
    if let Some(stripped) = value.strip_prefix('"').and_then(|inner| inner.strip_suffix('"')) {
        return unescape_double_quoted(stripped);
    }
    if let Some(stripped) = value.strip_prefix('\'').and_then(|inner| inner.strip_suffix('\'')) {
        return stripped.to_string();
    }
    value.to_string()
}

fn unescape_double_quoted(value: &str) -> String {
    let mut output = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            match chars.next() {
                Some('n') => output.push('\n'),
                Some('r') => output.push('\r'),
                Some('t') => output.push('\t'),
                Some('\\') => output.push('\\'),
                Some('"') => output.push('"'),
                Some(other) => {
                    output.push('\\');
                    output.push(other);
                }
                None => output.push('\\'),
            }
        } else {
            output.push(ch);
        }
    }
    output
}
