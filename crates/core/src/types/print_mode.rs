use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// How the resolved configuration is echoed at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfigPrintMode {
    /// Credentials masked.
    Safe,
    Full,
    #[default]
    None,
}

impl ConfigPrintMode {
    pub const ACCEPTED: &'static str = "safe, full, none";

    pub fn as_str(self) -> &'static str {
        match self {
            ConfigPrintMode::Safe => "safe",
            ConfigPrintMode::Full => "full",
            ConfigPrintMode::None => "none",
        }
    }
}

impl FromStr for ConfigPrintMode {
    type Err = CoreError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "safe" => Ok(ConfigPrintMode::Safe),
            "full" => Ok(ConfigPrintMode::Full),
            "none" => Ok(ConfigPrintMode::None),
            _ => Err(CoreError::InvalidChoice {
                field: "print_config_mode",
                value: value.to_string(),
                accepted: Self::ACCEPTED,
            }),
        }
    }
}

impl fmt::Display for ConfigPrintMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
