use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
    Xml,
    Text,
}

impl OutputFormat {
    pub const ACCEPTED: &'static str = "json, csv, xml, text";

    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Xml => "xml",
            OutputFormat::Text => "text",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = CoreError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            "xml" => Ok(OutputFormat::Xml),
            "text" => Ok(OutputFormat::Text),
            _ => Err(CoreError::InvalidChoice {
                field: "output_format",
                value: value.to_string(),
                accepted: Self::ACCEPTED,
            }),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_formats() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!(" CSV ".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);
        assert_eq!("xml".parse::<OutputFormat>().unwrap(), OutputFormat::Xml);
        assert_eq!("Text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
    }

    #[test]
    fn reject_unknown_format_with_accepted_values() {
        let err = "yaml".parse::<OutputFormat>().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("yaml"));
        assert!(message.contains("json, csv, xml, text"));
    }
}
