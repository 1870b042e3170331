mod csv;
mod json;
mod text;
mod xml;

use std::string::FromUtf8Error;

use thiserror::Error;

use steamscrape_core::domain::ScrapeResult;
use steamscrape_core::types::OutputFormat;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("json serialization failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("csv serialization failed: {0}")]
    Csv(#[from] ::csv::Error),
    #[error("xml serialization failed: {0}")]
    Xml(String),
    #[error("rendered output is not utf-8: {0}")]
    Utf8(#[from] FromUtf8Error),
    #[error("no renderer registered for format {0}")]
    UnsupportedFormat(OutputFormat),
}

pub type RenderFn = fn(&ScrapeResult) -> Result<String, OutputError>;

const RENDERERS: [(OutputFormat, RenderFn); 4] = [
    (OutputFormat::Json, json::render),
    (OutputFormat::Csv, csv::render),
    (OutputFormat::Xml, xml::render),
    (OutputFormat::Text, text::render),
];

pub fn renderer(format: OutputFormat) -> Option<RenderFn> {
    RENDERERS
        .iter()
        .find(|(candidate, _)| *candidate == format)
        .map(|(_, render)| *render)
}

pub fn render(result: &ScrapeResult, format: OutputFormat) -> Result<String, OutputError> {
    let render = renderer(format).ok_or(OutputError::UnsupportedFormat(format))?;
    render(result)
}
