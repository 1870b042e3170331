use serde::Serialize;
use serde_json::Serializer;
use serde_json::ser::PrettyFormatter;

use steamscrape_core::domain::ScrapeResult;

use super::OutputError;

pub(super) fn render(result: &ScrapeResult) -> Result<String, OutputError> {
    let mut buf = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    result.serialize(&mut serializer)?;
    Ok(String::from_utf8(buf)?)
}
