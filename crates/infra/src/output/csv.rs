use csv::{Terminator, WriterBuilder};

use steamscrape_core::domain::ScrapeResult;

use super::OutputError;

/// Always written, so a result without comments renders as the header row alone.
const HEADERS: [&str; 6] = [
    "profile_name",
    "profile_url",
    "comments_status",
    "author_name",
    "text",
    "timestamp",
];

pub(super) fn render(result: &ScrapeResult) -> Result<String, OutputError> {
    let mut writer = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.write_record(HEADERS)?;
    for comment in &result.comments {
        let timestamp = comment.timestamp.to_string();
        writer.write_record([
            result.profile_name.as_str(),
            result.profile_url.as_str(),
            result.comments_status.as_str(),
            comment.author_name.as_str(),
            comment.text.as_str(),
            timestamp.as_str(),
        ])?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| OutputError::Csv(err.into_error().into()))?;
    Ok(String::from_utf8(bytes)?)
}
