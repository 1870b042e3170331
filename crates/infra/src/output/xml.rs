use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use steamscrape_core::domain::{Comment, ScrapeResult};

use super::OutputError;

type XmlWriter = Writer<Vec<u8>>;

pub(super) fn render(result: &ScrapeResult) -> Result<String, OutputError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    emit(
        &mut writer,
        Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)),
    )?;
    emit(&mut writer, Event::Start(BytesStart::new("ScrapeResult")))?;
    text_element(&mut writer, "ProfileName", &result.profile_name)?;
    text_element(&mut writer, "ProfileURL", &result.profile_url)?;
    text_element(&mut writer, "CommentsStatus", result.comments_status.as_str())?;
    if result.comments.is_empty() {
        emit(&mut writer, Event::Empty(BytesStart::new("AccountComments")))?;
    } else {
        emit(&mut writer, Event::Start(BytesStart::new("AccountComments")))?;
        for comment in &result.comments {
            comment_element(&mut writer, comment)?;
        }
        emit(&mut writer, Event::End(BytesEnd::new("AccountComments")))?;
    }
    emit(&mut writer, Event::End(BytesEnd::new("ScrapeResult")))?;
    Ok(String::from_utf8(writer.into_inner())?)
}

fn comment_element(writer: &mut XmlWriter, comment: &Comment) -> Result<(), OutputError> {
    emit(writer, Event::Start(BytesStart::new("Comment")))?;
    text_element(writer, "AuthorName", &comment.author_name)?;
    text_element(writer, "Text", &comment.text)?;
    text_element(writer, "Timestamp", &comment.timestamp.to_string())?;
    emit(writer, Event::End(BytesEnd::new("Comment")))
}

fn text_element(writer: &mut XmlWriter, name: &str, text: &str) -> Result<(), OutputError> {
    emit(writer, Event::Start(BytesStart::new(name)))?;
    emit(writer, Event::Text(BytesText::new(text)))?;
    emit(writer, Event::End(BytesEnd::new(name)))
}

fn emit(writer: &mut XmlWriter, event: Event<'_>) -> Result<(), OutputError> {
    writer
        .write_event(event)
        .map_err(|err| OutputError::Xml(err.to_string()))
}
