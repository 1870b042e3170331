use scraper::{ElementRef, Html, Selector};
use tracing::warn;

use steamscrape_core::domain::Comment;

/// Extracts comment thread data from a profile's `allcomments` page.
#[derive(Debug, Clone, Copy, Default)]
pub struct SteamPageParser;

impl SteamPageParser {
    pub fn parse_comments(&self, html: &[u8]) -> Vec<Comment> {
        let document = parse_document(html);
        let comment_selector = Selector::parse("div.commentthread_comment").expect("selector");
        let author_selector = Selector::parse("a.commentthread_author_link").expect("selector");
        let timestamp_selector =
            Selector::parse("span.commentthread_comment_timestamp").expect("selector");
        let text_selector = Selector::parse("div.commentthread_comment_text").expect("selector");

        document
            .select(&comment_selector)
            .filter_map(|entry| {
                let author = entry
                    .select(&author_selector)
                    .next()
                    .map(extract_text)
                    .filter(|text| !text.is_empty());
                let timestamp = entry
                    .select(&timestamp_selector)
                    .next()
                    .and_then(|node| node.value().attr("data-timestamp"))
                    .and_then(|raw| raw.trim().parse::<i64>().ok());
                let text = entry
                    .select(&text_selector)
                    .next()
                    .map(|node| node.text().collect::<String>().trim().to_string());

                match (author, timestamp, text) {
                    (Some(author), Some(timestamp), Some(text)) => {
                        Some(Comment::new(author, timestamp, text))
                    }
                    _ => {
                        warn!("skipping comment entry with missing author, timestamp or text");
                        None
                    }
                }
            })
            .collect()
    }

    /// The reply box is only rendered for logged-in visitors allowed to comment.
    pub fn has_reply_box(&self, html: &[u8]) -> bool {
        let document = parse_document(html);
        let selector = Selector::parse("div.commentthread_entry_quotebox").expect("selector");
        document.select(&selector).next().is_some()
    }

    pub fn parse_profile_name(&self, html: &[u8]) -> Option<String> {
        if html.is_empty() {
            return None;
        }
        let document = parse_document(html);
        let selector =
            Selector::parse("div.profile_small_header_text a.persona_name_text_content")
                .expect("selector");
        document
            .select(&selector)
            .next()
            .map(extract_text)
            .filter(|name| !name.is_empty())
    }
}

fn parse_document(html: &[u8]) -> Html {
    Html::parse_document(&String::from_utf8_lossy(html))
}

fn extract_text(element: ElementRef<'_>) -> String {
    normalize_whitespace(&element.text().collect::<String>())
}

fn normalize_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}
