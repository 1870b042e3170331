use std::ops::RangeInclusive;

use tracing::{debug, info, warn};

use crate::config::ResolvedConfig;
use steamscrape_core::domain::{Comment, CommentStatus, ScrapeResult};
use steamscrape_infra::steam::{SteamClient, SteamClientError, SteamPageParser};

pub const DRY_RUN_PROFILE_NAME: &str = "dry-run";
pub const UNKNOWN_PROFILE_NAME: &str = "unknown";

/// Yields raw page content, `None` when the fetch was suppressed.
pub trait PageSource {
    async fn fetch_page(&mut self, page: u32) -> Result<Option<Vec<u8>>, SteamClientError>;
}

pub trait PageParser {
    fn comments(&self, html: &[u8]) -> Vec<Comment>;
    fn has_reply_box(&self, html: &[u8]) -> bool;
    fn profile_name(&self, html: &[u8]) -> Option<String>;
}

impl PageSource for SteamClient {
    async fn fetch_page(&mut self, page: u32) -> Result<Option<Vec<u8>>, SteamClientError> {
        self.fetch_comments_page(page).await
    }
}

impl PageParser for SteamPageParser {
    fn comments(&self, html: &[u8]) -> Vec<Comment> {
        self.parse_comments(html)
    }

    fn has_reply_box(&self, html: &[u8]) -> bool {
        SteamPageParser::has_reply_box(self, html)
    }

    fn profile_name(&self, html: &[u8]) -> Option<String> {
        self.parse_profile_name(html)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// A page parsed to zero comments.
    EndOfData,
    /// The configured depth cap was hit; later pages may hold more comments.
    DepthReached,
    /// Every page was suppressed by dry-run.
    NoContent,
}

#[derive(Debug)]
pub struct Loaded {
    pub result: ScrapeResult,
    pub stop: StopReason,
    pub pages_fetched: u32,
}

pub struct CommentLoader<S, P> {
    source: S,
    parser: P,
    profile_url: String,
    max_pagination_depth: u32,
    cookies_enabled: bool,
}

impl<S: PageSource, P: PageParser> CommentLoader<S, P> {
    pub fn new(source: S, parser: P, config: &ResolvedConfig) -> Self {
        Self {
            source,
            parser,
            profile_url: config.steam_url().to_string(),
            max_pagination_depth: config.max_pagination_depth(),
            cookies_enabled: config.cookies_enabled(),
        }
    }

    #[cfg(test)]
    fn source(&self) -> &S {
        &self.source
    }

    pub async fn load_all(&mut self) -> Result<Loaded, SteamClientError> {
        let mut comments = Vec::new();
        let mut first_page: Option<Vec<u8>> = None;
        let mut last_page: Option<Vec<u8>> = None;
        let mut pages_fetched = 0;
        let mut stop = StopReason::NoContent;

        for page in page_numbers(self.max_pagination_depth) {
            let Some(content) = self.source.fetch_page(page).await? else {
                debug!(page, "no page content, skipping");
                continue;
            };
            pages_fetched += 1;

            let page_comments = self.parser.comments(&content);
            debug!(page, comments = page_comments.len(), "comments page parsed");
            let end_of_data = is_end_of_data(&page_comments);
            comments.extend(page_comments);
            if page == 1 {
                first_page = Some(content.clone());
            }
            last_page = Some(content);

            if end_of_data {
                info!(page, "all comments loaded");
                stop = StopReason::EndOfData;
                break;
            }
            if is_depth_reached(page, self.max_pagination_depth) {
                stop = StopReason::DepthReached;
                break;
            }
        }

        let comments_status = match &last_page {
            Some(content) => {
                CommentStatus::derive(self.cookies_enabled, self.parser.has_reply_box(content))
            }
            None => CommentStatus::Unknown,
        };
        let profile_name = match &first_page {
            Some(content) => self.parser.profile_name(content).unwrap_or_else(|| {
                warn!("profile name not found on first comments page");
                UNKNOWN_PROFILE_NAME.to_string()
            }),
            None => DRY_RUN_PROFILE_NAME.to_string(),
        };

        Ok(Loaded {
            result: ScrapeResult::new(
                profile_name,
                self.profile_url.clone(),
                comments,
                comments_status,
            ),
            stop,
            pages_fetched,
        })
    }
}

fn page_numbers(max_pagination_depth: u32) -> RangeInclusive<u32> {
    1..=max_pagination_depth
}

fn is_end_of_data(page_comments: &[Comment]) -> bool {
    page_comments.is_empty()
}

fn is_depth_reached(page: u32, max_pagination_depth: u32) -> bool {
    page >= max_pagination_depth
}

#[cfg(test)]
mod tests {
    use steamscrape_core::domain::{Comment, CommentStatus};
    use steamscrape_infra::steam::{RequestFailure, SteamPageParser, SteamClientError};

    use super::{
        CommentLoader, DRY_RUN_PROFILE_NAME, PageParser, PageSource, StopReason,
        is_depth_reached, is_end_of_data, page_numbers,
    };
    use crate::config::{ConfigBuilder, ResolvedConfig, Settings};

    /// Pages are plain text: `name=..` sets the profile name, `reply` marks the
    /// reply box, any other line is `author|timestamp|text`.
    struct FakeSource {
        pages: Vec<&'static str>,
        max_pagination_depth: u32,
        fail_on: Option<u32>,
        dry_run: bool,
        requested: Vec<u32>,
    }

    impl FakeSource {
        fn new(pages: Vec<&'static str>, max_pagination_depth: u32) -> Self {
            Self {
                pages,
                max_pagination_depth,
                fail_on: None,
                dry_run: false,
                requested: Vec::new(),
            }
        }
    }

    impl PageSource for FakeSource {
        async fn fetch_page(&mut self, page: u32) -> Result<Option<Vec<u8>>, SteamClientError> {
            if page > self.max_pagination_depth {
                return Err(SteamClientError::MaxPaginationDepthExceeded {
                    page,
                    max: self.max_pagination_depth,
                });
            }
            if self.dry_run {
                return Ok(None);
            }
            self.requested.push(page);
            if self.fail_on == Some(page) {
                return Err(SteamClientError::RequestFailed {
                    reason: RequestFailure::Http(500),
                    source: None,
                });
            }
            let body = self
                .pages
                .get(page as usize - 1)
                .copied()
                .unwrap_or_default();
            Ok(Some(body.as_bytes().to_vec()))
        }
    }

    struct FakeParser;

    impl FakeParser {
        fn lines(html: &[u8]) -> Vec<String> {
            String::from_utf8_lossy(html)
                .lines()
                .map(|line| line.trim().to_string())
                .filter(|line| !line.is_empty())
                .collect()
        }
    }

    impl PageParser for FakeParser {
        fn comments(&self, html: &[u8]) -> Vec<Comment> {
            Self::lines(html)
                .iter()
                .filter_map(|line| {
                    let mut parts = line.splitn(3, '|');
                    let author = parts.next()?;
                    let timestamp = parts.next()?.parse().ok()?;
                    let text = parts.next()?;
                    Some(Comment::new(author, timestamp, text))
                })
                .collect()
        }

        fn has_reply_box(&self, html: &[u8]) -> bool {
            Self::lines(html).iter().any(|line| line == "reply")
        }

        fn profile_name(&self, html: &[u8]) -> Option<String> {
            Self::lines(html)
                .iter()
                .find_map(|line| line.strip_prefix("name=").map(str::to_string))
        }
    }

    fn config(extra: &str) -> ResolvedConfig {
        let contents = format!("steam_url=http://x/profile\n{extra}");
        let pairs = contents.lines().filter_map(|line| {
            line.split_once('=')
                .map(|(key, value)| (key.to_string(), value.to_string()))
        });
        ConfigBuilder::new("test.env")
            .file_settings(Settings::from_pairs(pairs))
            .build()
            .unwrap()
    }

    #[test]
    fn termination_conditions() {
        assert!(is_end_of_data(&[]));
        assert!(!is_end_of_data(&[Comment::new("a", 1, "b")]));
        assert!(is_depth_reached(3, 3));
        assert!(!is_depth_reached(2, 3));
    }

    #[test]
    fn page_numbers_cover_the_full_u32_range() {
        assert_eq!(page_numbers(3).collect::<Vec<_>>(), [1, 2, 3]);
        assert_eq!(page_numbers(0).count(), 0);
        let mut pages = page_numbers(u32::MAX);
        assert_eq!(pages.next_back(), Some(u32::MAX));
        assert_eq!(pages.next_back(), Some(u32::MAX - 1));
    }

    #[tokio::test]
    async fn stops_on_first_empty_page_keeping_order() {
        let config = config("MAX_PAGINATION_DEPTH=10");
        let source = FakeSource::new(
            vec![
                "name=gaben\na|1|one\nb|2|two\nc|3|three",
                "d|4|four\ne|5|five",
                "name=gaben",
                "f|6|never reached",
            ],
            10,
        );
        let mut loader = CommentLoader::new(source, FakeParser, &config);
        let loaded = loader.load_all().await.unwrap();

        assert_eq!(loaded.stop, StopReason::EndOfData);
        assert_eq!(loaded.pages_fetched, 3);
        assert_eq!(loader.source().requested, vec![1, 2, 3]);
        let texts: Vec<_> = loaded
            .result
            .comments
            .iter()
            .map(|comment| comment.text.as_str())
            .collect();
        assert_eq!(texts, vec!["one", "two", "three", "four", "five"]);
        assert_eq!(loaded.result.profile_name, "gaben");
        assert_eq!(loaded.result.profile_url, "http://x/profile/allcomments");
    }

    #[tokio::test]
    async fn depth_of_one_fetches_a_single_page() {
        let config = config("MAX_PAGINATION_DEPTH=1");
        let source = FakeSource::new(vec!["a|1|one\nb|2|two\nc|3|three", "d|4|four"], 1);
        let mut loader = CommentLoader::new(source, FakeParser, &config);
        let loaded = loader.load_all().await.unwrap();

        assert_eq!(loaded.stop, StopReason::DepthReached);
        assert_eq!(loaded.result.comments.len(), 3);
        assert_eq!(loader.source().requested, vec![1]);
    }

    #[tokio::test]
    async fn never_requests_beyond_depth() {
        let config = config("MAX_PAGINATION_DEPTH=3");
        let source = FakeSource::new(vec!["a|1|x", "b|2|y", "c|3|z", "d|4|w"], 3);
        let mut loader = CommentLoader::new(source, FakeParser, &config);
        let loaded = loader.load_all().await.unwrap();

        assert_eq!(loaded.stop, StopReason::DepthReached);
        assert_eq!(loader.source().requested, vec![1, 2, 3]);
        assert_eq!(loaded.result.comments.len(), 3);
    }

    #[tokio::test]
    async fn fetch_errors_propagate() {
        let config = config("");
        let mut source = FakeSource::new(vec!["a|1|x", "b|2|y", ""], 100);
        source.fail_on = Some(2);
        let mut loader = CommentLoader::new(source, FakeParser, &config);
        let err = loader.load_all().await.unwrap_err();
        assert!(matches!(
            err,
            SteamClientError::RequestFailed {
                reason: RequestFailure::Http(500),
                ..
            }
        ));
        assert_eq!(loader.source().requested, vec![1, 2]);
    }

    #[tokio::test]
    async fn status_is_unknown_without_credentials() {
        let config = config("");
        let source = FakeSource::new(vec!["reply\na|1|x", "reply"], 100);
        let mut loader = CommentLoader::new(source, FakeParser, &config);
        let loaded = loader.load_all().await.unwrap();
        assert_eq!(loaded.result.comments_status, CommentStatus::Unknown);
    }

    #[tokio::test]
    async fn status_follows_last_page_with_credentials() {
        let config = config("steamLoginSecure=abc\nsessionid=def");
        let source = FakeSource::new(vec!["a|1|x", "reply"], 100);
        let mut loader = CommentLoader::new(source, FakeParser, &config);
        let loaded = loader.load_all().await.unwrap();
        assert_eq!(loaded.result.comments_status, CommentStatus::Enabled);

        let source = FakeSource::new(vec!["reply\na|1|x", ""], 100);
        let mut loader = CommentLoader::new(source, FakeParser, &config);
        let loaded = loader.load_all().await.unwrap();
        assert_eq!(loaded.result.comments_status, CommentStatus::Disabled);
    }

    #[tokio::test]
    async fn missing_profile_name_uses_placeholder() {
        let config = config("");
        let source = FakeSource::new(vec!["a|1|x", ""], 100);
        let mut loader = CommentLoader::new(source, FakeParser, &config);
        let loaded = loader.load_all().await.unwrap();
        assert_eq!(loaded.result.profile_name, super::UNKNOWN_PROFILE_NAME);
    }

    #[tokio::test]
    async fn dry_run_source_yields_empty_result() {
        let config = config("MAX_PAGINATION_DEPTH=5\nsteamLoginSecure=abc\nsessionid=def");
        let mut source = FakeSource::new(vec!["a|1|x"], 5);
        source.dry_run = true;
        let mut loader = CommentLoader::new(source, FakeParser, &config);
        let loaded = loader.load_all().await.unwrap();

        assert_eq!(loaded.stop, StopReason::NoContent);
        assert_eq!(loaded.pages_fetched, 0);
        assert!(loaded.result.comments.is_empty());
        assert_eq!(loaded.result.comments_status, CommentStatus::Unknown);
        assert_eq!(loaded.result.profile_name, DRY_RUN_PROFILE_NAME);
    }

    #[tokio::test]
    async fn dry_run_client_issues_no_requests() {
        let config = config("MAX_PAGINATION_DEPTH=4\ndry_run=true\nrequest_delay_ms=60000");
        let client = crate::wiring::build_client(&config).unwrap();
        let mut loader = CommentLoader::new(client, SteamPageParser, &config);
        let loaded = loader.load_all().await.unwrap();

        assert_eq!(loaded.stop, StopReason::NoContent);
        assert!(loaded.result.comments.is_empty());
        let dry_run = loader.source().dry_run();
        assert_eq!(dry_run.skipped(), 4);
        assert_eq!(
            dry_run.last_action(),
            Some("GET http://x/profile/allcomments?ctp=4")
        );
    }
}
