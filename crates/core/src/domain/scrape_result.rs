use std::fmt;

use serde::Serialize;

use crate::domain::comments::{Comment, CommentTone};

/// Whether new comments can be posted on the profile.
///
/// `Enabled` and `Disabled` can only be observed with a logged-in session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentStatus {
    Enabled,
    Disabled,
    Unknown,
}

impl CommentStatus {
    pub fn derive(cookies_enabled: bool, has_reply_box: bool) -> Self {
        match (cookies_enabled, has_reply_box) {
            (false, _) => CommentStatus::Unknown,
            (true, true) => CommentStatus::Enabled,
            (true, false) => CommentStatus::Disabled,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CommentStatus::Enabled => "enabled",
            CommentStatus::Disabled => "disabled",
            CommentStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for CommentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScrapeResult {
    pub profile_name: String,
    pub profile_url: String,
    /// Page order, then in-page order.
    pub comments: Vec<Comment>,
    pub comments_status: CommentStatus,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ToneTally {
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
}

impl ScrapeResult {
    pub fn new(
        profile_name: impl Into<String>,
        profile_url: impl Into<String>,
        comments: Vec<Comment>,
        comments_status: CommentStatus,
    ) -> Self {
        Self {
            profile_name: profile_name.into(),
            profile_url: profile_url.into(),
            comments,
            comments_status,
        }
    }

    pub fn tone_tally(&self) -> ToneTally {
        self.comments
            .iter()
            .fold(ToneTally::default(), |mut tally, comment| {
                match comment.tone() {
                    CommentTone::Positive => tally.positive += 1,
                    CommentTone::Negative => tally.negative += 1,
                    CommentTone::Neutral => tally.neutral += 1,
                }
                tally
            })
    }

    pub fn summary(&self) -> String {
        let count = self.comments.len();
        let noun = if count == 1 { "comment" } else { "comments" };
        match self.comments_status {
            CommentStatus::Unknown => format!(
                "{} has {count} {noun} on their profile.",
                self.profile_name
            ),
            status => format!(
                "{} has {count} {noun} on their profile and has comments {status}.",
                self.profile_name
            ),
        }
    }
}
