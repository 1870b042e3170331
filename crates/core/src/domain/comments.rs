use chrono::{DateTime, Utc};
use serde::Serialize;

const NEGATIVE_MARKERS: [&str; 3] = ["-rep", "- rep", "rep-"];
const POSITIVE_MARKERS: [&str; 3] = ["+rep", "+ rep", "rep+"];

/// One entry of a profile comment thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comment {
    pub author_name: String,
    /// Seconds since the unix epoch.
    pub timestamp: i64,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentTone {
    Positive,
    Negative,
    Neutral,
}

impl Comment {
    pub fn new(author_name: impl Into<String>, timestamp: i64, text: impl Into<String>) -> Self {
        Self {
            author_name: author_name.into(),
            timestamp,
            text: text.into(),
        }
    }

    pub fn posted_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.timestamp, 0)
    }

    /// Reputation tone of the comment. Negative markers win over positive ones.
    pub fn tone(&self) -> CommentTone {
        let lowered = self.text.to_lowercase();
        if NEGATIVE_MARKERS.iter().any(|marker| lowered.contains(marker)) {
            return CommentTone::Negative;
        }
        if POSITIVE_MARKERS.iter().any(|marker| lowered.contains(marker)) {
            return CommentTone::Positive;
        }
        CommentTone::Neutral
    }
}

impl CommentTone {
    pub fn label(self) -> &'static str {
        match self {
            CommentTone::Positive => "positive",
            CommentTone::Negative => "negative",
            CommentTone::Neutral => "neutral",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Comment, CommentTone};

    #[test]
    fn tone_detects_positive_rep() {
        let comment = Comment::new("alice", 0, "+REP great trader");
        assert_eq!(comment.tone(), CommentTone::Positive);
        let comment = Comment::new("alice", 0, "friendly player rep+");
        assert_eq!(comment.tone(), CommentTone::Positive);
    }

    #[test]
    fn tone_prefers_negative_markers() {
        let comment = Comment::new("bob", 0, "- rep scammer, was +rep before");
        assert_eq!(comment.tone(), CommentTone::Negative);
    }

    #[test]
    fn tone_defaults_to_neutral() {
        let comment = Comment::new("carol", 0, "hello there");
        assert_eq!(comment.tone(), CommentTone::Neutral);
        assert_eq!(comment.tone().label(), "neutral");
    }

    #[test]
    fn posted_at_converts_epoch_seconds() {
        let comment = Comment::new("dave", 1_700_000_000, "hi");
        let posted = comment.posted_at().unwrap();
        assert_eq!(posted.to_rfc3339(), "2023-11-14T22:13:20+00:00");
    }
}
