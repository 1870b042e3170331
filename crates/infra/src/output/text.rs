use steamscrape_core::domain::{Comment, CommentTone, ScrapeResult};

use super::OutputError;

pub(super) fn render(result: &ScrapeResult) -> Result<String, OutputError> {
    let tally = result.tone_tally();
    let mut lines = vec![
        format!("Profile Name: {}", result.profile_name),
        format!("Profile URL: {}", result.profile_url),
        format!("Comments Status: {}", result.comments_status),
        format!("Total Comments: {}", result.comments.len()),
        format!(
            "Tone: {} {}, {} {}, {} {}",
            tally.positive,
            CommentTone::Positive.label(),
            tally.negative,
            CommentTone::Negative.label(),
            tally.neutral,
            CommentTone::Neutral.label()
        ),
        "Comments:".to_string(),
    ];
    lines.extend(result.comments.iter().map(comment_line));
    Ok(lines.join("\n"))
}

fn comment_line(comment: &Comment) -> String {
    let posted_at = comment
        .posted_at()
        .map(|date| date.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| comment.timestamp.to_string());
    format!(
        "At {posted_at} user named {} commented: {}",
        comment.author_name, comment.text
    )
}
