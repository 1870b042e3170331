pub mod comments;
pub mod scrape_result;

pub use comments::{Comment, CommentTone};
pub use scrape_result::{CommentStatus, ScrapeResult};
