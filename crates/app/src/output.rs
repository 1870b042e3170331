use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use steamscrape_core::domain::ScrapeResult;
use steamscrape_core::types::OutputFormat;
use steamscrape_infra::output::{OutputError, render};

#[derive(Debug, Error)]
pub enum OutputWriteError {
    #[error(transparent)]
    Render(#[from] OutputError),
    #[error("failed to write output to {path}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write output to stdout: {0}")]
    Stdout(#[source] std::io::Error),
}

/// Renders the result and writes it to `path`, or to stdout when no path is set.
pub fn write_result(
    result: &ScrapeResult,
    format: OutputFormat,
    path: Option<&Path>,
) -> Result<(), OutputWriteError> {
    let mut rendered = render(result, format)?;
    if !rendered.ends_with('\n') {
        rendered.push('\n');
    }
    match path {
        Some(path) => {
            std::fs::write(path, rendered.as_bytes()).map_err(|source| {
                OutputWriteError::File {
                    path: path.to_path_buf(),
                    source,
                }
            })?;
            info!(path = %path.display(), %format, "output written");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(rendered.as_bytes())
                .and_then(|()| stdout.flush())
                .map_err(OutputWriteError::Stdout)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use steamscrape_core::domain::{Comment, CommentStatus, ScrapeResult};
    use steamscrape_core::types::OutputFormat;

    use super::{OutputWriteError, write_result};

    fn sample() -> ScrapeResult {
        ScrapeResult::new(
            "gaben",
            "https://steamcommunity.com/id/gaben/allcomments",
            vec![Comment::new("alice", 1_700_000_000, "+rep")],
            CommentStatus::Disabled,
        )
    }

    #[test]
    fn writes_rendered_output_to_file() {
        let path = std::env::temp_dir().join(format!(
            "steamscrape-output-{}.csv",
            std::process::id()
        ));
        write_result(&sample(), OutputFormat::Csv, Some(&path)).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert!(written.starts_with("profile_name,profile_url,comments_status"));
        assert!(written.contains("alice,+rep,1700000000"));
        assert!(written.ends_with('\n'));
    }

    #[test]
    fn unwritable_path_is_reported() {
        let path = std::env::temp_dir()
            .join("steamscrape-missing-dir")
            .join("nested")
            .join("out.json");
        let err = write_result(&sample(), OutputFormat::Json, Some(&path)).unwrap_err();
        assert!(matches!(err, OutputWriteError::File { .. }));
    }
}
