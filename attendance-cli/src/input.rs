//! Comment input loading
//!
//! Reads comment records (`{ "name", "time", "content" }`) from a JSON array
//! or a JSON Lines file, in file order.

use anyhow::{Context, Result};
use attendance_engine::{resolve_comment_date, Comment};
use chrono::{SecondsFormat, Utc};
use std::fs;
use std::path::Path;

/// Errors in the comment input format
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("Invalid comment array: {0}")]
    Array(#[source] serde_json::Error),

    #[error("Invalid comment on line {line}: {source}")]
    Line {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Load comments from a file
pub fn load_comments(path: &Path) -> Result<Vec<Comment>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read comments file: {:?}", path))?;

    let mut comments = parse_comments(&content)
        .with_context(|| format!("Failed to parse comments file: {:?}", path))?;
    normalize_times(&mut comments);

    log::info!("Loaded {} comments from {:?}", comments.len(), path);
    Ok(comments)
}

/// Parse a JSON array, or one JSON object per non-empty line
pub fn parse_comments(content: &str) -> std::result::Result<Vec<Comment>, InputError> {
    let trimmed = content.trim_start();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    if trimmed.starts_with('[') {
        return serde_json::from_str(trimmed).map_err(InputError::Array);
    }

    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            serde_json::from_str(line).map_err(|source| InputError::Line {
                line: idx + 1,
                source,
            })
        })
        .collect()
}

/// Stamp comments whose time cannot be read with the current time
pub fn normalize_times(comments: &mut [Comment]) {
    for comment in comments.iter_mut() {
        if resolve_comment_date(&comment.time).is_none() {
            let now = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
            log::warn!(
                "Unreadable time {:?} on comment by {}, using {}",
                comment.time,
                comment.name,
                now
            );
            comment.time = now;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_array() {
        let comments = parse_comments(
            r#"[
                {"name": "민수", "time": "2023-05-01T10:00:00Z", "content": "5.2 @참석 본인."},
                {"name": "철수", "time": "2023.05.01.", "content": "5.2 @취소 철수."}
            ]"#,
        )
        .unwrap();

        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].name, "민수");
        assert_eq!(comments[1].time, "2023.05.01.");
    }

    #[test]
    fn test_parse_json_lines() {
        let content = "{\"name\":\"a\",\"time\":\"\",\"content\":\"x\"}\n\n{\"name\":\"b\",\"time\":\"\",\"content\":\"y\"}\n";
        let comments = parse_comments(content).unwrap();
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[1].name, "b");
    }

    #[test]
    fn test_parse_reports_bad_line() {
        let content = "{\"name\":\"a\",\"time\":\"\",\"content\":\"x\"}\nnot json\n";
        match parse_comments(content) {
            Err(InputError::Line { line, .. }) => assert_eq!(line, 2),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_parse_empty() {
        assert!(parse_comments("  \n").unwrap().is_empty());
    }

    #[test]
    fn test_normalize_times() {
        let mut comments = vec![
            Comment::new("a", "2023-05-01 10:00", "x"),
            Comment::new("b", "방금 전", "y"),
        ];
        normalize_times(&mut comments);

        assert_eq!(comments[0].time, "2023-05-01 10:00");
        assert!(resolve_comment_date(&comments[1].time).is_some());
    }
}
