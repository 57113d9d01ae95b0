//! Tag scanning
//!
//! Finds every `<month>.<day> @<keyword>` occurrence in a comment and turns it
//! into an [`AttendanceTag`]. Each call materializes its own list of matches;
//! no scanning position survives between calls.

use crate::config::EngineConfig;
use crate::dates::DateTokenParser;
use crate::extract::NameSegment;
use crate::types::{AttendanceAction, AttendanceTag, EngineError, Result, TagDate};
use regex::Regex;

/// One raw pattern hit, before the name segment is cut
struct TagMatch<'a> {
    start: usize,
    end: usize,
    token: &'a str,
    keyword: &'a str,
}

/// Scans comment content for attendance tags
#[derive(Debug, Clone)]
pub struct TagExtractor {
    config: EngineConfig,
    parser: DateTokenParser,
    pattern: Regex,
}

impl TagExtractor {
    /// Build an extractor for the given tag syntax
    pub fn new(config: EngineConfig) -> Result<Self> {
        let parser = DateTokenParser::for_year(config.reference_year);
        Self::with_parser(config, parser)
    }

    /// Build an extractor with an explicit date parser
    pub fn with_parser(config: EngineConfig, parser: DateTokenParser) -> Result<Self> {
        if config.attend_keywords.iter().all(|k| k.is_empty()) {
            return Err(EngineError::InvalidConfig(
                "at least one attend keyword is required".to_string(),
            ));
        }
        if config.cancel_keywords.iter().all(|k| k.is_empty()) {
            return Err(EngineError::InvalidConfig(
                "at least one cancel keyword is required".to_string(),
            ));
        }

        let pattern = Regex::new(&build_pattern(&config))?;
        log::debug!("Tag pattern: {}", pattern.as_str());

        Ok(Self {
            config,
            parser,
            pattern,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn parser(&self) -> &DateTokenParser {
        &self.parser
    }

    /// Extract all tags from one comment.
    ///
    /// Names are returned as written; the self token stays a placeholder. When
    /// no tag is present and the fallback is enabled, a bare attendance keyword
    /// yields one implicit Attend tag for `author` dated by the comment time.
    pub fn extract(&self, content: &str, author: &str) -> Vec<AttendanceTag> {
        let matches = self.scan(content);

        if matches.is_empty() {
            return self.implicit_tag(content, author).into_iter().collect();
        }

        let mut tags = Vec::with_capacity(matches.len());
        for (i, hit) in matches.iter().enumerate() {
            // Segment ends at the terminator or the next tag, whichever is first
            let window_end = matches.get(i + 1).map_or(content.len(), |next| next.start);
            let segment = NameSegment::cut(&content[hit.end..window_end], self.config.terminator);
            let names = segment.names(&self.config);

            let date = match self.parser.parse(hit.token) {
                Ok(date) => TagDate::Explicit(date),
                Err(e) => {
                    log::debug!("Tag at offset {} has unusable date: {}", hit.start, e);
                    TagDate::Unparsed(hit.token.to_string())
                }
            };

            let action = self.action_for(hit.keyword);
            log::debug!(
                "Found tag at offset {}: {} {} -> {:?}",
                hit.start,
                hit.token,
                action,
                names
            );

            tags.push(AttendanceTag {
                date,
                action,
                names,
                match_offset: hit.start,
            });
        }

        tags
    }

    /// Collect every non-overlapping pattern hit, left to right
    fn scan<'a>(&self, content: &'a str) -> Vec<TagMatch<'a>> {
        self.pattern
            .captures_iter(content)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                Some(TagMatch {
                    start: whole.start(),
                    end: whole.end(),
                    token: caps.get(1)?.as_str(),
                    keyword: caps.get(2)?.as_str(),
                })
            })
            .collect()
    }

    fn action_for(&self, keyword: &str) -> AttendanceAction {
        if self.config.cancel_keywords.iter().any(|k| k == keyword) {
            AttendanceAction::Cancel
        } else {
            AttendanceAction::Attend
        }
    }

    fn implicit_tag(&self, content: &str, author: &str) -> Option<AttendanceTag> {
        if !self.config.implicit_fallback {
            return None;
        }

        let offset = self
            .config
            .implicit_keywords
            .iter()
            .filter(|k| !k.is_empty())
            .filter_map(|k| content.find(k.as_str()))
            .min()?;

        log::debug!("No tags in comment by {}, using bare keyword fallback", author);
        Some(AttendanceTag {
            date: TagDate::CommentTime,
            action: AttendanceAction::Attend,
            names: vec![author.to_string()],
            match_offset: offset,
        })
    }
}

/// `([0-9]+\.[0-9]+)\s+@(kw1|kw2|...)`, longest keywords first
fn build_pattern(config: &EngineConfig) -> String {
    let mut keywords: Vec<&str> = config
        .attend_keywords
        .iter()
        .chain(config.cancel_keywords.iter())
        .map(String::as_str)
        .filter(|k| !k.is_empty())
        .collect();
    keywords.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
    keywords.dedup();

    let alternation = keywords
        .iter()
        .map(|k| regex::escape(k))
        .collect::<Vec<_>>()
        .join("|");

    format!(r"([0-9]+\.[0-9]+)\s+@({})", alternation)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> TagExtractor {
        TagExtractor::new(EngineConfig::new().with_reference_year(2023)).unwrap()
    }

    #[test]
    fn test_single_tag() {
        let tags = extractor().extract("5.2 @참석 철수, 영희. 감사합니다", "민수");
        assert_eq!(tags.len(), 1);

        let tag = &tags[0];
        assert_eq!(tag.explicit_date().unwrap().to_string(), "2023-05-02");
        assert_eq!(tag.action, AttendanceAction::Attend);
        assert_eq!(tag.names, vec!["철수", "영희"]);
        assert_eq!(tag.match_offset, 0);
    }

    #[test]
    fn test_multiple_tags_in_one_comment() {
        let content = "안녕하세요 5.1 @참석 철수. 5.3 @취소 영희, 민수.";
        let tags = extractor().extract(content, "작성자");
        assert_eq!(tags.len(), 2);

        assert_eq!(tags[0].explicit_date().unwrap().to_string(), "2023-05-01");
        assert_eq!(tags[0].action, AttendanceAction::Attend);
        assert_eq!(tags[0].names, vec!["철수"]);
        assert_eq!(tags[0].match_offset, content.find("5.1").unwrap());

        assert_eq!(tags[1].explicit_date().unwrap().to_string(), "2023-05-03");
        assert_eq!(tags[1].action, AttendanceAction::Cancel);
        assert_eq!(tags[1].names, vec!["영희", "민수"]);
    }

    #[test]
    fn test_segment_bounded_by_next_tag() {
        let tags = extractor().extract("5.1 @참석 철수 5.2 @참석 영희.", "작성자");
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0].names, vec!["철수"]);
        assert_eq!(tags[1].names, vec!["영희"]);
    }

    #[test]
    fn test_self_token_stays_placeholder() {
        let tags = extractor().extract("5.3 @참석 본인.", "민수");
        assert_eq!(tags[0].names, vec!["본인"]);
    }

    #[test]
    fn test_unparseable_date_is_reported() {
        let tags = extractor().extract("13.5 @참석 철수.", "민수");
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].date, TagDate::Unparsed("13.5".to_string()));
    }

    #[test]
    fn test_requires_whitespace_before_at() {
        let tags = extractor().extract("5.2@참석 철수.", "민수");
        // Not a tag, but the bare keyword fallback applies
        assert_eq!(tags.len(), 1);
        assert!(tags[0].is_implicit());
    }

    #[test]
    fn test_fallback_on_bare_keyword() {
        let tags = extractor().extract("저도 참가할게요!", "민수");
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].date, TagDate::CommentTime);
        assert_eq!(tags[0].action, AttendanceAction::Attend);
        assert_eq!(tags[0].names, vec!["민수"]);
    }

    #[test]
    fn test_fallback_disabled() {
        let extractor = TagExtractor::new(
            EngineConfig::new()
                .with_reference_year(2023)
                .with_implicit_fallback(false),
        )
        .unwrap();
        assert!(extractor.extract("참석합니다", "민수").is_empty());
    }

    #[test]
    fn test_no_tags_no_keyword() {
        assert!(extractor().extract("좋은 하루 되세요.", "민수").is_empty());
        assert!(extractor().extract("", "민수").is_empty());
    }

    #[test]
    fn test_tag_with_empty_names() {
        let tags = extractor().extract("5.2 @참석.", "민수");
        assert_eq!(tags.len(), 1);
        assert!(tags[0].names.is_empty());
    }

    #[test]
    fn test_custom_keywords() {
        let config = EngineConfig::new()
            .with_reference_year(2023)
            .add_cancel_keyword("불참");
        let tags = TagExtractor::new(config)
            .unwrap()
            .extract("6.10 @불참 철수.", "민수");
        assert_eq!(tags[0].action, AttendanceAction::Cancel);
    }

    #[test]
    fn test_empty_keyword_lists_rejected() {
        let mut config = EngineConfig::new();
        config.cancel_keywords.clear();
        assert!(matches!(
            TagExtractor::new(config),
            Err(EngineError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_repeated_calls_are_independent() {
        let extractor = extractor();
        let first = extractor.extract("5.2 @참석 철수.", "민수");
        let second = extractor.extract("5.2 @참석 철수.", "민수");
        assert_eq!(first, second);
    }
}
