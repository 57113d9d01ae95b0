//! Name segment splitting
//!
//! The text after a tag up to the sentence terminator lists the people the
//! tag applies to, separated by commas.

use crate::config::EngineConfig;

/// The raw text following one tag occurrence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameSegment<'a> {
    text: &'a str,
}

impl<'a> NameSegment<'a> {
    /// Cut the segment out of `window`: everything before the first terminator
    pub fn cut(window: &'a str, terminator: char) -> Self {
        let text = window.split(terminator).next().unwrap_or("").trim();
        Self { text }
    }

    /// Split into names, in first-seen order and without duplicates.
    ///
    /// Empty tokens and tokens mentioning an action keyword are dropped. A
    /// segment that mentions the self token gets the bare placeholder appended
    /// if it is not already one of the names.
    pub fn names(&self, config: &EngineConfig) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();

        for token in self.text.split(config.name_separator) {
            let token = token.trim();
            if token.is_empty() || config.mentions_action_keyword(token) {
                continue;
            }
            if !names.iter().any(|n| n == token) {
                names.push(token.to_string());
            }
        }

        let self_token = config.self_token.as_str();
        if !self_token.is_empty()
            && self.text.contains(self_token)
            && !names.iter().any(|n| n == self_token)
        {
            names.push(self_token.to_string());
        }

        names
    }
}
