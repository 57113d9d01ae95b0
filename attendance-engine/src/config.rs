//! Engine configuration types
//!
//! This module defines the tag syntax the engine recognizes. Defaults match the
//! forum convention `5.2 @참석 철수, 영희.`; every keyword can be overridden
//! from the application layer.

use serde::{Deserialize, Serialize};

/// Configuration for tag extraction and date resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Keywords following `@` that mark attendance
    #[serde(default = "default_attend_keywords")]
    pub attend_keywords: Vec<String>,

    /// Keywords following `@` that mark a cancellation
    #[serde(default = "default_cancel_keywords")]
    pub cancel_keywords: Vec<String>,

    /// Placeholder name meaning "the author of this comment"
    #[serde(default = "default_self_token")]
    pub self_token: String,

    /// Bare keywords that imply the author attends (fallback heuristic)
    #[serde(default = "default_implicit_keywords")]
    pub implicit_keywords: Vec<String>,

    /// Whether the bare-keyword fallback is applied at all
    #[serde(default = "default_true")]
    pub implicit_fallback: bool,

    /// Separator between names in a name segment
    #[serde(default = "default_name_separator")]
    pub name_separator: char,

    /// Character ending a name segment
    #[serde(default = "default_terminator")]
    pub terminator: char,

    /// Year applied to month/day tokens (None = current local year)
    #[serde(default)]
    pub reference_year: Option<i32>,
}

fn default_attend_keywords() -> Vec<String> {
    vec!["참석".to_string()]
}

fn default_cancel_keywords() -> Vec<String> {
    vec!["취소".to_string()]
}

fn default_self_token() -> String {
    "본인".to_string()
}

fn default_implicit_keywords() -> Vec<String> {
    vec!["참석".to_string(), "참가".to_string()]
}

fn default_true() -> bool {
    true
}

fn default_name_separator() -> char {
    ','
}

fn default_terminator() -> char {
    '.'
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            attend_keywords: default_attend_keywords(),
            cancel_keywords: default_cancel_keywords(),
            self_token: default_self_token(),
            implicit_keywords: default_implicit_keywords(),
            implicit_fallback: true,
            name_separator: default_name_separator(),
            terminator: default_terminator(),
            reference_year: None,
        }
    }
}

impl EngineConfig {
    /// Create a new configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: pin the year used for month/day tokens
    pub fn with_reference_year(mut self, year: i32) -> Self {
        self.reference_year = Some(year);
        self
    }

    /// Builder method: add an attend keyword
    pub fn add_attend_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.attend_keywords.push(keyword.into());
        self
    }

    /// Builder method: add a cancel keyword
    pub fn add_cancel_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.cancel_keywords.push(keyword.into());
        self
    }

    /// Builder method: set the self-reference placeholder
    pub fn with_self_token(mut self, token: impl Into<String>) -> Self {
        self.self_token = token.into();
        self
    }

    /// Builder method: replace the fallback keywords
    pub fn with_implicit_keywords(mut self, keywords: Vec<String>) -> Self {
        self.implicit_keywords = keywords;
        self
    }

    /// Builder method: enable or disable the bare-keyword fallback
    pub fn with_implicit_fallback(mut self, enabled: bool) -> Self {
        self.implicit_fallback = enabled;
        self
    }

    /// Check whether a name token mentions any action keyword
    pub fn mentions_action_keyword(&self, token: &str) -> bool {
        self.attend_keywords
            .iter()
            .chain(self.cancel_keywords.iter())
            .any(|k| !k.is_empty() && token.contains(k.as_str()))
    }
}
