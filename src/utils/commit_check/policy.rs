// commit message policy configuration

use crate::error::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// rules a commit message has to follow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommitPolicy {
    /// marker for commits that deliberately reference no issue
    pub no_issue_marker: String,

    /// words that link an issue, as in `fixes #123`
    pub keywords: Vec<String>,

    /// patterns that mark a message as not ready when found at its very start
    pub blocking: Vec<String>,
}

impl CommitPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn no_issue_marker(mut self, marker: impl Into<String>) -> Self {
        self.no_issue_marker = marker.into();
        self
    }

    pub fn keywords(mut self, keywords: Vec<String>) -> Self {
        self.keywords = keywords;
        self
    }

    pub fn blocking(mut self, blocking: Vec<String>) -> Self {
        self.blocking = blocking;
        self
    }

    /// case-insensitive regex capturing the issue number after any keyword
    ///
    /// keywords only count at a word boundary, `prefixes #3` links nothing
    pub fn reference_regex(&self) -> Result<Option<Regex>> {
        if self.keywords.is_empty() {
            return Ok(None);
        }

        let alternatives: Vec<String> = self.keywords.iter().map(|k| regex::escape(k)).collect();
        let pattern = format!(r"(?i)\b(?:{})[:\s]+#(\d+)", alternatives.join("|"));

        Regex::new(&pattern)
            .map(Some)
            .map_err(|e| Error::InvalidPattern {
                pattern,
                reason: e.to_string(),
            })
    }

    /// case-sensitive regex matching a blocking pattern at the start of a message
    ///
    /// entries are regex fragments, so `DO\s*NOT\s*MERGE` works as written
    pub fn blocking_regex(&self) -> Result<Option<Regex>> {
        if self.blocking.is_empty() {
            return Ok(None);
        }

        let alternatives: Vec<&str> = self.blocking.iter().map(String::as_str).collect();
        let pattern = format!(r"\A(?:{})", alternatives.join("|"));

        Regex::new(&pattern)
            .map(Some)
            .map_err(|e| Error::InvalidPattern {
                pattern,
                reason: e.to_string(),
            })
    }
}

impl Default for CommitPolicy {
    fn default() -> Self {
        Self {
            no_issue_marker: "[noissue]".to_string(),
            keywords: vec!["fixes".to_string(), "closes".to_string()],
            blocking: ["DRAFT", "WIP", "NOMERGE", r"DO\s*NOT\s*MERGE", "EXPERIMENT"]
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }
}
