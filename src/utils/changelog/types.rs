// changelog data structures

use super::version::ReleaseVersion;
use serde::Serialize;

/// one release section of a changelog, header and body kept verbatim
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangelogEntry {
    pub version: ReleaseVersion,
    pub text: String,
}

impl ChangelogEntry {
    pub fn new(version: ReleaseVersion, text: impl Into<String>) -> Self {
        Self {
            version,
            text: text.into(),
        }
    }

    /// the header line of the section
    pub fn header(&self) -> &str {
        self.text.lines().next().unwrap_or_default()
    }
}

/// a changelog split into its preamble and release sections
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangelogDocument {
    /// everything up to and including the start marker
    pub preamble: String,
    /// release sections in document order
    pub entries: Vec<ChangelogEntry>,
}

impl ChangelogDocument {
    pub fn new(preamble: impl Into<String>, entries: Vec<ChangelogEntry>) -> Self {
        Self {
            preamble: preamble.into(),
            entries,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn versions(&self) -> impl Iterator<Item = &ReleaseVersion> {
        self.entries.iter().map(|e| &e.version)
    }

    /// join preamble and sections back into the on-disk text
    pub fn render(&self) -> String {
        let capacity =
            self.preamble.len() + self.entries.iter().map(|e| e.text.len()).sum::<usize>();
        let mut out = String::with_capacity(capacity);
        out.push_str(&self.preamble);
        for entry in &self.entries {
            out.push_str(&entry.text);
        }
        out
    }
}
