// changelog configuration

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const MARKDOWN_START_STRING: &str = "<!-- towncrier release notes start -->\n";
pub const RST_START_STRING: &str = ".. towncrier release notes start\n";

/// configuration for changelog collection and fragment checks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChangelogConfig {
    /// name of the changelog file relative to the repository root (default: "CHANGES.md")
    pub filename: String,

    /// literal marking the end of the free-form preamble
    ///
    /// when unset it is picked from the changelog file extension
    pub start_string: Option<String>,

    /// header of a release section, with `{name}`, `{version}` and `{project_date}`
    pub title_format: String,

    /// directory holding change fragments (e.g. `CHANGES/123.bugfix`)
    pub directory: String,

    /// recognised fragment types
    pub types: Vec<String>,
}

impl ChangelogConfig {
    /// create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filename(mut self, name: impl Into<String>) -> Self {
        self.filename = name.into();
        self
    }

    pub fn start_string(mut self, marker: impl Into<String>) -> Self {
        self.start_string = Some(marker.into());
        self
    }

    pub fn title_format(mut self, format: impl Into<String>) -> Self {
        self.title_format = format.into();
        self
    }

    pub fn directory(mut self, directory: impl Into<String>) -> Self {
        self.directory = directory.into();
        self
    }

    pub fn types(mut self, types: Vec<String>) -> Self {
        self.types = types;
        self
    }

    /// start marker in effect, falling back to the one matching the file format
    pub fn effective_start_string(&self) -> &str {
        if let Some(marker) = &self.start_string {
            return marker;
        }

        let is_rst = Path::new(&self.filename)
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("rst"));
        if is_rst {
            RST_START_STRING
        } else {
            MARKDOWN_START_STRING
        }
    }

    /// check if a fragment type is recognised
    pub fn is_known_type(&self, change_type: &str) -> bool {
        self.types.iter().any(|t| t == change_type)
    }

    /// parse the `[changelog]` table out of a `relkit.toml` document
    ///
    /// used for the copies of the config committed on other branches, so a
    /// document without the table yields the defaults.
    pub fn from_toml_str(contents: &str, origin: &str) -> Result<Self> {
        #[derive(Deserialize)]
        struct Wrapper {
            #[serde(default)]
            changelog: ChangelogConfig,
        }

        let wrapper: Wrapper = toml::from_str(contents).map_err(|e| Error::ConfigParse {
            origin: origin.to_string(),
            source: e,
        })?;
        Ok(wrapper.changelog)
    }
}

impl Default for ChangelogConfig {
    fn default() -> Self {
        Self {
            filename: "CHANGES.md".to_string(),
            start_string: None,
            title_format: "## {version} ({project_date})".to_string(),
            directory: "CHANGES".to_string(),
            types: vec![
                "feature".to_string(),
                "bugfix".to_string(),
                "doc".to_string(),
                "removal".to_string(),
                "deprecation".to_string(),
                "misc".to_string(),
            ],
        }
    }
}
