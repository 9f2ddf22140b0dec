use super::changelog::ChangelogConfig;
use super::commit_check::CommitPolicy;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "relkit.toml";

/// main configuration for relkit
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelkitConfig {
    /// changelog-related configuration
    #[serde(default)]
    pub changelog: ChangelogConfig,

    /// commit message policy
    #[serde(default)]
    pub commit: CommitPolicy,
}

impl RelkitConfig {
    /// load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| Error::FileReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::from_toml_str(&contents, &path.display().to_string())
    }

    pub fn from_toml_str(contents: &str, origin: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| Error::ConfigParse {
            origin: origin.to_string(),
            source: e,
        })
    }

    /// find and load configuration file in repository
    ///
    /// looks for `relkit.toml` in the repository root and returns the default
    /// config if there is none. a file that exists but does not parse is an error.
    pub fn load_or_default<P: AsRef<Path>>(repo_path: P) -> Result<Self> {
        match Self::find_config_file(&repo_path) {
            Some(config_path) => {
                tracing::debug!(path = %config_path.display(), "loading configuration");
                Self::load_from_file(&config_path)
            }
            None => Ok(Self::default()),
        }
    }

    /// find configuration file in repository
    pub fn find_config_file<P: AsRef<Path>>(repo_path: P) -> Option<PathBuf> {
        let config_path = repo_path.as_ref().join(CONFIG_FILE_NAME);

        if config_path.is_file() {
            Some(config_path)
        } else {
            None
        }
    }
}
