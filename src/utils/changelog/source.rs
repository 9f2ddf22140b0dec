// where branch changelogs come from

use super::config::ChangelogConfig;
use crate::error::{Error, Result};
use crate::utils::config::CONFIG_FILE_NAME;
use crate::utils::git_ops::{GitOps, GitRef};
use std::path::{Path, PathBuf};

/// access to the changelogs committed on other branches
pub trait BranchSource {
    /// names of all branches that could be collected from
    fn branch_names(&self) -> Result<Vec<String>>;

    /// raw changelog text at the tip of `branch`, newline terminated
    ///
    /// errors are reported as [`Error::BranchRead`] and mean the branch is skipped
    fn read_changelog(&self, branch: &str) -> Result<String>;
}

/// reads changelogs from the remote-tracking branches of a git remote
pub struct GitBranchSource {
    repo_path: PathBuf,
    remote: String,
}

impl GitBranchSource {
    pub fn new(repo_path: impl AsRef<Path>, remote: impl Into<String>) -> Self {
        Self {
            repo_path: repo_path.as_ref().to_path_buf(),
            remote: remote.into(),
        }
    }

    /// the changelog settings committed on the branch itself
    ///
    /// branches without a config file use the defaults, a config that exists
    /// but cannot be read or parsed fails the branch
    fn branch_config(&self, branch: &str, git_ref: &GitRef) -> Result<ChangelogConfig> {
        if !GitOps::file_exists(&self.repo_path, git_ref, CONFIG_FILE_NAME)? {
            tracing::debug!(git_ref = %git_ref.as_rev(), "no config on branch, using defaults");
            return Ok(ChangelogConfig::default());
        }

        let contents = GitOps::show_file(&self.repo_path, git_ref, CONFIG_FILE_NAME).map_err(|e| {
            Error::BranchRead {
                branch: branch.to_string(),
                reason: format!("{}: {}", CONFIG_FILE_NAME, e),
            }
        })?;
        ChangelogConfig::from_toml_str(&contents, &format!("{}:{}", git_ref.as_rev(), CONFIG_FILE_NAME))
    }
}

impl BranchSource for GitBranchSource {
    fn branch_names(&self) -> Result<Vec<String>> {
        GitOps::list_remote_branches(&self.repo_path, &self.remote)
    }

    fn read_changelog(&self, branch: &str) -> Result<String> {
        let git_ref = GitRef::remote_branch(&self.remote, branch);
        let config = self.branch_config(branch, &git_ref)?;

        let content = GitOps::show_file(&self.repo_path, &git_ref, &config.filename).map_err(|e| {
            Error::BranchRead {
                branch: branch.to_string(),
                reason: format!("{}: {}", config.filename, e),
            }
        })?;

        Ok(ensure_trailing_newline(content))
    }
}

pub(crate) fn ensure_trailing_newline(mut content: String) -> String {
    if !content.ends_with('\n') {
        content.push('\n');
    }
    content
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::testing::TestGitRepo;
    use tempfile::TempDir;

    const CHANGES: &str = "# Changelog\n\n<!-- towncrier release notes start -->\n\n## 1.0.0 (2024-01-01)\n";

    /// clone of an origin whose branch `1.0` carries `files`
    fn clone_with_branch(origin_dir: &TempDir, clone_dir: &TempDir, files: &[(&str, &str)]) -> PathBuf {
        let origin = TestGitRepo::init(origin_dir.path()).unwrap();
        origin.modify_file_and_commit("CHANGES.md", CHANGES, "initial").unwrap();
        origin.checkout_new_branch("1.0").unwrap();
        for (path, content) in files {
            origin.write_file(path, content).unwrap();
        }
        origin.add_all_and_commit("branch files").unwrap();
        origin.checkout_branch("main").unwrap();

        let clone_path = clone_dir.path().join("clone");
        TestGitRepo::clone_from(&origin, &clone_path).unwrap();
        clone_path
    }

    #[test]
    fn test_read_changelog_without_branch_config() {
        let (origin_dir, clone_dir) = (TempDir::new().unwrap(), TempDir::new().unwrap());
        let clone_path = clone_with_branch(&origin_dir, &clone_dir, &[("notes.txt", "x")]);
        let source = GitBranchSource::new(&clone_path, "origin");

        assert_eq!(source.read_changelog("1.0").unwrap(), CHANGES);
        assert_eq!(source.branch_names().unwrap(), vec!["1.0".to_string(), "main".to_string()]);
    }

    #[test]
    fn test_read_changelog_follows_branch_config() {
        let (origin_dir, clone_dir) = (TempDir::new().unwrap(), TempDir::new().unwrap());
        let clone_path = clone_with_branch(
            &origin_dir,
            &clone_dir,
            &[
                ("relkit.toml", "[changelog]\nfilename = \"docs/NEWS.md\"\n"),
                ("docs/NEWS.md", "news"),
            ],
        );
        let source = GitBranchSource::new(&clone_path, "origin");

        assert_eq!(source.read_changelog("1.0").unwrap(), "news\n");
    }

    #[test]
    fn test_unreadable_branch_config_fails_the_branch() {
        let (origin_dir, clone_dir) = (TempDir::new().unwrap(), TempDir::new().unwrap());
        // present but not a config file, so the branch must not fall back to defaults
        let clone_path = clone_with_branch(
            &origin_dir,
            &clone_dir,
            &[("relkit.toml/readme", "not a config")],
        );
        let source = GitBranchSource::new(&clone_path, "origin");

        let err = source.read_changelog("1.0").unwrap_err();
        assert!(err.is_branch_local());

        let (origin_dir, clone_dir) = (TempDir::new().unwrap(), TempDir::new().unwrap());
        let clone_path = clone_with_branch(&origin_dir, &clone_dir, &[("relkit.toml", "[changelog")]);
        let source = GitBranchSource::new(&clone_path, "origin");

        assert!(matches!(source.read_changelog("1.0"), Err(Error::ConfigParse { .. })));
    }

    #[test]
    fn test_unknown_branch_is_a_read_error() {
        let (origin_dir, clone_dir) = (TempDir::new().unwrap(), TempDir::new().unwrap());
        let clone_path = clone_with_branch(&origin_dir, &clone_dir, &[("notes.txt", "x")]);
        let source = GitBranchSource::new(&clone_path, "origin");

        assert!(matches!(source.read_changelog("7.7"), Err(Error::BranchRead { .. })));
    }

    #[test]
    fn test_ensure_trailing_newline() {
        assert_eq!(ensure_trailing_newline("a".to_string()), "a\n");
        assert_eq!(ensure_trailing_newline("a\n".to_string()), "a\n");
        assert_eq!(ensure_trailing_newline(String::new()), "\n");
    }
}
