use super::types::{CommitInfo, GitRef};
use crate::error::{Error, Result};
use gix::bstr::ByteSlice;
use std::path::{Path, PathBuf};
use std::process::Command;

pub struct GitOps;

impl GitOps {
    /// detect root of the repository (path as a result)
    pub fn detect_repository_root<P: AsRef<Path>>(path: P) -> Result<PathBuf> {
        let path = path.as_ref();

        // if it's a file, use its parent directory for discovery
        let check_path = if path.is_file() {
            match path.parent() {
                Some(parent) => parent,
                None => {
                    return Err(Error::RepositoryNotFound {
                        path: path.to_path_buf(),
                    });
                }
            }
        } else {
            path
        };

        let repo = gix::discover(check_path)?;

        // bare repositories have no work dir, report the git dir instead
        let root_path = if let Some(work_dir) = repo.work_dir() {
            work_dir.to_path_buf()
        } else {
            repo.git_dir().to_path_buf()
        };

        Ok(root_path)
    }

    /// run a git command in the repository and return its stdout
    pub fn run_git<P: AsRef<Path>>(repo_path: P, args: &[&str]) -> Result<String> {
        let repo_path = repo_path.as_ref();
        tracing::debug!(repo = %repo_path.display(), args = ?args, "running git");

        let output = Command::new("git")
            .arg("-C")
            .arg(repo_path)
            .args(args)
            .output()
            .map_err(Error::IoError)?;

        if !output.status.success() {
            return Err(Error::GitCommand {
                command: args.join(" "),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// update remote-tracking branches of `remote`
    pub fn fetch<P: AsRef<Path>>(repo_path: P, remote: &str) -> Result<()> {
        Self::run_git(repo_path, &["fetch", "--prune", remote])?;
        Ok(())
    }

    /// list branch names tracked for `remote` (`refs/remotes/<remote>/*`)
    pub fn list_remote_branches<P: AsRef<Path>>(repo_path: P, remote: &str) -> Result<Vec<String>> {
        let repo = gix::discover(repo_path.as_ref())?;
        let prefix = format!("refs/remotes/{}/", remote);

        let mut branches = Vec::new();
        let references = repo.references().map_err(Error::from_git_error)?;

        for reference_result in references.all().map_err(Error::from_git_error)? {
            if let Ok(reference) = reference_result
                && let Ok(name) = reference.name().as_bstr().to_str()
                && let Some(branch_name) = name.strip_prefix(prefix.as_str())
                && branch_name != "HEAD"
            {
                branches.push(branch_name.to_string());
            }
        }

        branches.sort();
        Ok(branches)
    }

    /// content of `file` as committed at `git_ref`
    pub fn show_file<P: AsRef<Path>>(repo_path: P, git_ref: &GitRef, file: &str) -> Result<String> {
        let object = format!("{}:{}", git_ref.as_rev(), file);
        Self::run_git(repo_path, &["show", &object])
    }

    /// whether `file` exists at `git_ref`
    ///
    /// a missing path or an unknown ref is `false`, failing to run git is an error
    pub fn file_exists<P: AsRef<Path>>(repo_path: P, git_ref: &GitRef, file: &str) -> Result<bool> {
        let object = format!("{}:{}", git_ref.as_rev(), file);
        match Self::run_git(repo_path, &["cat-file", "-e", &object]) {
            Ok(_) => Ok(true),
            Err(Error::GitCommand { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// commit the current content of a single tracked file
    ///
    /// the message is given as separate paragraphs, like repeated `-m` options
    pub fn commit_file<P: AsRef<Path>>(repo_path: P, file: &str, paragraphs: &[&str]) -> Result<()> {
        let mut args = vec!["commit"];
        for paragraph in paragraphs {
            args.push("-m");
            args.push(*paragraph);
        }
        args.push("--");
        args.push(file);

        Self::run_git(repo_path, &args)?;
        Ok(())
    }

    /// message and parent count of a commit
    pub fn commit_info<P: AsRef<Path>>(repo_path: P, rev: &str) -> Result<CommitInfo> {
        let repo_path = repo_path.as_ref();
        let id = Self::run_git(repo_path, &["rev-parse", "--verify", &format!("{}^{{commit}}", rev)])?
            .trim()
            .to_string();
        let message = Self::run_git(repo_path, &["log", "-1", "--format=%B", &id])?;
        let parents = Self::run_git(repo_path, &["log", "-1", "--format=%P", &id])?
            .split_whitespace()
            .count();

        Ok(CommitInfo {
            id,
            message: message.trim_end().to_string(),
            parent_count: parents,
        })
    }
}
