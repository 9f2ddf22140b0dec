use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

/// scratch git repository driven through the git command line, for tests
pub struct TestGitRepo {
    repo_path: PathBuf,
}

impl TestGitRepo {
    /// initialize a new git repository at the given path with `main` checked out
    pub fn init<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Self {
            repo_path: path.as_ref().to_path_buf(),
        };

        repo.git(&["init", "--initial-branch=main"])?;
        repo.configure_identity()?;
        Ok(repo)
    }

    /// clone `source` into `path`, so `origin/*` tracks the source branches
    pub fn clone_from<P: AsRef<Path>>(source: &TestGitRepo, path: P) -> Result<Self> {
        let path = path.as_ref();
        let output = Command::new("git")
            .arg("clone")
            .arg("--quiet")
            .arg(source.path())
            .arg(path)
            .output()
            .map_err(Error::IoError)?;

        if !output.status.success() {
            return Err(Error::GitCommand {
                command: "clone".to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let repo = Self {
            repo_path: path.to_path_buf(),
        };
        repo.configure_identity()?;
        Ok(repo)
    }

    fn configure_identity(&self) -> Result<()> {
        self.git(&["config", "user.name", "Test User"])?;
        self.git(&["config", "user.email", "test@example.com"])?;
        // disable signing for tests
        self.git(&["config", "commit.gpgsign", "false"])?;
        Ok(())
    }

    /// run git in the repository and return stdout
    pub fn git(&self, args: &[&str]) -> Result<String> {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.repo_path)
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

    /// write a file relative to the repository root
    pub fn write_file(&self, file_path: &str, content: &str) -> Result<()> {
        let full_path = self.repo_path.join(file_path);

        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(full_path, content)?;
        Ok(())
    }

    /// add all files and create a commit
    pub fn add_all_and_commit(&self, message: &str) -> Result<()> {
        self.git(&["add", "."])?;
        self.git(&["commit", "-m", message])?;
        Ok(())
    }

    /// write a file and commit the change
    pub fn modify_file_and_commit(
        &self,
        file_path: &str,
        content: &str,
        commit_message: &str,
    ) -> Result<()> {
        self.write_file(file_path, content)?;
        self.add_all_and_commit(commit_message)
    }

    /// create an empty commit with the given message
    pub fn commit_empty(&self, message: &str) -> Result<String> {
        self.git(&["commit", "--allow-empty", "-m", message])?;
        self.head_commit_id()
    }

    /// create a branch at HEAD and check it out
    pub fn checkout_new_branch(&self, branch_name: &str) -> Result<()> {
        self.git(&["checkout", "--quiet", "-b", branch_name])?;
        Ok(())
    }

    /// checkout an existing branch
    pub fn checkout_branch(&self, branch_name: &str) -> Result<()> {
        self.git(&["checkout", "--quiet", branch_name])?;
        Ok(())
    }

    /// get the repository path
    pub fn path(&self) -> &Path {
        &self.repo_path
    }

    /// get current HEAD commit ID
    pub fn head_commit_id(&self) -> Result<String> {
        Ok(self.git(&["rev-parse", "HEAD"])?.trim().to_string())
    }

    /// number of commits reachable from HEAD
    pub fn commit_count(&self) -> Result<usize> {
        let count = self.git(&["rev-list", "--count", "HEAD"])?;
        count
            .trim()
            .parse()
            .map_err(|e| Error::from_git_error(std::io::Error::other(format!("{}", e))))
    }

    /// full message of the HEAD commit
    pub fn head_message(&self) -> Result<String> {
        Ok(self.git(&["log", "-1", "--format=%B"])?.trim_end().to_string())
    }
}
