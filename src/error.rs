use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("git repository not found in path: {}", path.display())]
    RepositoryNotFound { path: PathBuf },

    #[error("failed to read file: {} ({source})", path.display())]
    FileReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write file: {} ({source})", path.display())]
    FileWriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {origin} ({source})")]
    ConfigParse {
        origin: String,
        source: toml::de::Error,
    },

    #[error("git error: {0}")]
    GitError(Box<dyn std::error::Error + Send + Sync>),

    #[error("git discover error: {0}")]
    GitDiscoverError(#[from] Box<gix::discover::Error>),

    #[error("git command `git {command}` failed: {stderr}")]
    GitCommand { command: String, stderr: String },

    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("invalid version '{input}': {reason}")]
    VersionParse { input: String, reason: String },

    #[error("malformed changelog: {reason}")]
    ChangelogStructure { reason: String },

    #[error("invalid title format '{format}': {reason}")]
    TitleFormat { format: String, reason: String },

    #[error("invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("cannot read changelog of branch '{branch}': {reason}")]
    BranchRead { branch: String, reason: String },
}

impl From<gix::discover::Error> for Error {
    fn from(err: gix::discover::Error) -> Self {
        Error::GitDiscoverError(Box::new(err))
    }
}

// helper function to convert various git errors
impl Error {
    pub fn from_git_error<T: std::error::Error + Send + Sync + 'static>(err: T) -> Self {
        Error::GitError(Box::new(err))
    }

    /// true for errors that mean a branch should be skipped rather than the run aborted
    pub fn is_branch_local(&self) -> bool {
        matches!(
            self,
            Error::BranchRead { .. }
                | Error::ChangelogStructure { .. }
                | Error::VersionParse { .. }
                | Error::ConfigParse { .. }
        )
    }
}
