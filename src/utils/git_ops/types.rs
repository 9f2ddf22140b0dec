use serde::{Deserialize, Serialize};

/// remote-tracking branch, `refs/remotes/<remote>/<branch>`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GitRef {
    pub remote: String,
    pub branch: String,
}

impl GitRef {
    pub fn remote_branch(remote: impl Into<String>, branch: impl Into<String>) -> Self {
        GitRef {
            remote: remote.into(),
            branch: branch.into(),
        }
    }

    /// fully qualified revision usable on the git command line
    pub fn as_rev(&self) -> String {
        format!("refs/remotes/{}/{}", self.remote, self.branch)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitInfo {
    pub id: String,
    pub message: String,
    pub parent_count: usize,
}

impl CommitInfo {
    pub fn is_merge(&self) -> bool {
        self.parent_count > 1
    }
}
