pub mod error;
pub mod utils;

pub use error::*;
pub use utils::changelog::{
    BranchSource, ChangelogConfig, ChangelogDocument, ChangelogEntry, GitBranchSource,
    MergeOutcome, ReleaseBranch, ReleaseVersion, SkippedBranch, TitlePattern, merge_branches,
    merge_entries, parse_changelog, select_release_branches, split_changelog, write_changelog,
};
pub use utils::changelog_collector::{ChangelogCollector, CollectOptions, CollectReport};
pub use utils::commit_check::{CommitCheck, CommitPolicy, CommitValidator};
pub use utils::config::RelkitConfig;
pub use utils::git_ops::{CommitInfo, GitOps, GitRef};
pub use utils::severity::{Issue, IssueSeverity, IssueType};
