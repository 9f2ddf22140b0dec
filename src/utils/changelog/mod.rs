// changelog parsing, merging and writing

pub mod config;
pub mod merge;
pub mod parser;
pub mod source;
pub mod types;
pub mod version;
pub mod writer;

pub use config::ChangelogConfig;
pub use merge::{MergeOutcome, SkippedBranch, merge_branches, merge_entries};
pub use parser::{TitlePattern, parse_changelog, split_changelog};
pub use source::{BranchSource, GitBranchSource};
pub use types::{ChangelogDocument, ChangelogEntry};
pub use version::{ReleaseBranch, ReleaseVersion, select_release_branches};
pub use writer::write_changelog;
