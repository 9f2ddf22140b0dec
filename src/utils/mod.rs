pub mod changelog;
pub mod changelog_collector;
pub mod commit_check;
pub mod config;
pub mod git_ops;
pub mod severity;

pub mod testing;
