// testing utilities for building scratch git repositories

pub mod git_utils;

pub use git_utils::TestGitRepo;
