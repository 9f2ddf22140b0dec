use crate::error::Result;
use crate::utils::changelog::{
    BranchSource, ChangelogDocument, GitBranchSource, ReleaseVersion, SkippedBranch,
    merge_branches, parse_changelog, write_changelog, writer,
};
use crate::utils::config::RelkitConfig;
use crate::utils::git_ops::GitOps;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// knobs for a collect run
#[derive(Debug, Clone)]
pub struct CollectOptions {
    /// remote whose tracking branches are scanned
    pub remote: String,
    /// run `git fetch` on the remote first
    pub fetch: bool,
    /// compute the result without touching the changelog
    pub dry_run: bool,
    /// commit the rewritten changelog
    pub commit: bool,
}

impl Default for CollectOptions {
    fn default() -> Self {
        Self {
            remote: "origin".to_string(),
            fetch: false,
            dry_run: false,
            commit: true,
        }
    }
}

/// what a collect run did
#[derive(Debug, Clone, Serialize)]
pub struct CollectReport {
    pub changelog: PathBuf,
    pub original_versions: usize,
    pub final_versions: usize,
    pub added: Vec<ReleaseVersion>,
    pub merged_branches: Vec<String>,
    pub skipped: Vec<SkippedBranch>,
    pub written: bool,
    pub committed: bool,
}

impl CollectReport {
    pub fn added_count(&self) -> usize {
        self.final_versions.saturating_sub(self.original_versions)
    }

    /// display the outcome for the operator
    pub fn display_summary(&self) {
        println!("changelog: {}", self.changelog.display());
        println!("  branches merged: {}", self.merged_branches.len());

        if !self.skipped.is_empty() {
            println!("  branches skipped: {}", self.skipped.len());
            for skipped in &self.skipped {
                println!("    {}: {}", skipped.branch, skipped.reason);
            }
        }

        if self.added.is_empty() {
            println!("changelog is up to date");
            return;
        }

        let versions: Vec<String> = self.added.iter().map(|v| v.to_string()).collect();
        println!(
            "added {} new version{}: {}",
            self.added_count(),
            if self.added_count() == 1 { "" } else { "s" },
            versions.join(", ")
        );

        if !self.written {
            println!("dry run, changelog not written");
        } else if self.committed {
            println!("changes committed");
        } else {
            println!("changelog written, not committed");
        }
    }
}

/// merges release branch changelogs into the local one
pub struct ChangelogCollector;

impl ChangelogCollector {
    /// collect from the remote-tracking branches of `options.remote`
    pub fn run<P: AsRef<Path>>(
        repo_path: P,
        config: &RelkitConfig,
        options: &CollectOptions,
    ) -> Result<CollectReport> {
        let repo_path = repo_path.as_ref();

        if options.fetch {
            tracing::info!(remote = %options.remote, "fetching");
            GitOps::fetch(repo_path, &options.remote)?;
        }

        let source = GitBranchSource::new(repo_path, &options.remote);
        Self::run_with_source(repo_path, config, options, &source)
    }

    pub fn run_with_source<P: AsRef<Path>>(
        repo_path: P,
        config: &RelkitConfig,
        options: &CollectOptions,
        source: &dyn BranchSource,
    ) -> Result<CollectReport> {
        let repo_path = repo_path.as_ref();
        let changelog_path = repo_path.join(&config.changelog.filename);

        let main: ChangelogDocument = parse_changelog(&changelog_path, &config.changelog)?;
        let outcome = merge_branches(main, source, &config.changelog)?;

        let mut report = CollectReport {
            changelog: changelog_path.clone(),
            original_versions: outcome.original_count,
            final_versions: outcome.document.len(),
            added: outcome.added.clone(),
            merged_branches: outcome.merged_branches.clone(),
            skipped: outcome.skipped.clone(),
            written: false,
            committed: false,
        };

        if !outcome.changed() || options.dry_run {
            return Ok(report);
        }

        write_changelog(&changelog_path, &outcome.document)?;
        report.written = true;

        if options.commit {
            let message = writer::commit_message(&config.commit.no_issue_marker);
            GitOps::commit_file(repo_path, &config.changelog.filename, &message)?;
            report.committed = true;
            tracing::info!(added = report.added_count(), "committed changelog update");
        }

        Ok(report)
    }
}
