// merging release sections collected from release branches

use super::config::ChangelogConfig;
use super::parser::{TitlePattern, split_with_pattern};
use super::source::BranchSource;
use super::types::{ChangelogDocument, ChangelogEntry};
use super::version::{ReleaseVersion, select_release_branches};
use crate::error::Result;
use serde::Serialize;
use std::collections::HashSet;

/// a branch that did not contribute, and why
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedBranch {
    pub branch: String,
    pub reason: String,
}

/// result of folding every release branch into the local changelog
#[derive(Debug, Clone, Serialize)]
pub struct MergeOutcome {
    pub document: ChangelogDocument,
    pub original_count: usize,
    pub added: Vec<ReleaseVersion>,
    pub merged_branches: Vec<String>,
    pub skipped: Vec<SkippedBranch>,
}

impl MergeOutcome {
    pub fn changed(&self) -> bool {
        self.document.len() > self.original_count
    }

    pub fn added_count(&self) -> usize {
        self.document.len().saturating_sub(self.original_count)
    }
}

/// combine two entry lists, newest version first, one entry per version
///
/// the sort is stable and `accumulated` goes first, so on equal versions the
/// entry already accumulated wins over the incoming one.
pub fn merge_entries(
    accumulated: Vec<ChangelogEntry>,
    incoming: Vec<ChangelogEntry>,
) -> Vec<ChangelogEntry> {
    let mut combined = accumulated;
    combined.extend(incoming);
    combined.sort_by(|a, b| b.version.cmp(&a.version));
    combined.dedup_by(|later, kept| later.version == kept.version);
    combined
}

/// fold the changelogs of all `<major>.<minor>` branches into `main`
///
/// branches are visited newest series first. a branch whose changelog cannot
/// be read or parsed is logged and skipped. only the preamble of `main` is kept.
pub fn merge_branches(
    main: ChangelogDocument,
    source: &dyn BranchSource,
    config: &ChangelogConfig,
) -> Result<MergeOutcome> {
    let title = TitlePattern::compile(&config.title_format)?;
    let start_string = config.effective_start_string();
    let branches = select_release_branches(source.branch_names()?);

    tracing::debug!(
        branches = ?branches.iter().map(|b| b.name.as_str()).collect::<Vec<_>>(),
        "selected release branches"
    );

    let original_count = main.len();
    let original_versions: HashSet<ReleaseVersion> = main.versions().cloned().collect();
    let ChangelogDocument { preamble, entries } = main;

    let mut accumulated = entries;
    let mut merged_branches = Vec::new();
    let mut skipped = Vec::new();

    for branch in branches {
        let parsed = source
            .read_changelog(&branch.name)
            .and_then(|text| split_with_pattern(&text, start_string, &title));

        match parsed {
            Ok(branch_doc) => {
                let before = accumulated.len();
                accumulated = merge_entries(accumulated, branch_doc.entries);
                tracing::info!(
                    branch = %branch.name,
                    new_versions = accumulated.len().saturating_sub(before),
                    "merged branch changelog"
                );
                merged_branches.push(branch.name);
            }
            Err(err) if err.is_branch_local() => {
                tracing::warn!(branch = %branch.name, error = %err, "skipping branch");
                skipped.push(SkippedBranch {
                    branch: branch.name,
                    reason: err.to_string(),
                });
            }
            Err(err) => return Err(err),
        }
    }

    let added = accumulated
        .iter()
        .filter(|e| !original_versions.contains(&e.version))
        .map(|e| e.version.clone())
        .collect();

    Ok(MergeOutcome {
        document: ChangelogDocument::new(preamble, accumulated),
        original_count,
        added,
        merged_branches,
        skipped,
    })
}
