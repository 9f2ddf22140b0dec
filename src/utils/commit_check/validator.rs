// commit message validator

use super::policy::CommitPolicy;
use crate::error::{Error, Result};
use crate::utils::changelog::ChangelogConfig;
use crate::utils::config::RelkitConfig;
use crate::utils::git_ops::GitOps;
use crate::utils::severity::{Issue, IssueType};
use serde::Serialize;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

static CHERRY_PICK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*\(cherry picked from commit [0-9a-f]*\)\s*$")
        .expect("cherry-pick regex is valid")
});

/// outcome of checking one commit
#[derive(Debug, Clone, Serialize)]
pub struct CommitCheck {
    pub commit: String,
    pub summary: String,
    pub referenced_issues: Vec<u64>,
    pub exempt: bool,
    pub issues: Vec<Issue>,
}

impl CommitCheck {
    pub fn passed(&self) -> bool {
        !self.issues.iter().any(|i| i.is_error())
    }

    pub fn display_summary(&self) {
        let short = self.commit.get(..12).unwrap_or(&self.commit);
        println!("commit {} {}", short, self.summary);

        if self.exempt {
            println!("  exempt from message policy");
            return;
        }

        if !self.referenced_issues.is_empty() {
            let refs: Vec<String> = self.referenced_issues.iter().map(|n| format!("#{}", n)).collect();
            println!("  references: {}", refs.join(", "));
        }

        for issue in &self.issues {
            println!("  {}", issue);
        }

        if self.passed() {
            println!("commit message ok");
        } else {
            println!("commit message rejected");
        }
    }
}

/// issue numbers referenced by the message, in order of appearance
pub fn referenced_issues(message: &str, policy: &CommitPolicy) -> Result<Vec<u64>> {
    let Some(regex) = policy.reference_regex()? else {
        return Ok(Vec::new());
    };

    let mut numbers: Vec<u64> = Vec::new();
    for caps in regex.captures_iter(message) {
        if let Ok(number) = caps[1].parse::<u64>()
            && !numbers.contains(&number)
        {
            numbers.push(number);
        }
    }
    Ok(numbers)
}

/// fragment file names in `directory` belonging to `issue`
///
/// fragments are named `<issue>.<type>` or `<issue>.<type>.<counter>`
pub fn find_fragments<P: AsRef<Path>>(directory: P, issue: u64) -> Result<Vec<String>> {
    let directory = directory.as_ref();
    if !directory.is_dir() {
        return Ok(Vec::new());
    }

    let prefix = format!("{}.", issue);
    let mut names = Vec::new();
    let entries = fs::read_dir(directory).map_err(|e| Error::FileReadError {
        path: directory.to_path_buf(),
        source: e,
    })?;

    for entry in entries {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str()
            && name.starts_with(&prefix)
        {
            names.push(name.to_string());
        }
    }

    names.sort();
    Ok(names)
}

fn fragment_type(name: &str) -> Option<&str> {
    name.split('.').nth(1).filter(|t| !t.is_empty())
}

/// merges and `git revert` commits carry no message of their own
fn is_exempt(message: &str, is_merge: bool) -> bool {
    is_merge || message.starts_with("Revert \"")
}

/// `git cherry-pick -x` trailer; backports reuse the fragments of the original commit
fn is_cherry_pick(message: &str) -> bool {
    CHERRY_PICK_RE.is_match(message)
}

/// check a commit message against the policy
///
/// `fragments_dir` is where change fragments for referenced issues are looked up
pub fn validate_message<P: AsRef<Path>>(
    message: &str,
    fragments_dir: P,
    changelog: &ChangelogConfig,
    policy: &CommitPolicy,
) -> Result<Vec<Issue>> {
    let fragments_dir = fragments_dir.as_ref();
    let mut issues = Vec::new();

    if let Some(blocking) = policy.blocking_regex()?
        && let Some(found) = blocking.find(message)
    {
        issues.push(Issue::error(
            IssueType::NotReady,
            format!("message starts with '{}', not ready to merge", found.as_str()),
        ));
        return Ok(issues);
    }

    let references = referenced_issues(message, policy)?;
    let has_marker = !policy.no_issue_marker.is_empty() && message.contains(&policy.no_issue_marker);

    if references.is_empty() {
        if !has_marker {
            issues.push(Issue::error(
                IssueType::MissingIssueReference,
                format!(
                    "no issue referenced (use '{} #<number>') and no '{}' marker",
                    policy.keywords.first().map(String::as_str).unwrap_or("fixes"),
                    policy.no_issue_marker
                ),
            ));
        }
        return Ok(issues);
    }

    if has_marker {
        issues.push(Issue::warning(
            IssueType::RedundantNoIssue,
            format!(
                "'{}' is set but the message references issues",
                policy.no_issue_marker
            ),
        ));
    }

    if is_cherry_pick(message) {
        tracing::debug!("cherry-picked commit, change fragments not required");
        return Ok(issues);
    }

    for issue in references {
        let fragments = find_fragments(fragments_dir, issue)?;
        if fragments.is_empty() {
            issues.push(Issue::error(
                IssueType::MissingChangeFragment,
                format!(
                    "issue #{} has no change fragment in {}/",
                    issue, changelog.directory
                ),
            ));
            continue;
        }

        for name in fragments
            .iter()
            .filter(|name| !fragment_type(name).is_some_and(|t| changelog.is_known_type(t)))
        {
            issues.push(Issue::error(
                IssueType::UnknownFragmentType,
                format!(
                    "fragment {}/{} for issue #{} has no recognised type (allowed: {})",
                    changelog.directory,
                    name,
                    issue,
                    changelog.types.join(", ")
                ),
            ));
        }
    }

    Ok(issues)
}

/// validates commit messages of a repository
pub struct CommitValidator;

impl CommitValidator {
    /// check the commit `rev` against the configured policy
    pub fn check_commit<P: AsRef<Path>>(
        repo_path: P,
        rev: &str,
        config: &RelkitConfig,
    ) -> Result<CommitCheck> {
        let repo_path = repo_path.as_ref();
        let info = GitOps::commit_info(repo_path, rev)?;
        let summary = info.message.lines().next().unwrap_or_default().to_string();
        let referenced = referenced_issues(&info.message, &config.commit)?;

        if is_exempt(&info.message, info.is_merge()) {
            tracing::debug!(commit = %info.id, "commit exempt from message policy");
            return Ok(CommitCheck {
                commit: info.id,
                summary,
                referenced_issues: referenced,
                exempt: true,
                issues: Vec::new(),
            });
        }

        let fragments_dir = repo_path.join(&config.changelog.directory);
        let issues = validate_message(&info.message, &fragments_dir, &config.changelog, &config.commit)?;

        Ok(CommitCheck {
            commit: info.id,
            summary,
            referenced_issues: referenced,
            exempt: false,
            issues,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fragments(names: &[&str]) -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        for name in names {
            fs::write(temp_dir.path().join(name), "Something changed.\n").unwrap();
        }
        temp_dir
    }

    fn issue_types(issues: &[Issue]) -> Vec<IssueType> {
        issues.iter().map(|i| i.issue_type).collect()
    }

    #[test]
    fn test_referenced_issues() {
        let policy = CommitPolicy::default();
        let message = "Add sync\n\nfixes #12\nCloses: #7, also fixes #12\nrefs #99";
        assert_eq!(referenced_issues(message, &policy).unwrap(), vec![12, 7]);
        assert!(referenced_issues("prefixes #3", &policy).unwrap().is_empty());
    }

    #[test]
    fn test_no_keywords_means_no_references() {
        let policy = CommitPolicy::default().keywords(Vec::new());
        assert!(referenced_issues("fixes #1", &policy).unwrap().is_empty());
    }

    #[test]
    fn test_noissue_marker_passes() {
        let dir = fragments(&[]);
        let issues = validate_message(
            "Bump CI\n\n[noissue]",
            dir.path(),
            &ChangelogConfig::default(),
            &CommitPolicy::default(),
        )
        .unwrap();
        assert!(issues.is_empty());
    }

    #[test]
    fn test_missing_reference_fails() {
        let dir = fragments(&[]);
        let issues = validate_message(
            "Bump CI",
            dir.path(),
            &ChangelogConfig::default(),
            &CommitPolicy::default(),
        )
        .unwrap();
        assert_eq!(issue_types(&issues), vec![IssueType::MissingIssueReference]);
        assert!(issues[0].is_error());
    }

    #[test]
    fn test_reference_with_fragment_passes() {
        let dir = fragments(&["42.bugfix", "43.feature.1"]);
        let issues = validate_message(
            "Fix listing\n\nfixes #42\ncloses #43",
            dir.path(),
            &ChangelogConfig::default(),
            &CommitPolicy::default(),
        )
        .unwrap();
        assert!(issues.is_empty());
    }

    #[test]
    fn test_reference_without_fragment_fails() {
        let dir = fragments(&["420.bugfix"]);
        let issues = validate_message(
            "Fix listing\n\nfixes #42",
            dir.path(),
            &ChangelogConfig::default(),
            &CommitPolicy::default(),
        )
        .unwrap();
        assert_eq!(issue_types(&issues), vec![IssueType::MissingChangeFragment]);
    }

    #[test]
    fn test_unknown_fragment_type_fails() {
        let dir = fragments(&["42.bugfixx"]);
        let issues = validate_message(
            "fixes #42",
            dir.path(),
            &ChangelogConfig::default(),
            &CommitPolicy::default(),
        )
        .unwrap();
        assert_eq!(issue_types(&issues), vec![IssueType::UnknownFragmentType]);
        assert!(issues[0].message.contains("42.bugfixx"));
    }

    #[test]
    fn test_every_fragment_needs_a_known_type() {
        let dir = fragments(&["42.bugfix", "42.bogus"]);
        let issues = validate_message(
            "fixes #42",
            dir.path(),
            &ChangelogConfig::default(),
            &CommitPolicy::default(),
        )
        .unwrap();
        assert_eq!(issue_types(&issues), vec![IssueType::UnknownFragmentType]);
        assert!(issues[0].message.contains("42.bogus"));
        assert!(!issues[0].message.contains("42.bugfix"));
    }

    #[test]
    fn test_blocking_prefix_fails() {
        let dir = fragments(&["12.bugfix"]);
        let issues = validate_message(
            "WIP: add sync\n\nfixes #12",
            dir.path(),
            &ChangelogConfig::default(),
            &CommitPolicy::default(),
        )
        .unwrap();
        assert_eq!(issue_types(&issues), vec![IssueType::NotReady]);
        assert!(issues[0].is_error());
        assert!(issues[0].message.contains("WIP"));

        // only the start of the message counts
        let issues = validate_message(
            "Add sync\n\nfixes #12, the WIP flag is gone",
            dir.path(),
            &ChangelogConfig::default(),
            &CommitPolicy::default(),
        )
        .unwrap();
        assert!(issues.is_empty());

        let relaxed = CommitPolicy::default().blocking(Vec::new());
        let issues = validate_message(
            "WIP: add sync\n\nfixes #12",
            dir.path(),
            &ChangelogConfig::default(),
            &relaxed,
        )
        .unwrap();
        assert!(issues.is_empty());
    }

    #[test]
    fn test_cherry_pick_skips_fragment_check() {
        let dir = fragments(&[]);
        let issues = validate_message(
            "Backport fix\n\nfixes #13\n\n(cherry picked from commit 0123abcd)",
            dir.path(),
            &ChangelogConfig::default(),
            &CommitPolicy::default(),
        )
        .unwrap();
        assert!(issues.is_empty());

        // the trailer must stand on its own line
        let issues = validate_message(
            "Backport fix\n\nfixes #13 (cherry picked from commit 0123abcd)",
            dir.path(),
            &ChangelogConfig::default(),
            &CommitPolicy::default(),
        )
        .unwrap();
        assert_eq!(issue_types(&issues), vec![IssueType::MissingChangeFragment]);

        // a reference is still required
        let issues = validate_message(
            "Backport fix\n\n(cherry picked from commit 0123abcd)",
            dir.path(),
            &ChangelogConfig::default(),
            &CommitPolicy::default(),
        )
        .unwrap();
        assert_eq!(issue_types(&issues), vec![IssueType::MissingIssueReference]);
    }

    #[test]
    fn test_redundant_marker_warns() {
        let dir = fragments(&["5.doc"]);
        let issues = validate_message(
            "fixes #5\n[noissue]",
            dir.path(),
            &ChangelogConfig::default(),
            &CommitPolicy::default(),
        )
        .unwrap();
        assert_eq!(issue_types(&issues), vec![IssueType::RedundantNoIssue]);
        assert!(issues[0].is_warning());
    }

    #[test]
    fn test_missing_fragments_directory() {
        let temp_dir = TempDir::new().unwrap();
        let issues = validate_message(
            "fixes #5",
            temp_dir.path().join("CHANGES"),
            &ChangelogConfig::default(),
            &CommitPolicy::default(),
        )
        .unwrap();
        assert_eq!(issue_types(&issues), vec![IssueType::MissingChangeFragment]);
    }

    #[test]
    fn test_exemptions() {
        assert!(is_exempt("anything", true));
        assert!(is_exempt("Revert \"Add sync\"\n\nThis reverts commit abc.", false));
        assert!(!is_exempt("Add sync", false));
        assert!(is_cherry_pick("x\n\n  (cherry picked from commit abc123)  \n"));
        assert!(!is_cherry_pick("x\n\n(cherry picked from commit XYZ)"));
    }
}
