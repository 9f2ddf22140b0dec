use serde::{Deserialize, Serialize};
use std::fmt;

/// severity level for issues found in a commit message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    /// error-level issue that should cause validation to fail
    Error,
    /// warning-level issue that is informational only
    Warning,
}

impl fmt::Display for IssueSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueSeverity::Error => write!(f, "ERROR"),
            IssueSeverity::Warning => write!(f, "WARN"),
        }
    }
}

/// type of policy violation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueType {
    /// the message starts with a blocking marker such as `WIP`
    NotReady,
    /// neither an issue reference nor the no-issue marker
    MissingIssueReference,
    /// a referenced issue has no change fragment
    MissingChangeFragment,
    /// a fragment exists for the issue but its type is not recognised
    UnknownFragmentType,
    /// the no-issue marker is present next to issue references
    RedundantNoIssue,
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueType::NotReady => write!(f, "not_ready"),
            IssueType::MissingIssueReference => write!(f, "missing_issue_reference"),
            IssueType::MissingChangeFragment => write!(f, "missing_change_fragment"),
            IssueType::UnknownFragmentType => write!(f, "unknown_fragment_type"),
            IssueType::RedundantNoIssue => write!(f, "redundant_no_issue"),
        }
    }
}

/// structured issue with severity, type, and message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub severity: IssueSeverity,
    pub issue_type: IssueType,
    pub message: String,
}

impl Issue {
    pub fn new(severity: IssueSeverity, issue_type: IssueType, message: String) -> Self {
        Self {
            severity,
            issue_type,
            message,
        }
    }

    pub fn error(issue_type: IssueType, message: impl Into<String>) -> Self {
        Self::new(IssueSeverity::Error, issue_type, message.into())
    }

    pub fn warning(issue_type: IssueType, message: impl Into<String>) -> Self {
        Self::new(IssueSeverity::Warning, issue_type, message.into())
    }

    /// check if this is an error-level issue
    pub fn is_error(&self) -> bool {
        self.severity == IssueSeverity::Error
    }

    /// check if this is a warning-level issue
    pub fn is_warning(&self) -> bool {
        self.severity == IssueSeverity::Warning
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.severity, self.message)
    }
}
