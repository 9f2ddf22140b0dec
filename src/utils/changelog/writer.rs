// writing a merged changelog back to disk

use super::types::ChangelogDocument;
use crate::error::{Error, Result};
use std::fs;
use std::path::Path;

pub const COMMIT_SUMMARY: &str = "Update Changelog";

/// overwrite `path` with the rendered document
pub fn write_changelog<P: AsRef<Path>>(path: P, document: &ChangelogDocument) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, document.render()).map_err(|e| Error::FileWriteError {
        path: path.to_path_buf(),
        source: e,
    })?;
    tracing::debug!(path = %path.display(), versions = document.len(), "wrote changelog");
    Ok(())
}

/// paragraphs of the commit message recording a changelog update
pub fn commit_message<'a>(no_issue_marker: &'a str) -> [&'a str; 2] {
    [COMMIT_SUMMARY, no_issue_marker]
}
