pub mod repository;
pub mod types;

pub use repository::GitOps;
pub use types::*;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::utils::testing::TestGitRepo;
    use std::fs;
    use tempfile::TempDir;

    fn repo_with_commit(dir: &std::path::Path) -> TestGitRepo {
        let repo = TestGitRepo::init(dir).unwrap();
        repo.modify_file_and_commit("CHANGES.md", "# Changelog\n", "initial")
            .unwrap();
        repo
    }

    #[test]
    fn test_detect_repository_root() {
        let temp_dir = TempDir::new().unwrap();
        repo_with_commit(temp_dir.path());

        let sub_dir = temp_dir.path().join("subdir");
        fs::create_dir(&sub_dir).unwrap();

        let root = GitOps::detect_repository_root(temp_dir.path()).unwrap();
        let from_sub = GitOps::detect_repository_root(&sub_dir).unwrap();
        let from_file = GitOps::detect_repository_root(temp_dir.path().join("CHANGES.md")).unwrap();

        assert_eq!(root, from_sub);
        assert_eq!(root, from_file);
    }

    #[test]
    fn test_detect_repository_root_error_non_repo() {
        let temp_dir = TempDir::new().unwrap();
        assert!(GitOps::detect_repository_root(temp_dir.path()).is_err());
    }

    #[test]
    fn test_show_file_at_remote_branch() {
        let origin_dir = TempDir::new().unwrap();
        let origin = repo_with_commit(origin_dir.path());
        origin.checkout_new_branch("2.0").unwrap();
        origin
            .modify_file_and_commit("CHANGES.md", "# Changelog 2.0\n", "on 2.0")
            .unwrap();
        origin.checkout_branch("main").unwrap();

        let clone_dir = TempDir::new().unwrap();
        let clone_path = clone_dir.path().join("clone");
        TestGitRepo::clone_from(&origin, &clone_path).unwrap();
        let git_ref = GitRef::remote_branch("origin", "2.0");

        let content = GitOps::show_file(&clone_path, &git_ref, "CHANGES.md").unwrap();
        assert_eq!(content, "# Changelog 2.0\n");

        let missing = GitOps::show_file(&clone_path, &git_ref, "NOPE.md");
        assert!(matches!(missing, Err(Error::GitCommand { .. })));
    }

    #[test]
    fn test_file_exists_at_remote_branch() {
        let origin_dir = TempDir::new().unwrap();
        let origin = repo_with_commit(origin_dir.path());
        origin.write_file("docs/notes.md", "notes\n").unwrap();
        origin.add_all_and_commit("add notes").unwrap();

        let clone_dir = TempDir::new().unwrap();
        let clone_path = clone_dir.path().join("clone");
        TestGitRepo::clone_from(&origin, &clone_path).unwrap();
        let main = GitRef::remote_branch("origin", "main");

        assert!(GitOps::file_exists(&clone_path, &main, "CHANGES.md").unwrap());
        assert!(GitOps::file_exists(&clone_path, &main, "docs").unwrap());
        assert!(!GitOps::file_exists(&clone_path, &main, "relkit.toml").unwrap());
        assert!(
            !GitOps::file_exists(&clone_path, &GitRef::remote_branch("origin", "9.9"), "CHANGES.md")
                .unwrap()
        );
    }

    #[test]
    fn test_list_remote_branches_skips_head() {
        let origin_dir = TempDir::new().unwrap();
        let origin = repo_with_commit(origin_dir.path());
        origin.checkout_new_branch("2.0").unwrap();
        origin.checkout_branch("main").unwrap();

        let clone_dir = TempDir::new().unwrap();
        let clone_path = clone_dir.path().join("clone");
        TestGitRepo::clone_from(&origin, &clone_path).unwrap();

        let branches = GitOps::list_remote_branches(&clone_path, "origin").unwrap();
        assert_eq!(branches, vec!["2.0".to_string(), "main".to_string()]);
        assert!(GitOps::list_remote_branches(&clone_path, "upstream").unwrap().is_empty());
    }

    #[test]
    fn test_commit_file_and_commit_info() {
        let temp_dir = TempDir::new().unwrap();
        let repo = repo_with_commit(temp_dir.path());
        repo.write_file("CHANGES.md", "# Changelog\n\nmore\n").unwrap();
        repo.write_file("other.txt", "untouched").unwrap();

        GitOps::commit_file(temp_dir.path(), "CHANGES.md", &["Update Changelog", "[noissue]"])
            .unwrap();

        let info = GitOps::commit_info(temp_dir.path(), "HEAD").unwrap();
        assert_eq!(info.message, "Update Changelog\n\n[noissue]");
        assert_eq!(info.parent_count, 1);
        assert!(!info.is_merge());
        assert_eq!(info.id, repo.head_commit_id().unwrap());

        // only the named file is part of the commit
        let status = repo.git(&["status", "--porcelain"]).unwrap();
        assert!(status.contains("other.txt"));
    }

    #[test]
    fn test_commit_info_unknown_rev() {
        let temp_dir = TempDir::new().unwrap();
        repo_with_commit(temp_dir.path());
        assert!(GitOps::commit_info(temp_dir.path(), "does-not-exist").is_err());
    }

    #[test]
    fn test_git_ref_as_rev() {
        assert_eq!(
            GitRef::remote_branch("origin", "2.0").as_rev(),
            "refs/remotes/origin/2.0"
        );
    }
}
