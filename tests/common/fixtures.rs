//! Test fixtures and builders

use anyhow::Result;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use super::git::{add_git_remote, create_test_commit, git, setup_bare_repo, setup_git_repo};

/// A working repository with a bare `origin`, cleaned up on drop
pub struct TestRepo {
    pub temp_dir: TempDir,
    pub branch: String,
}

impl TestRepo {
    /// Get the path to the working repository
    pub fn path(&self) -> PathBuf {
        self.temp_dir.path().join("work")
    }

    pub fn remote_path(&self) -> PathBuf {
        self.temp_dir.path().join("origin.git")
    }

    /// Overwrite or create a file in the working repository
    pub fn write_file(&self, name: &str, content: &str) -> Result<PathBuf> {
        let file_path = self.path().join(name);
        std::fs::write(&file_path, content)?;
        Ok(file_path)
    }

    pub fn read_file(&self, name: &str) -> Result<String> {
        Ok(std::fs::read_to_string(self.path().join(name))?)
    }

    pub fn git(&self, args: &[&str]) -> Result<String> {
        git(&self.path(), args)
    }

    pub fn current_branch(&self) -> Result<String> {
        self.git(&["rev-parse", "--abbrev-ref", "HEAD"])
    }

    /// Subject of the tip commit of `rev`
    pub fn subject(&self, rev: &str) -> Result<String> {
        self.git(&["log", "-1", "--format=%s", rev])
    }

    pub fn author(&self, rev: &str) -> Result<String> {
        self.git(&["log", "-1", "--format=%an <%ae>", rev])
    }

    pub fn stash_count(&self) -> Result<usize> {
        Ok(self.git(&["stash", "list"])?.lines().count())
    }

    /// Paths with changes in tracked files, as reported by `git status`
    pub fn modified_files(&self) -> Result<Vec<String>> {
        let status = self.git(&["status", "--porcelain", "--untracked-files=no"])?;
        Ok(status
            .lines()
            .filter_map(|line| line.get(3..))
            .map(str::to_string)
            .collect())
    }

    /// Subject of the tip of `branch` in the bare remote
    pub fn remote_subject(&self, branch: &str) -> Result<String> {
        git(&self.remote_path(), &["log", "-1", "--format=%s", branch])
    }
}

/// Builder for a repository whose feature branch sits one commit ahead of
/// `master`, with `master` already pushed to `origin`
pub struct TestRepoBuilder {
    branch: String,
    files: Vec<(String, String)>,
    with_remote: bool,
}

impl TestRepoBuilder {
    pub fn new(branch: impl Into<String>) -> Self {
        Self {
            branch: branch.into(),
            files: vec![
                ("README.md".to_string(), "# Test Repo\n".to_string()),
                ("NOTES.md".to_string(), "notes\n".to_string()),
            ],
            with_remote: true,
        }
    }

    /// Adds a tracked file to the initial commit
    pub fn with_file(mut self, name: impl Into<String>, content: impl Into<String>) -> Self {
        self.files.push((name.into(), content.into()));
        self
    }

    pub fn without_remote(mut self) -> Self {
        self.with_remote = false;
        self
    }

    pub fn build(self) -> Result<TestRepo> {
        let temp_dir = TempDir::new()?;
        let work = temp_dir.path().join("work");
        let remote = temp_dir.path().join("origin.git");
        std::fs::create_dir(&work)?;
        std::fs::create_dir(&remote)?;

        setup_git_repo(&work)?;
        for (name, content) in &self.files {
            std::fs::write(work.join(name), content)?;
        }
        git(&work, &["add", "."])?;
        git(&work, &["commit", "-q", "-m", "Initial commit"])?;

        if self.with_remote {
            setup_bare_repo(&remote)?;
            add_git_remote(&work, "origin", path_str(&remote)?)?;
            git(&work, &["push", "-q", "origin", "master"])?;
        }

        git(&work, &["checkout", "-q", "-b", &self.branch])?;
        create_test_commit(&work, "local.txt", "local work\n", "Local work")?;

        Ok(TestRepo {
            temp_dir,
            branch: self.branch,
        })
    }
}

fn path_str(path: &Path) -> Result<&str> {
    path.to_str()
        .ok_or_else(|| anyhow::anyhow!("non UTF-8 path: {}", path.display()))
}
