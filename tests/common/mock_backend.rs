//! Recording mock backend for workflow tests
//!
//! Tracks a current branch and a stash stack so tests can check both the
//! call sequence and the repository state the workflow leaves behind.

#![allow(dead_code)]

use anyhow::{bail, Result};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use tele_scope::git::{UserConfig, VcsBackend};

/// One backend call, in the order the workflow made it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    IsInsideWorkTree,
    CurrentBranch,
    IsTreeDirty,
    ConfiguredIdentity(String),
    HasRemote(String),
    Stash(String),
    StashApply,
    StashDrop,
    Checkout(String),
    Pull(String, String),
    Add(Vec<String>),
    Commit {
        author: Option<String>,
        message: Option<String>,
    },
    Push(String, String),
    ResetAndRestore,
    Rebase(String),
}

impl Call {
    /// Whether this call changes the repository
    pub fn is_mutating(&self) -> bool {
        !matches!(
            self,
            Call::IsInsideWorkTree
                | Call::CurrentBranch
                | Call::IsTreeDirty
                | Call::ConfiguredIdentity(_)
                | Call::HasRemote(_)
        )
    }
}

/// Operations that can be made to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Stash,
    StashApply,
    StashDrop,
    Checkout,
    Pull,
    Add,
    Commit,
    Push,
    ResetAndRestore,
    Rebase,
}

#[derive(Debug, Clone, Copy)]
enum Failure {
    Always,
    /// Fail only the nth call (1-based)
    Nth(usize),
}

pub struct MockBackend {
    inside_work_tree: bool,
    dirty: bool,
    branches: HashSet<String>,
    remotes: HashSet<String>,
    identities: HashMap<String, UserConfig>,
    /// Checkouts of the key land on the value instead
    redirects: HashMap<String, Option<String>>,
    failures: HashMap<Op, Failure>,
    current: Mutex<Option<String>>,
    stashes: Mutex<Vec<String>>,
    counts: Mutex<HashMap<Op, usize>>,
    calls: Mutex<Vec<Call>>,
}

impl MockBackend {
    /// A dirty repository on `branch` with `master` and an `origin` remote
    pub fn new(branch: &str) -> Self {
        let mut branches = HashSet::new();
        branches.insert(branch.to_string());
        branches.insert("master".to_string());

        let mut remotes = HashSet::new();
        remotes.insert("origin".to_string());

        Self {
            inside_work_tree: true,
            dirty: true,
            branches,
            remotes,
            identities: HashMap::new(),
            redirects: HashMap::new(),
            failures: HashMap::new(),
            current: Mutex::new(Some(branch.to_string())),
            stashes: Mutex::new(Vec::new()),
            counts: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn outside_repository() -> Self {
        let mut backend = Self::new("feature");
        backend.inside_work_tree = false;
        backend
    }

    pub fn detached() -> Self {
        let backend = Self::new("feature");
        *backend.current.lock().unwrap() = None;
        backend
    }

    pub fn clean(mut self) -> Self {
        self.dirty = false;
        self
    }

    pub fn with_branch(mut self, branch: &str) -> Self {
        self.branches.insert(branch.to_string());
        self
    }

    pub fn without_branch(mut self, branch: &str) -> Self {
        self.branches.remove(branch);
        self
    }

    pub fn with_remote(mut self, remote: &str) -> Self {
        self.remotes.insert(remote.to_string());
        self
    }

    pub fn without_remote(mut self, remote: &str) -> Self {
        self.remotes.remove(remote);
        self
    }

    pub fn with_identity(mut self, branch: &str, name: Option<&str>, email: Option<&str>) -> Self {
        self.identities.insert(
            branch.to_string(),
            UserConfig::new(name.map(String::from), email.map(String::from)),
        );
        self
    }

    /// A successful checkout of `target` leaves `actual` checked out
    pub fn redirect_checkout(mut self, target: &str, actual: Option<&str>) -> Self {
        self.redirects
            .insert(target.to_string(), actual.map(String::from));
        self
    }

    pub fn fail(mut self, op: Op) -> Self {
        self.failures.insert(op, Failure::Always);
        self
    }

    pub fn fail_nth(mut self, op: Op, n: usize) -> Self {
        self.failures.insert(op, Failure::Nth(n));
        self
    }

    // === Inspection ===

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn mutating_calls(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_mutating).collect()
    }

    pub fn count(&self, call: &Call) -> usize {
        self.calls().iter().filter(|c| *c == call).count()
    }

    pub fn made_call(&self, predicate: impl Fn(&Call) -> bool) -> bool {
        self.calls().iter().any(predicate)
    }

    pub fn stash_count(&self) -> usize {
        self.stashes.lock().unwrap().len()
    }

    pub fn stash_messages(&self) -> Vec<String> {
        self.stashes.lock().unwrap().clone()
    }

    pub fn current(&self) -> Option<String> {
        self.current.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn check(&self, op: Op) -> Result<()> {
        let mut counts = self.counts.lock().unwrap();
        let count = counts.entry(op).or_insert(0);
        *count += 1;

        match self.failures.get(&op) {
            Some(Failure::Always) => bail!("mock {op:?} failure"),
            Some(Failure::Nth(n)) if *n == *count => bail!("mock {op:?} failure"),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl VcsBackend for MockBackend {
    async fn is_inside_work_tree(&self) -> bool {
        self.record(Call::IsInsideWorkTree);
        self.inside_work_tree
    }

    async fn current_branch(&self) -> Option<String> {
        self.record(Call::CurrentBranch);
        self.current()
    }

    async fn is_tree_dirty(&self) -> Result<bool> {
        self.record(Call::IsTreeDirty);
        Ok(self.dirty)
    }

    async fn configured_identity(&self, branch: &str) -> UserConfig {
        self.record(Call::ConfiguredIdentity(branch.to_string()));
        self.identities.get(branch).cloned().unwrap_or_default()
    }

    async fn has_remote(&self, remote: &str) -> Result<bool> {
        self.record(Call::HasRemote(remote.to_string()));
        Ok(self.remotes.contains(remote))
    }

    async fn stash(&self, message: &str) -> Result<()> {
        self.record(Call::Stash(message.to_string()));
        self.check(Op::Stash)?;
        self.stashes.lock().unwrap().push(message.to_string());
        Ok(())
    }

    async fn stash_apply(&self) -> Result<()> {
        self.record(Call::StashApply);
        self.check(Op::StashApply)?;
        if self.stashes.lock().unwrap().is_empty() {
            bail!("No stash entries found.");
        }
        Ok(())
    }

    async fn stash_drop(&self) -> Result<()> {
        self.record(Call::StashDrop);
        self.check(Op::StashDrop)?;
        if self.stashes.lock().unwrap().pop().is_none() {
            bail!("No stash entries found.");
        }
        Ok(())
    }

    async fn checkout(&self, branch: &str) -> Result<()> {
        self.record(Call::Checkout(branch.to_string()));
        self.check(Op::Checkout)?;
        if !self.branches.contains(branch) {
            bail!("pathspec '{branch}' did not match any file(s) known to git");
        }
        let landed = match self.redirects.get(branch) {
            Some(actual) => actual.clone(),
            None => Some(branch.to_string()),
        };
        *self.current.lock().unwrap() = landed;
        Ok(())
    }

    async fn pull(&self, remote: &str, branch: &str) -> Result<()> {
        self.record(Call::Pull(remote.to_string(), branch.to_string()));
        self.check(Op::Pull)
    }

    async fn add(&self, paths: &[String]) -> Result<()> {
        self.record(Call::Add(paths.to_vec()));
        self.check(Op::Add)
    }

    async fn commit(&self, author: Option<&str>, message: Option<&str>) -> Result<()> {
        self.record(Call::Commit {
            author: author.map(String::from),
            message: message.map(String::from),
        });
        self.check(Op::Commit)
    }

    async fn push(&self, remote: &str, branch: &str) -> Result<()> {
        self.record(Call::Push(remote.to_string(), branch.to_string()));
        self.check(Op::Push)
    }

    async fn reset_and_restore(&self) -> Result<()> {
        self.record(Call::ResetAndRestore);
        self.check(Op::ResetAndRestore)
    }

    async fn rebase(&self, onto: &str) -> Result<()> {
        self.record(Call::Rebase(onto.to_string()));
        self.check(Op::Rebase)
    }
}
