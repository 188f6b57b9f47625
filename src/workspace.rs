// src/workspace.rs

use crate::error::{HistoryError, HistoryResult};
use crate::model::HistoryCommit;
use chrono::{DateTime, FixedOffset, TimeZone};
use git2::build::CheckoutBuilder;
use git2::{Commit, ErrorCode, Oid, Repository, Sort};
use log::{debug, info};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Attributes file the classifier reads its vendored/excluded paths from
pub const EXCLUSION_FILE: &str = ".gitattributes";

/// Default rule: treat any top-level `*/libs` tree as vendored code
pub const DEFAULT_EXCLUSION: &str = "/*/libs/** linguist-vendored";

/// A throwaway clone whose checkout is replaced wholesale on every commit.
///
/// The clone lives in a temporary directory that is deleted when this value drops.
pub struct WorkingCopy {
    // Declared before `_dir` so the repository handle closes before the directory goes
    repo: Repository,
    workdir: PathBuf,
    _dir: TempDir,
}

impl WorkingCopy {
    /// Clones `source` (a local path or a URL) into a fresh temporary directory
    pub fn from_source(source: &str) -> HistoryResult<Self> {
        let local = Path::new(source);
        let source = if local.exists() {
            local
                .canonicalize()
                .map_err(|e| HistoryError::configuration(format!("cannot resolve {}: {}", source, e)))?
                .to_string_lossy()
                .into_owned()
        } else {
            source.to_string()
        };

        let dir = TempDir::new()?;
        let workdir = dir.path().join("repo");
        info!("Cloning {} into {}", source, workdir.display());
        let repo = Repository::clone(&source, &workdir)
            .map_err(|e| HistoryError::configuration(format!("cannot clone {}: {}", source, e.message())))?;

        Ok(Self {
            repo,
            workdir,
            _dir: dir,
        })
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// All commits reachable from HEAD, oldest first. An empty repository has no history.
    pub fn history(&self) -> HistoryResult<Vec<HistoryCommit>> {
        match self.repo.head() {
            Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
                return Ok(Vec::new())
            }
            Err(e) => return Err(e.into()),
            Ok(_) => {}
        }

        let mut revwalk = self.repo.revwalk()?;
        revwalk.push_head()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;

        let mut commits = Vec::new();
        for oid in revwalk {
            let commit = self.repo.find_commit(oid?)?;
            commits.push(HistoryCommit {
                id: commit.id().to_string(),
                committed_at: commit_time(&commit)?,
            });
        }
        commits.reverse(); // Walk from the first commit to the last
        Ok(commits)
    }

    /// Replaces the working tree with `commit_id` and detaches HEAD there.
    /// Local modifications and untracked files from earlier iterations are discarded.
    pub fn checkout(&mut self, commit_id: &str) -> HistoryResult<()> {
        let oid = Oid::from_str(commit_id)?;
        let commit = self.repo.find_commit(oid)?;

        let mut checkout = CheckoutBuilder::new();
        checkout.force().remove_untracked(true).remove_ignored(true);
        self.repo.checkout_tree(commit.as_object(), Some(&mut checkout))?;
        self.repo.set_head_detached(oid)?;

        debug!("Checked out {}", commit_id);
        Ok(())
    }

    /// Committed timestamp of the currently checked-out commit
    pub fn head_timestamp(&self) -> HistoryResult<DateTime<FixedOffset>> {
        let commit = self.repo.head()?.peel_to_commit()?;
        commit_time(&commit)
    }

    /// Appends `rules` to the attributes file without committing them
    pub fn apply_exclusions(&self, rules: &[String]) -> HistoryResult<()> {
        if rules.is_empty() {
            return Ok(());
        }

        let path = self.workdir.join(EXCLUSION_FILE);
        let needs_newline = match fs::read(&path) {
            Ok(existing) => existing.last().map_or(false, |&b| b != b'\n'),
            Err(_) => false,
        };

        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        let mut block = String::new();
        if needs_newline {
            block.push('\n');
        }
        for rule in rules {
            block.push_str(rule);
            block.push('\n');
        }
        file.write_all(block.as_bytes())?;
        Ok(())
    }

    /// Puts the attributes file back the way HEAD has it: checked out again when
    /// tracked, removed when not.
    pub fn restore_exclusions(&self) -> HistoryResult<()> {
        let restore_err = |e: &dyn std::fmt::Display| HistoryError::ExclusionRestore(e.to_string());

        let tree = self
            .repo
            .head()
            .and_then(|head| head.peel_to_tree())
            .map_err(|e| restore_err(&e))?;

        if tree.get_path(Path::new(EXCLUSION_FILE)).is_ok() {
            let mut checkout = CheckoutBuilder::new();
            checkout.force().path(EXCLUSION_FILE);
            self.repo
                .checkout_head(Some(&mut checkout))
                .map_err(|e| restore_err(&e))?;
        } else {
            let path = self.workdir.join(EXCLUSION_FILE);
            if path.exists() {
                fs::remove_file(&path).map_err(|e| restore_err(&e))?;
            }
        }
        Ok(())
    }
}

fn commit_time(commit: &Commit) -> HistoryResult<DateTime<FixedOffset>> {
    let time = commit.time();
    FixedOffset::east_opt(time.offset_minutes() * 60)
        .and_then(|tz| tz.timestamp_opt(time.seconds(), 0).single())
        .ok_or_else(|| {
            HistoryError::Git(git2::Error::from_str(&format!(
                "commit {} has an out-of-range timestamp",
                commit.id()
            )))
        })
}
