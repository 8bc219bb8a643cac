use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::models::*;
use crate::errors::StoreError;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Async-safe handle to the issue store.
///
/// Wraps `IssueStore` behind `Arc<Mutex>` and runs every access on tokio's
/// blocking thread pool via `spawn_blocking`, so file I/O never ties up an
/// async worker thread.
#[derive(Clone)]
pub struct StoreHandle {
    inner: Arc<std::sync::Mutex<IssueStore>>,
}

impl StoreHandle {
    pub fn new(store: IssueStore) -> Self {
        Self {
            inner: Arc::new(std::sync::Mutex::new(store)),
        }
    }

    /// Run a closure with access to the store on a blocking thread.
    /// All data passed into `f` must be owned (`'static`).
    pub async fn call<F, R>(&self, f: F) -> StoreResult<R>
    where
        F: FnOnce(&IssueStore) -> StoreResult<R> + Send + 'static,
        R: Send + 'static,
    {
        let store = self.inner.clone();
        tokio::task::spawn_blocking(move || {
            let guard = store.lock().map_err(|_| StoreError::LockPoisoned)?;
            f(&guard)
        })
        .await
        .map_err(|e| StoreError::Other(anyhow::anyhow!("Store task panicked: {}", e)))?
    }
}

/// Issues persisted as a single JSON document.
///
/// Every operation reads the whole file, mutates the in-memory list and
/// rewrites the whole file. Nothing is cached between calls.
#[derive(Debug, Clone)]
pub struct IssueStore {
    path: PathBuf,
}

impl IssueStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create an empty document if no data file exists yet.
    /// Returns `true` when a file was written.
    pub fn init(&self) -> StoreResult<bool> {
        if self.path.exists() {
            return Ok(false);
        }
        self.save(&[])?;
        info!(path = %self.path.display(), "initialized empty data file");
        Ok(true)
    }

    /// Read all issues. A missing, unreadable or malformed file reads as an
    /// empty list.
    pub fn load(&self) -> Vec<Issue> {
        match self.load_strict() {
            Ok(issues) => issues,
            Err(e) => {
                warn!(error = %e, "failed to load issues, reading as empty");
                Vec::new()
            }
        }
    }

    /// Read all issues ahead of a save. Only a missing file counts as empty;
    /// unreadable or malformed content is an error.
    fn load_strict(&self) -> StoreResult<Vec<Issue>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "data file missing, starting empty");
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        serde_json::from_str::<IssueDocument>(&content)
            .map(|doc| doc.issues)
            .map_err(|source| StoreError::Corrupt {
                path: self.path.clone(),
                source,
            })
    }

    /// Rewrite the whole document. The new content lands in a `.tmp` sibling
    /// first and is renamed over the target.
    pub fn save(&self, issues: &[Issue]) -> StoreResult<()> {
        let doc = IssueDocument {
            issues: issues.to_vec(),
        };
        let content = serde_json::to_string_pretty(&doc)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        let tmp = self.tmp_path();
        std::fs::write(&tmp, content).map_err(|source| StoreError::Io {
            path: tmp.clone(),
            source,
        })?;
        std::fs::rename(&tmp, &self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), count = issues.len(), "saved issues");
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".tmp");
        PathBuf::from(name)
    }

    // ── Issues ────────────────────────────────────────────────────────

    pub fn list(&self) -> Vec<Issue> {
        self.load()
    }

    pub fn get(&self, id: i64) -> StoreResult<Issue> {
        self.load()
            .into_iter()
            .find(|i| i.id == id)
            .ok_or(StoreError::NotFound { id })
    }

    pub fn create(&self, new: NewIssue) -> StoreResult<Issue> {
        let mut issues = self.load_strict()?;
        let issue = Issue {
            id: next_id(&issues)?,
            title: new.title,
            description: new.description,
            date_promised: new.date_promised,
            status: IssueStatus::Pending,
            extra: Default::default(),
        };
        issues.push(issue.clone());
        self.save(&issues)?;
        info!(id = issue.id, status = issue.status.as_str(), "created issue");
        Ok(issue)
    }

    pub fn update(&self, id: i64, patch: IssuePatch) -> StoreResult<Issue> {
        let mut issues = self.load_strict()?;
        let issue = issues
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or(StoreError::NotFound { id })?;
        issue.apply(patch);
        let updated = issue.clone();
        self.save(&issues)?;
        info!(id, status = updated.status.as_str(), "updated issue");
        Ok(updated)
    }

    pub fn delete(&self, id: i64) -> StoreResult<()> {
        let mut issues = self.load_strict()?;
        let before = issues.len();
        issues.retain(|i| i.id != id);
        if issues.len() == before {
            return Err(StoreError::NotFound { id });
        }
        self.save(&issues)?;
        info!(id, "deleted issue");
        Ok(())
    }
}

/// Next id to hand out: one past the largest existing id, or 1.
pub fn next_id(issues: &[Issue]) -> StoreResult<i64> {
    match issues.iter().map(|i| i.id).max() {
        None => Ok(1),
        Some(max) => max
            .checked_add(1)
            .ok_or_else(|| StoreError::Other(anyhow::anyhow!("Issue id space exhausted at {}", max))),
    }
}
