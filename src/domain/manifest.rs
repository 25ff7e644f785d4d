//! Manifest of directories and download tasks for one course.
//!
//! A manifest is pure data: executing it (creating directories, fetching
//! remote files, writing inline content) is left to the caller.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Where the bytes of a task come from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskSource {
    /// Fetch from a remote URL
    Remote(String),

    /// Write generated content
    Inline(String),
}

/// A single unit of output: a local path plus exactly one source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadTask {
    pub local_path: PathBuf,
    pub source: TaskSource,
}

impl DownloadTask {
    /// Task that fetches `url` into `local_path`
    pub fn remote(local_path: impl Into<PathBuf>, url: impl Into<String>) -> Self {
        Self {
            local_path: local_path.into(),
            source: TaskSource::Remote(url.into()),
        }
    }

    /// Task that writes `content` to `local_path`
    pub fn inline(local_path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            local_path: local_path.into(),
            source: TaskSource::Inline(content.into()),
        }
    }

    pub fn remote_url(&self) -> Option<&str> {
        match &self.source {
            TaskSource::Remote(url) => Some(url),
            TaskSource::Inline(_) => None,
        }
    }

    pub fn inline_content(&self) -> Option<&str> {
        match &self.source {
            TaskSource::Inline(content) => Some(content),
            TaskSource::Remote(_) => None,
        }
    }
}

/// A directory that must exist before tasks targeting it run.
/// Creating it more than once is harmless.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DirectoryRequirement {
    pub path: PathBuf,
}

impl DirectoryRequirement {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

/// All directories and download tasks for one course, in execution order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub directories: Vec<DirectoryRequirement>,
    pub tasks: Vec<DownloadTask>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a directory requirement
    pub fn require_dir(&mut self, path: impl Into<PathBuf>) {
        self.directories.push(DirectoryRequirement::new(path));
    }

    /// Append directories and tasks produced for one lecture
    pub fn extend(
        &mut self,
        directories: impl IntoIterator<Item = DirectoryRequirement>,
        tasks: impl IntoIterator<Item = DownloadTask>,
    ) {
        self.directories.extend(directories);
        self.tasks.extend(tasks);
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Number of tasks fetching remote files
    pub fn remote_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.remote_url().is_some()).count()
    }

    /// Number of tasks writing generated content
    pub fn inline_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.inline_content().is_some()).count()
    }

    /// Local paths targeted by more than one task, in first-seen order
    pub fn duplicate_paths(&self) -> Vec<&Path> {
        let mut seen: HashMap<&Path, usize> = HashMap::new();
        let mut duplicates = Vec::new();

        for task in &self.tasks {
            let count = seen.entry(task.local_path.as_path()).or_insert(0);
            *count += 1;
            if *count == 2 {
                duplicates.push(task.local_path.as_path());
            }
        }

        duplicates
    }

    /// Tasks whose parent directory is not a listed requirement
    pub fn orphaned_tasks(&self) -> Vec<&DownloadTask> {
        let dirs: HashSet<&Path> = self.directories.iter().map(|d| d.path.as_path()).collect();

        self.tasks
            .iter()
            .filter(|t| match t.local_path.parent() {
                Some(parent) => !dirs.contains(parent),
                None => true,
            })
            .collect()
    }

    /// Stable SHA-256 fingerprint over directories and tasks, in order
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();

        for dir in &self.directories {
            hasher.update(b"d\0");
            hasher.update(dir.path.to_string_lossy().as_bytes());
            hasher.update(b"\n");
        }

        for task in &self.tasks {
            hasher.update(b"t\0");
            hasher.update(task.local_path.to_string_lossy().as_bytes());
            match &task.source {
                TaskSource::Remote(url) => {
                    hasher.update(b"\0r\0");
                    hasher.update(url.as_bytes());
                }
                TaskSource::Inline(content) => {
                    hasher.update(b"\0i\0");
                    hasher.update(content.as_bytes());
                }
            }
            hasher.update(b"\n");
        }

        hex::encode(hasher.finalize())
    }
}
