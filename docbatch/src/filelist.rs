//! Ordered, user-curated lists of input documents.
//!
//! A [`FileList`] holds the files a batch operation will consume, in the
//! order they will be processed. It enforces the acceptance filter of its
//! [`FileKind`], keeps at most one "current" entry for reordering, and
//! collapses duplicates on request.
//!
//! # Examples
//!
//! ```
//! use docbatch::config::DedupPolicy;
//! use docbatch::filelist::{FileKind, FileList};
//!
//! let mut list = FileList::new(FileKind::Pdf);
//! let rejected = list.add(["a.pdf", "b.PDF", "notes.txt", "a.pdf"]);
//! assert_eq!(rejected.len(), 1);
//!
//! list.dedupe_in_place(DedupPolicy::KeepLast);
//! assert_eq!(list.len(), 2);
//! ```

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Local};
use log::debug;

use crate::config::DedupPolicy;

/// The family of documents a list holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    /// Portable Document Format (`.pdf`).
    Pdf,
    /// Excel workbooks (`.xlsx`, `.xls`).
    Excel,
}

impl FileKind {
    /// Lowercase extensions this kind accepts.
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            Self::Pdf => &["pdf"],
            Self::Excel => &["xlsx", "xls"],
        }
    }

    /// Whether `path` carries one of this kind's extensions (case-insensitive).
    pub fn accepts(self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                self.extensions()
                    .iter()
                    .any(|allowed| ext.eq_ignore_ascii_case(allowed))
            })
    }

    /// Human readable extension list, e.g. `.xlsx, .xls`.
    pub fn describe(self) -> String {
        self.extensions()
            .iter()
            .map(|ext| format!(".{ext}"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pdf => f.write_str("PDF"),
            Self::Excel => f.write_str("Excel"),
        }
    }
}

/// One listed file. Identity is the path alone.
#[derive(Debug, Clone)]
pub struct FileEntry {
    path: PathBuf,
    modified: Option<SystemTime>,
}

impl FileEntry {
    /// Capture `path` and its last-modified time, if the file can be stat'ed.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let modified = std::fs::metadata(&path)
            .and_then(|meta| meta.modified())
            .ok();
        Self { path, modified }
    }

    /// The file's path as supplied by the caller.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Last-modified time captured when the entry was created.
    pub fn modified(&self) -> Option<SystemTime> {
        self.modified
    }

    /// Display label: `"name (modified: YYYY-MM-DD HH:MM:SS)"`.
    pub fn label(&self) -> String {
        let name = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string());

        match self.modified {
            Some(time) => {
                let local: DateTime<Local> = time.into();
                format!("{name} (modified: {})", local.format("%Y-%m-%d %H:%M:%S"))
            }
            None => name,
        }
    }
}

impl PartialEq for FileEntry {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for FileEntry {}

/// Ordered list of documents of a single [`FileKind`].
#[derive(Debug, Clone)]
pub struct FileList {
    kind: FileKind,
    entries: Vec<FileEntry>,
    current: Option<usize>,
}

impl FileList {
    /// Create an empty list for `kind`.
    pub fn new(kind: FileKind) -> Self {
        Self {
            kind,
            entries: Vec::new(),
            current: None,
        }
    }

    /// The kind of document this list accepts.
    pub fn kind(&self) -> FileKind {
        self.kind
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in processing order.
    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    /// Snapshot of the paths in processing order.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.entries.iter().map(|e| e.path.clone()).collect()
    }

    /// Append accepted paths in order; return the ones that were refused.
    pub fn add<I, P>(&mut self, paths: I) -> Vec<PathBuf>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut rejected = Vec::new();
        for path in paths {
            let path = path.into();
            if self.kind.accepts(&path) {
                self.entries.push(FileEntry::new(path));
            } else {
                debug!("rejected {} for {} list", path.display(), self.kind);
                rejected.push(path);
            }
        }
        rejected
    }

    /// Remove the entries at `indices`. Out-of-range indices are ignored.
    ///
    /// The current entry stays current if it survives, otherwise the
    /// cursor is cleared.
    pub fn remove(&mut self, indices: &[usize]) {
        let doomed: HashSet<usize> = indices.iter().copied().collect();

        self.current = self.current.and_then(|cur| {
            if doomed.contains(&cur) {
                None
            } else {
                Some(cur - doomed.iter().filter(|&&i| i < cur).count())
            }
        });

        let mut index = 0;
        self.entries.retain(|_| {
            let keep = !doomed.contains(&index);
            index += 1;
            keep
        });
    }

    /// Remove every entry and clear the cursor.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.current = None;
    }

    /// Return a copy with one entry per distinct path.
    pub fn dedupe(&self, policy: DedupPolicy) -> FileList {
        let mut copy = self.clone();
        copy.dedupe_in_place(policy);
        copy
    }

    /// Collapse duplicate paths according to `policy`. Clears the cursor.
    pub fn dedupe_in_place(&mut self, policy: DedupPolicy) {
        let before = self.entries.len();
        let mut seen = HashSet::new();

        match policy {
            DedupPolicy::KeepLast => {
                let mut kept: Vec<FileEntry> = self
                    .entries
                    .drain(..)
                    .rev()
                    .filter(|e| seen.insert(e.path.clone()))
                    .collect();
                kept.reverse();
                self.entries = kept;
            }
            DedupPolicy::KeepFirst => {
                self.entries.retain(|e| seen.insert(e.path.clone()));
            }
        }

        if self.entries.len() != before {
            debug!("dropped {} duplicate entries", before - self.entries.len());
        }
        self.current = None;
    }

    /// Make the entry at `index` current. Returns false if out of range.
    pub fn select(&mut self, index: usize) -> bool {
        if index < self.entries.len() {
            self.current = Some(index);
            true
        } else {
            false
        }
    }

    /// Index of the current entry.
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    /// Move the current entry to the front.
    pub fn move_to_top(&mut self) -> bool {
        self.move_current_to(|_, _| 0)
    }

    /// Swap the current entry with its predecessor.
    pub fn move_up(&mut self) -> bool {
        self.move_current_to(|cur, _| cur.saturating_sub(1))
    }

    /// Swap the current entry with its successor.
    pub fn move_down(&mut self) -> bool {
        self.move_current_to(|cur, last| (cur + 1).min(last))
    }

    /// Move the current entry to the back.
    pub fn move_to_bottom(&mut self) -> bool {
        self.move_current_to(|_, last| last)
    }

    fn move_current_to(&mut self, target: impl FnOnce(usize, usize) -> usize) -> bool {
        let Some(cur) = self.current else {
            return false;
        };
        let Some(last) = self.entries.len().checked_sub(1) else {
            return false;
        };

        let dest = target(cur, last);
        if dest == cur {
            return false;
        }

        let entry = self.entries.remove(cur);
        self.entries.insert(dest, entry);
        self.current = Some(dest);
        true
    }
}
