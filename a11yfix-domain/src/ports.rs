use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::Path;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Reason recorded for a matching file whose path cannot be represented as UTF-8.
pub const NON_UTF8_PATH: &str = "path is not valid UTF-8";

/// Result of walking a source tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Discovery {
    /// Matching files, sorted by path.
    pub files: Vec<Utf8PathBuf>,

    /// Entries the walk found but cannot hand out, sorted by path.
    pub skipped: Vec<SkippedEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    /// Lossy rendering of the path.
    pub path: Utf8PathBuf,
    pub reason: String,
}

/// Access to the tree of markup files being fixed.
pub trait SourceTree {
    fn root(&self) -> &Utf8Path;

    /// Files below the root whose name ends in `.{extension}`.
    fn discover(&self, extension: &str) -> anyhow::Result<Discovery>;

    fn read_to_string(&self, path: &Utf8Path) -> io::Result<String>;

    fn write(&self, path: &Utf8Path, contents: &str) -> io::Result<()>;
}

fn lossy(path: &Path) -> Utf8PathBuf {
    Utf8PathBuf::from(path.to_string_lossy().into_owned())
}

/// File-system backed `SourceTree`.
#[derive(Debug, Clone)]
pub struct FsSourceTree {
    root: Utf8PathBuf,
}

impl FsSourceTree {
    pub fn new(root: Utf8PathBuf) -> Self {
        Self { root }
    }

    fn walk_root(&self) -> &Utf8Path {
        if self.root.as_str().is_empty() {
            Utf8Path::new(".")
        } else {
            &self.root
        }
    }
}

impl SourceTree for FsSourceTree {
    fn root(&self) -> &Utf8Path {
        &self.root
    }

    fn discover(&self, extension: &str) -> anyhow::Result<Discovery> {
        let root = self.walk_root();
        let suffix = format!(".{}", extension.trim_start_matches('.'));
        debug!(root = %root, suffix = %suffix, "scanning for markup files");

        if !root.is_dir() {
            debug!(root = %root, "scan root is not a directory; nothing to scan");
            return Ok(Discovery::default());
        }

        let mut found = Discovery::default();
        for entry in WalkDir::new(root).follow_links(false) {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    let path = e.path().map(lossy).unwrap_or_else(|| root.to_path_buf());
                    warn!(path = %path, "cannot walk entry: {}", e);
                    let reason = e
                        .io_error()
                        .map_or_else(|| e.to_string(), ToString::to_string);
                    found.skipped.push(SkippedEntry { path, reason });
                    continue;
                }
            };

            // Lossy names keep their valid tail, so the suffix test still holds.
            if !entry.file_name().to_string_lossy().ends_with(&suffix) {
                continue;
            }
            if !entry.path().is_file() {
                debug!(path = %entry.path().display(), "skipping directory with matching name");
                continue;
            }

            match Utf8Path::from_path(entry.path()) {
                Some(path) => found.files.push(path.to_path_buf()),
                None => {
                    let path = lossy(entry.path());
                    warn!(path = %path, "matching file has a non UTF-8 path");
                    found.skipped.push(SkippedEntry {
                        path,
                        reason: NON_UTF8_PATH.to_string(),
                    });
                }
            }
        }

        // Deterministic order matters.
        found.files.sort();
        found.skipped.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(found)
    }

    fn read_to_string(&self, path: &Utf8Path) -> io::Result<String> {
        fs::read_to_string(path)
    }

    fn write(&self, path: &Utf8Path, contents: &str) -> io::Result<()> {
        fs::write(path, contents)
    }
}

/// In-memory `SourceTree` for embedding and testing.
///
/// Contents are stored as raw bytes so undecodable files can be modeled.
/// Paths registered with [`InMemorySourceTree::with_read_only`] reject writes.
#[derive(Debug, Default)]
pub struct InMemorySourceTree {
    root: Utf8PathBuf,
    files: RefCell<BTreeMap<Utf8PathBuf, Vec<u8>>>,
    read_only: BTreeSet<Utf8PathBuf>,
    skipped: Vec<SkippedEntry>,
    writes: Cell<u64>,
}

impl InMemorySourceTree {
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Add a file at `rel` (relative to the root).
    pub fn with_file(self, rel: &str, contents: impl Into<Vec<u8>>) -> Self {
        self.files
            .borrow_mut()
            .insert(self.root.join(rel), contents.into());
        self
    }

    pub fn with_read_only(mut self, rel: &str) -> Self {
        self.read_only.insert(self.root.join(rel));
        self
    }

    /// Report `rel` as found by the walk but not readable as a path.
    pub fn with_skipped(mut self, rel: &str, reason: &str) -> Self {
        self.skipped.push(SkippedEntry {
            path: self.root.join(rel),
            reason: reason.to_string(),
        });
        self
    }

    /// Current contents of `rel`, if present and valid UTF-8.
    pub fn contents(&self, rel: &str) -> Option<String> {
        self.files
            .borrow()
            .get(&self.root.join(rel))
            .and_then(|b| String::from_utf8(b.clone()).ok())
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> u64 {
        self.writes.get()
    }
}

impl SourceTree for InMemorySourceTree {
    fn root(&self) -> &Utf8Path {
        &self.root
    }

    fn discover(&self, extension: &str) -> anyhow::Result<Discovery> {
        let suffix = format!(".{}", extension.trim_start_matches('.'));
        let files = self
            .files
            .borrow()
            .keys()
            .filter(|p| p.starts_with(&self.root) && p.as_str().ends_with(&suffix))
            .cloned()
            .collect();

        let mut skipped = self.skipped.clone();
        skipped.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(Discovery { files, skipped })
    }

    fn read_to_string(&self, path: &Utf8Path) -> io::Result<String> {
        let bytes = self
            .files
            .borrow()
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("{} not found", path)))?;
        String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    fn write(&self, path: &Utf8Path, contents: &str) -> io::Result<()> {
        if self.read_only.contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("{} is read-only", path),
            ));
        }
        self.files
            .borrow_mut()
            .insert(path.to_path_buf(), contents.as_bytes().to_vec());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}
