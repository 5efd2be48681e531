//! Leaf-directory discovery

use crate::error::SourceError;
use fiscal_domain::{DocumentKind, SourceDocument};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// A directory without subdirectories: one output row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafDirectory {
    /// Full path
    pub path: PathBuf,
    /// Display name (final path component)
    pub name: String,
    /// Documents directly inside, sorted by file name
    pub documents: Vec<SourceDocument>,
    /// Set when the directory could not be listed
    pub listing_error: Option<String>,
}

impl LeafDirectory {
    /// Number of documents of one kind
    pub fn count(&self, kind: DocumentKind) -> usize {
        self.documents.iter().filter(|d| d.kind == kind).count()
    }
}

/// Finds leaf directories under a root
#[derive(Debug, Clone, Default)]
pub struct DirectoryScanner {
    include_hidden: bool,
}

impl DirectoryScanner {
    /// Create a scanner that skips hidden and office lock files
    pub fn new() -> Self {
        Self::default()
    }

    /// Also report files starting with `.` or `~$`
    pub fn with_hidden(mut self, include_hidden: bool) -> Self {
        self.include_hidden = include_hidden;
        self
    }

    /// Enumerate leaf directories, sorted by path
    ///
    /// Symlinks are not followed. A root without subdirectories is itself the
    /// only leaf. Subdirectories that cannot be listed still appear, with
    /// `listing_error` set.
    ///
    /// # Errors
    ///
    /// Only a root that is missing, not a directory or unreadable is an error.
    pub fn scan(&self, root: &Path) -> Result<Vec<LeafDirectory>, SourceError> {
        let metadata = fs::metadata(root).map_err(|e| SourceError::io(root, e))?;
        if !metadata.is_dir() {
            return Err(SourceError::io(
                root,
                io::Error::new(io::ErrorKind::InvalidInput, "not a directory"),
            ));
        }
        fs::read_dir(root).map_err(|e| SourceError::io(root, e))?;

        let mut leaves = Vec::new();
        for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    // The directory itself was yielded already; its listing is retried below
                    debug!(error = %e, "Walk error");
                    continue;
                }
            };
            if !entry.file_type().is_dir() {
                continue;
            }
            if let Some(leaf) = self.inspect(entry.path()) {
                leaves.push(leaf);
            }
        }

        leaves.sort_by(|a, b| a.path.cmp(&b.path));
        info!(root = %root.display(), leaves = leaves.len(), "Scan complete");
        Ok(leaves)
    }

    /// Build a leaf entry for `dir`, or `None` when it has subdirectories
    fn inspect(&self, dir: &Path) -> Option<LeafDirectory> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(directory = %dir.display(), error = %e, "Directory could not be listed");
                return Some(LeafDirectory {
                    path: dir.to_path_buf(),
                    name: display_name(dir),
                    documents: Vec::new(),
                    listing_error: Some(e.to_string()),
                });
            }
        };

        self.collect(dir, entries.map(|entry| entry.map(classify)))
    }

    /// Gather the documents of one listing, or `None` when it holds a subdirectory
    ///
    /// An entry that cannot be read is logged and skipped; the documents
    /// that could be read are kept.
    fn collect<I>(&self, dir: &Path, entries: I) -> Option<LeafDirectory>
    where
        I: IntoIterator<Item = io::Result<Entry>>,
    {
        let mut documents = Vec::new();
        for entry in entries {
            let path = match entry {
                Ok(Entry::Dir) => return None,
                Ok(Entry::File(path)) => path,
                Ok(Entry::Other) => continue,
                Err(e) => {
                    warn!(directory = %dir.display(), error = %e, "Directory entry could not be read, skipped");
                    continue;
                }
            };

            if !self.include_hidden && is_hidden(&path) {
                continue;
            }
            if let Some(kind) = DocumentKind::from_path(&path) {
                documents.push(SourceDocument { path, kind });
            }
        }

        documents.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));
        Some(LeafDirectory {
            path: dir.to_path_buf(),
            name: display_name(dir),
            documents,
            listing_error: None,
        })
    }
}

/// One directory entry, as far as leaf detection cares
#[derive(Debug)]
enum Entry {
    Dir,
    File(PathBuf),
    Other,
}

fn classify(entry: fs::DirEntry) -> Entry {
    match entry.file_type() {
        Ok(t) if t.is_dir() => Entry::Dir,
        Ok(t) if t.is_file() => Entry::File(entry.path()),
        Ok(_) => Entry::Other,
        Err(e) => {
            warn!(path = %entry.path().display(), error = %e, "File type unavailable");
            Entry::Other
        }
    }
}

fn display_name(dir: &Path) -> String {
    dir.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| dir.display().to_string())
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with('.') || n.starts_with("~$"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name() {
        assert_eq!(display_name(Path::new("/data/北京/2019")), "2019");
        assert_eq!(display_name(Path::new("/")), "/");
    }

    #[test]
    fn test_is_hidden() {
        assert!(is_hidden(Path::new("a/~$决算.xlsx")));
        assert!(is_hidden(Path::new("a/.DS_Store")));
        assert!(!is_hidden(Path::new("a/决算.xlsx")));
    }

    #[test]
    fn test_unreadable_entry_keeps_the_rest() {
        let entries = vec![
            Ok(Entry::File(PathBuf::from("/data/2019/决算.pdf"))),
            Err(io::Error::new(io::ErrorKind::Other, "stale handle")),
            Ok(Entry::File(PathBuf::from("/data/2019/附表.xlsx"))),
            Ok(Entry::Other),
        ];

        let leaf = DirectoryScanner::new().collect(Path::new("/data/2019"), entries).unwrap();
        assert_eq!(leaf.name, "2019");
        assert_eq!(leaf.documents.len(), 2);
        assert!(leaf.listing_error.is_none());
    }

    #[test]
    fn test_subdirectory_entry_is_not_a_leaf() {
        let entries = vec![
            Ok(Entry::File(PathBuf::from("/data/北京/说明.pdf"))),
            Err(io::Error::new(io::ErrorKind::Other, "stale handle")),
            Ok(Entry::Dir),
        ];
        assert!(DirectoryScanner::new().collect(Path::new("/data/北京"), entries).is_none());
    }
}
