use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Entry returned from directory listing
#[derive(Debug, Clone)]
pub struct Entry {
    pub path: PathBuf,
    /// UTF-8 file name; `None` when the on-disk name is not valid UTF-8.
    pub name: Option<String>,
    pub is_dir: bool,
    pub is_symlink: bool,
}

/// Filesystem operations the planner and executor depend on.
pub trait FileSystem {
    /// Immediate children of `dir`.
    fn list(&self, dir: &Path) -> Result<Vec<Entry>>;
    /// Whether anything exists at `path`; a dangling symlink counts as present.
    fn exists(&self, path: &Path) -> bool;
    /// True when both paths reach one object that has a single name
    /// (e.g. two spellings on a case-insensitive volume). Hard-link aliases
    /// are separate names, so they are never the same object.
    fn same_object(&self, a: &Path, b: &Path) -> bool;
    /// Rename within the same parent directory.
    fn rename(&self, from: &Path, to: &Path) -> Result<()>;
}

/// Local filesystem implementation
pub struct LocalFs;

impl LocalFs {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFs {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem for LocalFs {
    fn list(&self, dir: &Path) -> Result<Vec<Entry>> {
        let entries = fs::read_dir(dir).map_err(|e| {
            Error::internal_io(e.to_string(), Some(format!("list {}", dir.display())))
        })?;

        let mut result = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            let is_symlink = entry.file_type().map(|t| t.is_symlink()).unwrap_or(false);
            let is_dir = path.is_dir();
            let name = entry.file_name().into_string().ok();
            result.push(Entry {
                path,
                name,
                is_dir,
                is_symlink,
            });
        }

        Ok(result)
    }

    fn exists(&self, path: &Path) -> bool {
        fs::symlink_metadata(path).is_ok()
    }

    fn same_object(&self, a: &Path, b: &Path) -> bool {
        if a == b {
            return true;
        }

        #[cfg(unix)]
        {
            use std::os::unix::fs::MetadataExt;
            if let (Ok(ma), Ok(mb)) = (fs::symlink_metadata(a), fs::symlink_metadata(b)) {
                return ma.dev() == mb.dev() && ma.ino() == mb.ino() && ma.nlink() == 1;
            }
            false
        }

        #[cfg(not(unix))]
        {
            match (fs::canonicalize(a), fs::canonicalize(b)) {
                (Ok(ca), Ok(cb)) => ca == cb,
                _ => false,
            }
        }
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        fs::rename(from, to).map_err(|e| {
            Error::rename_failed(
                from.display().to_string(),
                to.display().to_string(),
                e.to_string(),
            )
        })
    }
}

/// Convenience function to get local filesystem
pub fn local() -> LocalFs {
    LocalFs::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_local_fs_list() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();

        let mut entries = local().list(dir.path()).unwrap();
        entries.sort_by(|a, b| a.path.cmp(&b.path));

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name.as_deref(), Some("a.txt"));
        assert!(!entries[0].is_dir);
        assert!(entries[1].is_dir);
    }

    #[test]
    fn test_local_fs_rename_and_exists() {
        let dir = tempdir().unwrap();
        let from = dir.path().join("kot.txt");
        let to = dir.path().join("кот.txt");
        fs::write(&from, "meow").unwrap();

        let local_fs = local();
        local_fs.rename(&from, &to).unwrap();

        assert!(!local_fs.exists(&from));
        assert!(local_fs.exists(&to));
    }

    #[test]
    fn test_local_fs_rename_missing_source_fails() {
        let dir = tempdir().unwrap();
        let err = local()
            .rename(&dir.path().join("nope"), &dir.path().join("да"))
            .unwrap_err();
        assert_eq!(err.code.as_str(), "rename.failed");
    }

    #[test]
    fn test_same_object() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a");
        let b = dir.path().join("b");
        fs::write(&a, "").unwrap();
        fs::write(&b, "").unwrap();

        let local_fs = local();
        assert!(local_fs.same_object(&a, &a));
        assert!(!local_fs.same_object(&a, &b));
        assert!(!local_fs.same_object(&a, &dir.path().join("missing")));
        assert!(local_fs.same_object(&a, &dir.path().join(".").join("a")));
    }

    #[cfg(unix)]
    #[test]
    fn test_hard_link_is_not_the_same_object() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("kot.txt");
        let alias = dir.path().join("кот.txt");
        fs::write(&a, "").unwrap();
        fs::hard_link(&a, &alias).unwrap();

        assert!(!local().same_object(&alias, &a));
    }
}
