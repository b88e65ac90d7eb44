use std::path::Path;

use super::{split_extension, Plan, PlanEntry};
use crate::error::{Error, Result};
use crate::local_files::{Entry, FileSystem};
use crate::paths;
use crate::translit::{has_cyrillic, Transliterator};

/// Optional scan filters.
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// Glob patterns matched against the entry name and its root-relative path.
    /// Excluded directories are not descended.
    pub exclude: Vec<String>,
}

impl ScanOptions {
    fn is_excluded(&self, name: &str, relative: &str) -> bool {
        self.exclude.iter().any(|pattern| {
            glob_match::glob_match(pattern, name) || glob_match::glob_match(pattern, relative)
        })
    }
}

/// Walk `root` (made absolute) and propose a new name for every file and directory below it.
///
/// Each directory's children are emitted (subdirectories, then files, each in
/// name order) before any of them is descended. Symlinks are listed but never
/// followed.
pub fn scan(
    root: &Path,
    translit: &Transliterator,
    options: &ScanOptions,
    fs: &dyn FileSystem,
) -> Result<Plan> {
    if !root.is_dir() {
        return Err(Error::validation_invalid_argument(
            "root",
            format!("'{}' is not a directory", root.display()),
            None,
            None,
        ));
    }

    // sessions are applied later, possibly from another working directory
    let root = std::fs::canonicalize(root).map_err(|e| {
        Error::internal_io(e.to_string(), Some(format!("resolve {}", root.display())))
    })?;

    log_status!("scan", "Scanning {}", root.display());

    let mut plan = Plan::new(&root);
    walk(&root, "", translit, options, fs, &mut plan)?;

    log_status!("scan", "Found {} entries", plan.len());
    Ok(plan)
}

fn walk(
    dir: &Path,
    rel_dir: &str,
    translit: &Transliterator,
    options: &ScanOptions,
    fs: &dyn FileSystem,
    plan: &mut Plan,
) -> Result<()> {
    let listing = match fs.list(dir) {
        Ok(listing) => listing,
        Err(err) if !rel_dir.is_empty() => {
            // unreadable subdirectory: keep its own entry, skip its children
            log_status!("scan", "Skipping {}: {}", dir.display(), err.summary());
            return Ok(());
        }
        Err(err) => return Err(err),
    };

    let mut children: Vec<(String, Entry)> = Vec::new();
    for entry in listing {
        match entry.name.clone() {
            Some(name) => children.push((name, entry)),
            None => log_status!(
                "scan",
                "Skipping non-UTF-8 name: {}",
                entry.path.display()
            ),
        }
    }
    children.retain(|(name, _)| !options.is_excluded(name, &paths::join_relative(rel_dir, name)));
    children.sort_by(|(a, ea), (b, eb)| eb.is_dir.cmp(&ea.is_dir).then_with(|| a.cmp(b)));

    for (name, entry) in &children {
        let new_name = propose_name(name, entry.is_dir, translit);
        plan.push(PlanEntry::new(rel_dir, name.clone(), new_name, entry.is_dir))?;
    }

    for (name, entry) in &children {
        if entry.is_dir && !entry.is_symlink {
            let child_rel = paths::join_relative(rel_dir, name);
            walk(&entry.path, &child_rel, translit, options, fs, plan)?;
        }
    }

    Ok(())
}

/// Names that already contain Cyrillic are left alone; files keep their extension.
pub(crate) fn propose_name(name: &str, is_dir: bool, translit: &Transliterator) -> String {
    if has_cyrillic(name) {
        return name.to_string();
    }

    if is_dir {
        return translit.transliterate(name);
    }

    let (stem, ext) = split_extension(name);
    format!("{}{}", translit.transliterate(stem), ext)
}
