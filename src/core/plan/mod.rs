//! Rename plan: the single owned collection every planning step works on.
//!
//! Flow:
//! 1. `scan` builds a fresh `Plan` from a directory tree
//! 2. `recompute_conflicts` derives the `ConflictSet` (call again after every edit)
//! 3. `auto_resolve` suffixes unlocked conflicting names
//! 4. `execute` applies the plan to disk, files first, directories deepest-first

mod conflicts;
mod execute;
mod resolve;
mod scan;
pub mod session;

pub use conflicts::{recompute_conflicts, ConflictSet};
pub use execute::execute;
pub use resolve::{auto_resolve, AutoResolveReport, UnresolvedEntry, MAX_SUFFIX};
pub use scan::{scan, ScanOptions};

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::paths;
use crate::utils::validation;

/// Position of an entry in its plan. Stable for the lifetime of the plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntryId(pub usize);

/// One file or directory under consideration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanEntry {
    /// Containing directory relative to the root, `/`-separated; empty for the root.
    pub parent_path: String,
    pub old_name: String,
    pub new_name: String,
    pub is_directory: bool,
    pub rename_requested: bool,
    pub locked: bool,
    /// Informational: the operator changed `new_name` by hand.
    pub modified: bool,
}

impl PlanEntry {
    pub fn new(
        parent_path: impl Into<String>,
        old_name: impl Into<String>,
        new_name: impl Into<String>,
        is_directory: bool,
    ) -> Self {
        let old_name = old_name.into();
        let new_name = new_name.into();
        Self {
            parent_path: parent_path.into(),
            rename_requested: new_name != old_name,
            old_name,
            new_name,
            is_directory,
            locked: false,
            modified: false,
        }
    }

    /// Produces a filesystem operation: requested and actually changes the name.
    pub fn is_eligible(&self) -> bool {
        self.rename_requested && self.new_name != self.old_name
    }

    /// Root-relative path of the original object.
    pub fn relative_path(&self) -> String {
        paths::join_relative(&self.parent_path, &self.old_name)
    }

    /// Root-relative path of the planned destination.
    pub fn relative_destination(&self) -> String {
        paths::join_relative(&self.parent_path, &self.new_name)
    }

    pub fn source_path(&self, root: &Path) -> PathBuf {
        paths::resolve_in(root, &self.parent_path, &self.old_name)
    }

    pub fn destination_path(&self, root: &Path) -> PathBuf {
        paths::resolve_in(root, &self.parent_path, &self.new_name)
    }

    /// Nesting depth of the original path (separators in `parent/old`).
    pub fn depth(&self) -> usize {
        self.relative_path().matches('/').count()
    }
}

/// All entries for one scanned root.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Plan {
    pub root: PathBuf,
    entries: Vec<PlanEntry>,
    /// (parent_path, old_name) → position
    index: HashMap<(String, String), EntryId>,
}

impl Plan {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Build a plan from existing entries, enforcing one entry per physical object.
    pub fn from_entries(root: impl Into<PathBuf>, entries: Vec<PlanEntry>) -> Result<Self> {
        let mut plan = Self::new(root);
        for entry in entries {
            plan.push(entry)?;
        }
        Ok(plan)
    }

    pub(crate) fn push(&mut self, entry: PlanEntry) -> Result<EntryId> {
        if entry.new_name.is_empty() {
            return Err(Error::validation_invalid_argument(
                "newName",
                "Name cannot be empty",
                Some(entry.relative_path()),
                None,
            ));
        }
        let key = (entry.parent_path.clone(), entry.old_name.clone());
        if self.index.contains_key(&key) {
            return Err(Error::validation_invalid_argument(
                "oldName",
                "Duplicate entry for the same object",
                Some(entry.relative_path()),
                None,
            ));
        }
        let id = EntryId(self.entries.len());
        self.index.insert(key, id);
        self.entries.push(entry);
        Ok(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[PlanEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntryId, &PlanEntry)> {
        self.entries.iter().enumerate().map(|(i, e)| (EntryId(i), e))
    }

    pub fn get(&self, id: EntryId) -> Option<&PlanEntry> {
        self.entries.get(id.0)
    }

    pub fn entry(&self, id: EntryId) -> Result<&PlanEntry> {
        self.get(id)
            .ok_or_else(|| Error::plan_entry_not_found(format!("#{}", id.0)))
    }

    fn entry_mut(&mut self, id: EntryId) -> Result<&mut PlanEntry> {
        self.entries
            .get_mut(id.0)
            .ok_or_else(|| Error::plan_entry_not_found(format!("#{}", id.0)))
    }

    pub fn find(&self, parent_path: &str, old_name: &str) -> Option<EntryId> {
        self.index
            .get(&(parent_path.to_string(), old_name.to_string()))
            .copied()
    }

    /// Look up by original root-relative path (`a/b/name`, `\` accepted as separator).
    pub fn find_by_path(&self, relative: &str) -> Result<EntryId> {
        let normalized = relative.replace('\\', "/");
        let normalized = normalized.trim_matches('/');
        let (parent, name) = match normalized.rsplit_once('/') {
            Some((parent, name)) => (parent, name),
            None => ("", normalized),
        };
        self.find(parent, name)
            .ok_or_else(|| Error::plan_entry_not_found(relative))
    }

    // ------------------------------------------------------------------
    // Mutators. Callers must recompute conflicts afterwards.
    // ------------------------------------------------------------------

    /// Override the destination name. Returns whether the name changed.
    pub fn set_new_name(&mut self, id: EntryId, name: &str) -> Result<bool> {
        let name = validation::require_plain_name(name, "newName")?.to_string();
        let entry = self.entry_mut(id)?;
        if entry.new_name == name {
            return Ok(false);
        }
        entry.new_name = name;
        entry.modified = true;
        Ok(true)
    }

    pub fn set_rename_requested(&mut self, id: EntryId, requested: bool) -> Result<()> {
        self.entry_mut(id)?.rename_requested = requested;
        Ok(())
    }

    pub fn set_locked(&mut self, id: EntryId, locked: bool) -> Result<()> {
        self.entry_mut(id)?.locked = locked;
        Ok(())
    }

    /// Auto-resolution rename: not a manual edit, so `modified` is untouched.
    pub(crate) fn assign_resolved_name(&mut self, id: EntryId, name: String) -> Result<()> {
        self.entry_mut(id)?.new_name = name;
        Ok(())
    }
}

/// Split a file name into stem and extension at the last dot.
///
/// Leading dots do not start an extension: `.bashrc` has none,
/// `archive.tar.gz` splits into `archive.tar` + `.gz`.
pub fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if name[..idx].chars().any(|c| c != '.') => (&name[..idx], &name[idx..]),
        _ => (name, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    fn sample_plan() -> Plan {
        Plan::from_entries(
            "/tmp/root",
            vec![
                PlanEntry::new("", "kot.txt", "кот.txt", false),
                PlanEntry::new("docs", "mir", "мир", true),
                PlanEntry::new("docs/mir", "privet.md", "привет.md", false),
            ],
        )
        .unwrap()
    }

    #[test]
    fn split_extension_cases() {
        assert_eq!(split_extension("privet.txt"), ("privet", ".txt"));
        assert_eq!(split_extension("archive.tar.gz"), ("archive.tar", ".gz"));
        assert_eq!(split_extension(".bashrc"), (".bashrc", ""));
        assert_eq!(split_extension("..."), ("...", ""));
        assert_eq!(split_extension("noext"), ("noext", ""));
        assert_eq!(split_extension("trailing."), ("trailing", "."));
        assert_eq!(split_extension("..hidden.txt"), ("..hidden", ".txt"));
    }

    #[test]
    fn new_entry_requests_rename_only_when_name_changes() {
        assert!(PlanEntry::new("", "a", "а", false).rename_requested);
        assert!(!PlanEntry::new("", "кот", "кот", false).rename_requested);
    }

    #[test]
    fn depth_counts_original_separators() {
        let plan = sample_plan();
        let depths: Vec<usize> = plan.entries().iter().map(PlanEntry::depth).collect();
        assert_eq!(depths, vec![0, 1, 2]);
    }

    #[test]
    fn find_by_path_resolves_nested_entries() {
        let plan = sample_plan();
        assert_eq!(plan.find_by_path("docs/mir/privet.md").unwrap(), EntryId(2));
        assert_eq!(plan.find_by_path("kot.txt").unwrap(), EntryId(0));
        assert_eq!(plan.find_by_path("docs\\mir").unwrap(), EntryId(1));
        assert_eq!(
            plan.find_by_path("missing").unwrap_err().code,
            ErrorCode::PlanEntryNotFound
        );
    }

    #[test]
    fn set_new_name_marks_modified_only_on_change() {
        let mut plan = sample_plan();
        assert!(!plan.set_new_name(EntryId(0), "кот.txt").unwrap());
        assert!(!plan.entries()[0].modified);

        assert!(plan.set_new_name(EntryId(0), "  котик.txt ").unwrap());
        assert_eq!(plan.entries()[0].new_name, "котик.txt");
        assert!(plan.entries()[0].modified);
    }

    #[test]
    fn set_new_name_rejects_empty_and_paths() {
        let mut plan = sample_plan();
        assert!(plan.set_new_name(EntryId(0), "   ").is_err());
        assert!(plan.set_new_name(EntryId(0), "a/b").is_err());
        assert_eq!(plan.entries()[0].new_name, "кот.txt");
    }

    #[test]
    fn flag_mutators_and_unknown_ids() {
        let mut plan = sample_plan();
        plan.set_locked(EntryId(1), true).unwrap();
        plan.set_rename_requested(EntryId(1), false).unwrap();
        assert!(plan.entries()[1].locked);
        assert!(!plan.entries()[1].is_eligible());

        let err = plan.set_locked(EntryId(99), true).unwrap_err();
        assert_eq!(err.code, ErrorCode::PlanEntryNotFound);
    }

    #[test]
    fn duplicate_objects_are_rejected() {
        let result = Plan::from_entries(
            "/tmp/root",
            vec![
                PlanEntry::new("", "kot.txt", "кот.txt", false),
                PlanEntry::new("", "kot.txt", "кот_1.txt", false),
            ],
        );
        assert!(result.is_err());
    }
}
