use std::collections::HashSet;

use super::{split_extension, ConflictSet, EntryId, Plan};
use crate::error::{Error, Result};
use crate::local_files::FileSystem;
use crate::paths;

/// Highest numeric suffix tried before giving up on an entry.
pub const MAX_SUFFIX: u32 = 9999;

/// An entry auto-resolution could not fix.
#[derive(Debug, Clone)]
pub struct UnresolvedEntry {
    pub id: EntryId,
    pub error: Error,
}

#[derive(Debug, Clone, Default)]
pub struct AutoResolveReport {
    /// Entries whose `new_name` was changed.
    pub changed: usize,
    pub unresolved: Vec<UnresolvedEntry>,
}

/// Give every unlocked, requested, conflicting entry a free name.
///
/// The entry's current name is kept when nothing else in the parent plans it
/// and nothing else occupies it on disk; otherwise `stem_N.ext` is tried for
/// N = 1..=MAX_SUFFIX. Locked and non-requested entries are left for the
/// operator. Conflicts must be recomputed afterwards.
pub fn auto_resolve(plan: &mut Plan, conflicts: &ConflictSet, fs: &dyn FileSystem) -> AutoResolveReport {
    let mut report = AutoResolveReport::default();

    for id in conflicts.iter() {
        let Some(entry) = plan.get(id) else {
            continue;
        };
        if !entry.rename_requested || entry.locked {
            continue;
        }

        let current = entry.new_name.clone();
        match free_name(plan, id, fs) {
            Ok(candidate) if candidate != current => {
                log_status!(
                    "resolve",
                    "{}: {} → {}",
                    paths::join_relative(&entry.parent_path, &entry.old_name),
                    current,
                    candidate
                );
                if let Err(error) = plan.assign_resolved_name(id, candidate) {
                    report.unresolved.push(UnresolvedEntry { id, error });
                } else {
                    report.changed += 1;
                }
            }
            Ok(_) => {}
            Err(error) => {
                log_status!("resolve", "{}: {}", current, error.summary());
                report.unresolved.push(UnresolvedEntry { id, error });
            }
        }
    }

    report
}

fn free_name(plan: &Plan, id: EntryId, fs: &dyn FileSystem) -> Result<String> {
    let entry = plan.entry(id)?;

    // planned destinations count as occupied even if not yet executed
    let occupied: HashSet<&str> = plan
        .iter()
        .filter(|(other, e)| *other != id && e.parent_path == entry.parent_path)
        .map(|(_, e)| e.new_name.as_str())
        .collect();

    let is_free = |candidate: &str| {
        if occupied.contains(candidate) {
            return false;
        }
        let destination = paths::resolve_in(&plan.root, &entry.parent_path, candidate);
        !fs.exists(&destination) || fs.same_object(&destination, &entry.source_path(&plan.root))
    };

    if is_free(&entry.new_name) {
        return Ok(entry.new_name.clone());
    }

    let (stem, ext) = split_extension(&entry.new_name);
    (1..=MAX_SUFFIX)
        .map(|n| format!("{}_{}{}", stem, n, ext))
        .find(|candidate| is_free(candidate))
        .ok_or_else(|| Error::rename_suffix_exhausted(entry.new_name.clone(), MAX_SUFFIX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local_files::local;
    use crate::plan::{recompute_conflicts, PlanEntry};
    use std::collections::HashMap;
    use std::fs;
    use tempfile::tempdir;

    fn names(plan: &Plan) -> Vec<&str> {
        plan.entries().iter().map(|e| e.new_name.as_str()).collect()
    }

    #[test]
    fn first_conflicting_entry_gets_suffix_second_keeps_name() {
        let dir = tempdir().unwrap();
        let mut plan = Plan::from_entries(
            dir.path(),
            vec![
                PlanEntry::new("", "kot.txt", "кот.txt", false),
                PlanEntry::new("", "qot.txt", "кот.txt", false),
            ],
        )
        .unwrap();

        let conflicts = recompute_conflicts(&plan, &local());
        let report = auto_resolve(&mut plan, &conflicts, &local());

        assert_eq!(report.changed, 1);
        assert!(report.unresolved.is_empty());
        assert_eq!(names(&plan), vec!["кот_1.txt", "кот.txt"]);
        assert!(!plan.entries()[0].modified);
        assert!(recompute_conflicts(&plan, &local()).is_empty());
    }

    #[test]
    fn locked_entries_are_never_changed() {
        let dir = tempdir().unwrap();
        let mut plan = Plan::from_entries(
            dir.path(),
            vec![
                PlanEntry::new("", "kot.txt", "кот.txt", false),
                PlanEntry::new("", "qot.txt", "кот.txt", false),
            ],
        )
        .unwrap();
        plan.set_locked(EntryId(0), true).unwrap();

        let conflicts = recompute_conflicts(&plan, &local());
        auto_resolve(&mut plan, &conflicts, &local());

        assert_eq!(names(&plan), vec!["кот.txt", "кот_1.txt"]);
    }

    #[test]
    fn skips_names_taken_on_disk_and_by_non_renamed_entries() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("кот.txt"), "").unwrap();
        fs::write(dir.path().join("кот_1.txt"), "").unwrap();

        let mut plan = Plan::from_entries(
            dir.path(),
            vec![
                PlanEntry::new("", "kot.txt", "кот.txt", false),
                PlanEntry::new("", "kot2.txt", "кот_2.txt", false),
            ],
        )
        .unwrap();
        plan.set_rename_requested(EntryId(1), false).unwrap();

        let conflicts = recompute_conflicts(&plan, &local());
        assert!(conflicts.contains(EntryId(0)));

        let report = auto_resolve(&mut plan, &conflicts, &local());
        assert_eq!(report.changed, 1);
        assert_eq!(plan.entries()[0].new_name, "кот_3.txt");
    }

    #[test]
    fn suffix_goes_before_extension_and_only_last_dot() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("архив.tar.gz"), "").unwrap();

        let mut plan = Plan::from_entries(
            dir.path(),
            vec![PlanEntry::new("", "arkhiv.tar.gz", "архив.tar.gz", false)],
        )
        .unwrap();

        let conflicts = recompute_conflicts(&plan, &local());
        auto_resolve(&mut plan, &conflicts, &local());
        assert_eq!(plan.entries()[0].new_name, "архив.tar_1.gz");
    }

    #[cfg(unix)]
    #[test]
    fn hard_link_alias_counts_as_taken() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("kot.txt"), "").unwrap();
        fs::hard_link(dir.path().join("kot.txt"), dir.path().join("кот.txt")).unwrap();

        let mut plan = Plan::from_entries(
            dir.path(),
            vec![PlanEntry::new("", "kot.txt", "кот.txt", false)],
        )
        .unwrap();

        let conflicts = recompute_conflicts(&plan, &local());
        auto_resolve(&mut plan, &conflicts, &local());
        assert_eq!(plan.entries()[0].new_name, "кот_1.txt");
    }

    #[test]
    fn after_resolution_no_parent_shares_a_name() {
        let dir = tempdir().unwrap();
        let mut entries = Vec::new();
        for i in 0..5 {
            entries.push(PlanEntry::new("", format!("kot{}", "'".repeat(i)), "кот", false));
        }
        entries.push(PlanEntry::new("sub", "kot", "кот", false));
        let mut plan = Plan::from_entries(dir.path(), entries).unwrap();

        let conflicts = recompute_conflicts(&plan, &local());
        auto_resolve(&mut plan, &conflicts, &local());

        let mut seen: HashMap<(&str, &str), usize> = HashMap::new();
        for e in plan.entries() {
            *seen.entry((e.parent_path.as_str(), e.new_name.as_str())).or_default() += 1;
        }
        assert!(seen.values().all(|&n| n == 1));
        assert_eq!(plan.entries()[5].new_name, "кот");
    }

    #[test]
    fn exhausted_suffixes_are_reported_not_looped() {
        let dir = tempdir().unwrap();
        let mut entries = vec![
            PlanEntry::new("", "a", "x", false),
            PlanEntry::new("", "b", "x", false),
        ];
        for n in 1..=MAX_SUFFIX {
            let mut taken = PlanEntry::new("", format!("taken{}", n), format!("x_{}", n), false);
            taken.rename_requested = false;
            entries.push(taken);
        }
        let mut plan = Plan::from_entries(dir.path(), entries).unwrap();

        let conflicts = recompute_conflicts(&plan, &local());
        let report = auto_resolve(&mut plan, &conflicts, &local());

        assert_eq!(report.unresolved.len(), 2);
        assert_eq!(report.unresolved[0].id, EntryId(0));
        assert_eq!(
            report.unresolved[0].error.code.as_str(),
            "rename.suffix_exhausted"
        );
        assert_eq!(report.changed, 0);
    }
}
