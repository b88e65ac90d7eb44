use super::{ConflictSet, EntryId, Plan, PlanEntry};
use crate::error::Error;
use crate::local_files::FileSystem;
use crate::output::ExecutionReport;

/// Apply every eligible, non-conflicting entry to disk.
///
/// Files go first, then directories deepest-first (depth of the original
/// path), so a pending child is always renamed before its parent moves.
/// Source and destination are re-checked right before each rename. A failing
/// entry is recorded and the batch continues; nothing is rolled back and the
/// plan is not modified.
pub fn execute(plan: &Plan, conflicts: &ConflictSet, fs: &dyn FileSystem) -> ExecutionReport {
    let mut report = ExecutionReport::new();

    for (id, entry) in execution_order(plan) {
        if !entry.rename_requested {
            report.record_skipped();
            continue;
        }

        let path = entry.relative_path();
        let from = entry.old_name.clone();
        let to = entry.new_name.clone();
        let source = entry.source_path(&plan.root);
        let destination = entry.destination_path(&plan.root);

        if conflicts.contains(id) {
            let err = Error::rename_conflict(&path, entry.relative_destination());
            log_status!("apply", "Skipping {}: {}", path, err.summary());
            report.record_error(path, from, to, &err);
            continue;
        }

        if entry.old_name == entry.new_name {
            report.record_skipped();
            continue;
        }

        if !fs.exists(&source) {
            let err = Error::rename_source_missing(&path, entry.relative_destination());
            log_status!("apply", "Skipping {}: {}", path, err.summary());
            report.record_error(path, from, to, &err);
            continue;
        }

        if fs.exists(&destination) {
            let err = Error::rename_destination_exists(&path, entry.relative_destination());
            log_status!("apply", "Skipping {}: {}", path, err.summary());
            report.record_error(path, from, to, &err);
            continue;
        }

        match fs.rename(&source, &destination) {
            Ok(()) => {
                log_status!("apply", "{} → {}", path, to);
                report.record_renamed(path, from, to);
            }
            Err(err) => {
                log_status!("apply", "Failed {}: {}", path, err.summary());
                report.record_error(path, from, to, &err);
            }
        }
    }

    log_status!(
        "apply",
        "Renamed {}, errors {}",
        report.renamed,
        report.errors
    );
    report
}

/// Files in plan order, then directories by descending depth (ties keep plan order).
fn execution_order(plan: &Plan) -> Vec<(EntryId, &PlanEntry)> {
    let (mut dirs, files): (Vec<_>, Vec<_>) = plan.iter().partition(|(_, e)| e.is_directory);
    dirs.sort_by(|(_, a), (_, b)| b.depth().cmp(&a.depth()));

    let mut ordered = files;
    ordered.extend(dirs);
    ordered
}
