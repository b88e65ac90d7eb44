use clap::{Args, Subcommand};
use serde::Serialize;

use cyrillize::plan::{auto_resolve, recompute_conflicts, session};

use super::{conflict_paths, entry_views, fs, load_session, CmdResult, EntryView, GlobalArgs};

#[derive(Args)]
pub struct PlanArgs {
    #[command(subcommand)]
    command: PlanCommand,
}

#[derive(Subcommand)]
enum PlanCommand {
    /// Show saved entries with their conflict flags
    Show {
        /// Session file written by `scan --session`
        #[arg(long)]
        session: String,
    },
    /// Change one entry, then recompute conflicts and save
    Edit {
        /// Original path of the entry, relative to the scanned root
        path: String,
        /// Session file written by `scan --session`
        #[arg(long)]
        session: String,
        /// New destination name
        #[arg(long)]
        name: Option<String>,
        /// Leave this entry untouched on apply
        #[arg(long, conflicts_with = "include")]
        skip: bool,
        /// Rename this entry on apply
        #[arg(long)]
        include: bool,
        /// Protect the name from auto-resolution
        #[arg(long, conflicts_with = "unlock")]
        lock: bool,
        /// Allow auto-resolution to change the name again
        #[arg(long)]
        unlock: bool,
    },
    /// Add numeric suffixes to unlocked conflicting entries, then save
    Resolve {
        /// Session file written by `scan --session`
        #[arg(long)]
        session: String,
    },
}

#[derive(Serialize)]
pub struct UnresolvedView {
    pub path: String,
    pub code: String,
    pub message: String,
}

#[derive(Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PlanOutput {
    pub command: &'static str,
    pub session: String,
    pub root: String,
    pub conflicts: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changed: Option<usize>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unresolved: Vec<UnresolvedView>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub entries: Vec<EntryView>,
}

pub fn run(args: PlanArgs, _global: &GlobalArgs) -> CmdResult<PlanOutput> {
    match args.command {
        PlanCommand::Show { session } => show(&session),
        PlanCommand::Edit {
            path,
            session,
            name,
            skip,
            include,
            lock,
            unlock,
        } => edit(&session, &path, name.as_deref(), flag(include, skip), flag(lock, unlock)),
        PlanCommand::Resolve { session } => resolve(&session),
    }
}

/// `--on` / `--off` pair to an optional setting.
fn flag(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

fn show(session_arg: &str) -> CmdResult<PlanOutput> {
    let (path, plan, conflicts) = load_session(session_arg)?;

    Ok((
        PlanOutput {
            command: "plan.show",
            session: path.display().to_string(),
            root: plan.root.display().to_string(),
            conflicts: conflict_paths(&plan, &conflicts),
            entries: entry_views(&plan, &conflicts),
            ..Default::default()
        },
        0,
    ))
}

fn edit(
    session_arg: &str,
    entry_path: &str,
    name: Option<&str>,
    requested: Option<bool>,
    locked: Option<bool>,
) -> CmdResult<PlanOutput> {
    if name.is_none() && requested.is_none() && locked.is_none() {
        return Err(cyrillize::Error::validation_missing_argument(vec![
            "--name".to_string(),
            "--skip/--include".to_string(),
            "--lock/--unlock".to_string(),
        ]));
    }

    let (path, mut plan, _) = load_session(session_arg)?;
    let id = plan.find_by_path(entry_path)?;

    if let Some(name) = name {
        plan.set_new_name(id, name)?;
    }
    if let Some(requested) = requested {
        plan.set_rename_requested(id, requested)?;
    }
    if let Some(locked) = locked {
        plan.set_locked(id, locked)?;
    }

    let conflicts = recompute_conflicts(&plan, &fs());
    session::save(&plan, &path)?;

    let entry = plan.entry(id)?;
    Ok((
        PlanOutput {
            command: "plan.edit",
            session: path.display().to_string(),
            root: plan.root.display().to_string(),
            conflicts: conflict_paths(&plan, &conflicts),
            entries: vec![EntryView {
                id: id.0,
                path: entry.relative_path(),
                entry: entry.clone(),
                conflict: conflicts.contains(id),
            }],
            ..Default::default()
        },
        0,
    ))
}

fn resolve(session_arg: &str) -> CmdResult<PlanOutput> {
    let (path, mut plan, conflicts) = load_session(session_arg)?;
    let local = fs();

    let report = auto_resolve(&mut plan, &conflicts, &local);
    let remaining = recompute_conflicts(&plan, &local);
    session::save(&plan, &path)?;

    let unresolved = report
        .unresolved
        .iter()
        .map(|u| UnresolvedView {
            path: plan
                .get(u.id)
                .map(|e| e.relative_path())
                .unwrap_or_default(),
            code: u.error.code.as_str().to_string(),
            message: u.error.message.clone(),
        })
        .collect();

    Ok((
        PlanOutput {
            command: "plan.resolve",
            session: path.display().to_string(),
            root: plan.root.display().to_string(),
            conflicts: conflict_paths(&plan, &remaining),
            changed: Some(report.changed),
            unresolved,
            entries: Vec::new(),
        },
        0,
    ))
}
