use clap::Args;
use serde::Serialize;

use cyrillize::plan::execute;
use cyrillize::ExecutionReport;

use super::{conflict_paths, fs, load_session, CmdResult, GlobalArgs};

#[derive(Args)]
pub struct ApplyArgs {
    /// Session file written by `scan --session`
    #[arg(long)]
    pub session: String,

    /// Apply the rest of the plan even though some entries still conflict
    #[arg(long)]
    pub skip_conflicts: bool,

    /// Do not ask for confirmation
    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyOutput {
    pub command: &'static str,
    pub root: String,
    pub applied: bool,
    /// Conflicting entries that were skipped.
    pub conflicts: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<ExecutionReport>,
}

pub fn run(args: ApplyArgs, _global: &GlobalArgs) -> CmdResult<ApplyOutput> {
    let (_, plan, conflicts) = load_session(&args.session)?;
    let skipped = conflict_paths(&plan, &conflicts);

    if !conflicts.is_empty() && !args.skip_conflicts {
        return Err(cyrillize::Error::plan_unresolved_conflicts(skipped));
    }

    let pending = plan.entries().iter().filter(|e| e.is_eligible()).count();
    if !args.yes && crate::tty::require_tty_for_interactive() {
        let answer = crate::tty::prompt(&format!(
            "Rename {} item(s) under {} ({} conflicting skipped)? [y/N] ",
            pending.saturating_sub(skipped.len()),
            plan.root.display(),
            skipped.len()
        ))?;
        if !matches!(answer.to_lowercase().as_str(), "y" | "yes") {
            return Ok((
                ApplyOutput {
                    command: "apply",
                    root: plan.root.display().to_string(),
                    applied: false,
                    conflicts: skipped,
                    report: None,
                },
                0,
            ));
        }
    }

    let report = execute(&plan, &conflicts, &fs());
    let exit_code = if report.is_clean() { 0 } else { 1 };

    Ok((
        ApplyOutput {
            command: "apply",
            root: plan.root.display().to_string(),
            applied: true,
            conflicts: skipped,
            report: Some(report),
        },
        exit_code,
    ))
}
