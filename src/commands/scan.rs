use clap::Args;
use serde::Serialize;

use cyrillize::plan::{recompute_conflicts, scan, session, ScanOptions};
use cyrillize::translit::Transliterator;

use super::{conflict_paths, entry_views, fs, session_path, CmdResult, EntryView, GlobalArgs, TableInfo};

#[derive(Args)]
pub struct ScanArgs {
    /// Directory to scan
    pub root: String,

    /// Save the plan to this session file for `plan` and `apply`
    #[arg(long)]
    pub session: Option<String>,

    /// Glob pattern to leave out (matched against name and relative path)
    #[arg(long, value_name = "GLOB")]
    pub exclude: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanOutput {
    pub command: &'static str,
    pub root: String,
    pub table: TableInfo,
    pub total: usize,
    pub to_rename: usize,
    pub conflicts: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<String>,
    pub entries: Vec<EntryView>,
}

pub fn run(args: ScanArgs, global: &GlobalArgs) -> CmdResult<ScanOutput> {
    let root = cyrillize::paths::expand(&args.root);
    let loaded = global.load_table();
    let translit = Transliterator::new(loaded.table.clone());
    let options = ScanOptions {
        exclude: args.exclude,
    };

    let local = fs();
    let plan = scan(&root, &translit, &options, &local)?;
    let conflicts = recompute_conflicts(&plan, &local);

    let saved = match args.session.as_deref() {
        Some(raw) => {
            let path = session_path(raw);
            session::save(&plan, &path)?;
            Some(path.display().to_string())
        }
        None => None,
    };

    Ok((
        ScanOutput {
            command: "scan",
            root: plan.root.display().to_string(),
            table: TableInfo::from(&loaded),
            total: plan.len(),
            to_rename: plan.entries().iter().filter(|e| e.is_eligible()).count(),
            conflicts: conflict_paths(&plan, &conflicts),
            session: saved,
            entries: entry_views(&plan, &conflicts),
        },
        0,
    ))
}
