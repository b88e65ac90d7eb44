use serde::Serialize;
use std::path::PathBuf;

use cyrillize::defaults::{self, LoadedTable, TableSource};
use cyrillize::local_files::{self, LocalFs};
use cyrillize::paths;
use cyrillize::plan::{recompute_conflicts, session, ConflictSet, EntryId, Plan, PlanEntry};

pub type CmdResult<T> = cyrillize::Result<(T, i32)>;

pub(crate) struct GlobalArgs {
    /// Mapping-table override from `--table`.
    pub table: Option<String>,
}

impl GlobalArgs {
    /// Effective mapping table: `--table`, else the config dir file, else built-ins.
    pub fn load_table(&self) -> LoadedTable {
        let explicit = self.table.as_deref().map(paths::expand);
        defaults::load_table(explicit.as_deref())
    }
}

/// Where the table came from, plus the reason built-ins were used instead.
#[derive(Debug, Serialize)]
pub struct TableInfo {
    pub source: TableSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl From<&LoadedTable> for TableInfo {
    fn from(loaded: &LoadedTable) -> Self {
        Self {
            source: loaded.source.clone(),
            warning: loaded.warning.as_ref().map(|w| w.summary()),
        }
    }
}

/// One plan entry as shown to the operator.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryView {
    pub id: usize,
    pub path: String,
    #[serde(flatten)]
    pub entry: PlanEntry,
    pub conflict: bool,
}

pub fn entry_views(plan: &Plan, conflicts: &ConflictSet) -> Vec<EntryView> {
    plan.iter()
        .map(|(id, entry)| EntryView {
            id: id.0,
            path: entry.relative_path(),
            entry: entry.clone(),
            conflict: conflicts.contains(id),
        })
        .collect()
}

pub fn conflict_paths(plan: &Plan, conflicts: &ConflictSet) -> Vec<String> {
    conflicts
        .iter()
        .filter_map(|id: EntryId| plan.get(id).map(PlanEntry::relative_path))
        .collect()
}

pub fn session_path(raw: &str) -> PathBuf {
    paths::expand(raw)
}

/// Load a saved plan and recompute its conflicts against the current disk state.
pub fn load_session(raw: &str) -> cyrillize::Result<(PathBuf, Plan, ConflictSet)> {
    let path = session_path(raw);
    let plan = session::load(&path)?;
    let conflicts = recompute_conflicts(&plan, &fs());
    Ok((path, plan, conflicts))
}

pub fn fs() -> LocalFs {
    local_files::local()
}

pub mod apply;
pub mod plan;
pub mod scan;
pub mod table;
pub mod translit;

/// Dispatch a command to its handler and map result to JSON.
macro_rules! dispatch {
    ($args:expr, $global:expr, $module:ident) => {
        crate::output::map_cmd_result_to_json($module::run($args, $global))
    };
}

pub(crate) fn run_json(
    command: crate::Commands,
    global: &GlobalArgs,
) -> (cyrillize::Result<serde_json::Value>, i32) {
    crate::tty::status("cyrillize is working...");

    match command {
        crate::Commands::Translit(args) => dispatch!(args, global, translit),
        crate::Commands::Table(args) => dispatch!(args, global, table),
        crate::Commands::Scan(args) => dispatch!(args, global, scan),
        crate::Commands::Plan(args) => dispatch!(args, global, plan),
        crate::Commands::Apply(args) => dispatch!(args, global, apply),
    }
}
