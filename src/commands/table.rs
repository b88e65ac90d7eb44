use clap::Args;
use serde::Serialize;

use cyrillize::defaults;
use cyrillize::translit::TableConfig;

use super::{CmdResult, GlobalArgs, TableInfo};

#[derive(Args)]
pub struct TableArgs {}

#[derive(Serialize)]
pub struct TableOutput {
    pub command: &'static str,
    pub table: TableInfo,
    /// Where a default override file is looked up.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_path: Option<String>,
    /// Effective table in the same shape as `translit_config.json`.
    pub mapping: TableConfig,
}

pub fn run(_args: TableArgs, global: &GlobalArgs) -> CmdResult<TableOutput> {
    let loaded = global.load_table();

    Ok((
        TableOutput {
            command: "table",
            table: TableInfo::from(&loaded),
            config_path: defaults::table_path()
                .ok()
                .map(|p| p.display().to_string()),
            mapping: loaded.table.to_config(),
        },
        0,
    ))
}
