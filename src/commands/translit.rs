use clap::Args;
use serde::Serialize;

use cyrillize::translit::{has_cyrillic, Transliterator};

use super::{CmdResult, GlobalArgs, TableInfo};

#[derive(Args)]
pub struct TranslitArgs {
    /// Latin text to transliterate (one result per argument)
    #[arg(required = true)]
    pub text: Vec<String>,
}

#[derive(Serialize)]
pub struct TranslitItem {
    pub input: String,
    pub output: String,
    /// Input already contained Cyrillic; a file scan would leave it alone.
    pub already_cyrillic: bool,
}

#[derive(Serialize)]
pub struct TranslitOutput {
    pub command: &'static str,
    pub table: TableInfo,
    pub items: Vec<TranslitItem>,
}

pub fn run(args: TranslitArgs, global: &GlobalArgs) -> CmdResult<TranslitOutput> {
    let loaded = global.load_table();
    let translit = Transliterator::new(loaded.table.clone());

    let items = args
        .text
        .into_iter()
        .map(|input| TranslitItem {
            output: translit.transliterate(&input),
            already_cyrillic: has_cyrillic(&input),
            input,
        })
        .collect();

    Ok((
        TranslitOutput {
            command: "translit",
            table: TableInfo::from(&loaded),
            items,
        },
        0,
    ))
}
