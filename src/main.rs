use clap::{Parser, Subcommand};

use commands::GlobalArgs;

mod commands;
mod output;
mod tty;

use commands::{apply, plan, scan, table, translit};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "cyrillize")]
#[command(version = VERSION)]
#[command(about = "Plan and apply Latin → Cyrillic renames across a directory tree")]
struct Cli {
    /// Mapping-table override (JSON with mapping_multi / mapping_single)
    #[arg(long, global = true, value_name = "FILE")]
    table: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Transliterate words with the effective mapping table
    Translit(translit::TranslitArgs),
    /// Show the effective mapping table and where it came from
    Table(table::TableArgs),
    /// Scan a directory and propose new names
    Scan(scan::ScanArgs),
    /// Inspect, edit and auto-resolve a saved plan
    Plan(plan::PlanArgs),
    /// Rename everything the saved plan asks for
    Apply(apply::ApplyArgs),
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    let global = GlobalArgs { table: cli.table };

    let (json_result, exit_code) = commands::run_json(cli.command, &global);
    let _ = output::print_json_result(json_result);

    std::process::ExitCode::from(exit_code_to_u8(exit_code))
}

fn exit_code_to_u8(code: i32) -> u8 {
    if code <= 0 {
        0
    } else if code >= 255 {
        255
    } else {
        code as u8
    }
}
