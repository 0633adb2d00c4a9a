//! Lineage CLI - resolve and reconcile entity lineage from a snapshot

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = lineage_engine::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
