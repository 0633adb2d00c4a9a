//! # Command-Line Interface
//!
//! User-facing commands and output formatting.
//!
//! ## Commands
//!
//! | Group | Purpose | Examples |
//! |-------|---------|----------|
//! | Core | Project setup | `init` |
//! | Inspect | Effective lineage | `resolve`, `timer-path`, `breadcrumb` |
//! | Editor | Form state | `options`, `reconcile`, `payload`, `group-under` |
//! | Integrity | Snapshot checks | `audit` |
//!
//! ## Output Formats
//!
//! All commands support `--format`:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! ## Logging
//!
//! Logs go to stderr. `--verbose` raises the default level to debug;
//! `LINEAGE_LOG` overrides the filter and `LINEAGE_LOG_FORMAT=json` emits
//! JSON lines:
//! ```bash
//! LINEAGE_LOG=lineage_engine=trace lineage resolve milestone:101
//! ```
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod audit_cmd;
mod editor;
mod inspect;
mod output;

pub use app::{run, Cli, Commands, SelectionArgs};
pub use output::{Output, OutputFormat};
