//! # Storage Layer
//!
//! The only filesystem code in the crate. The engine in [`crate::lineage`]
//! never touches disk; commands load a snapshot here and hand it over.
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Snapshot | JSON or YAML | `--data PATH` or `snapshot` in config |
//! | Config | TOML | `.lineage/config.toml` |
//! | Global config | TOML | platform config dir |

mod config;
pub mod snapshot;

pub use config::{Config, ConfigError, FilterConfig, GlobalConfig, OutputFormat, ProjectConfig, PROJECT_DIR};
pub use snapshot::{SnapshotError, SnapshotFormat};
