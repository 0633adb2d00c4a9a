//! Main CLI application structure

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use super::output::{Output, OutputFormat};
use super::{audit_cmd, editor, inspect};
use crate::domain::{Datasets, EntityKind, EntityRef, GoalId, MilestoneId, ModeId, ProjectId};
use crate::lineage::{Change, Selection};
use crate::storage::{snapshot, Config};

#[derive(Parser)]
#[command(name = "lineage")]
#[command(author, version, about = "Resolve and reconcile goal / project / milestone lineage")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Snapshot file (JSON or YAML); defaults to `snapshot` in .lineage/config.toml
    #[arg(long, short = 'd', global = true, env = "LINEAGE_DATA")]
    pub data: Option<PathBuf>,

    /// Output format (defaults to the global config, then text)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable debug logging on stderr
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// A four-field editor selection given as flags
#[derive(Args, Debug, Clone)]
pub struct SelectionArgs {
    /// Mode id
    #[arg(long)]
    pub mode: ModeId,

    /// Selected goal id
    #[arg(long)]
    pub goal: Option<GoalId>,

    /// Selected project id
    #[arg(long)]
    pub project: Option<ProjectId>,

    /// Selected milestone id
    #[arg(long)]
    pub milestone: Option<MilestoneId>,
}

impl SelectionArgs {
    pub fn selection(&self) -> Selection {
        Selection {
            mode_id: self.mode,
            goal_id: self.goal,
            project_id: self.project,
            milestone_id: self.milestone,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a lineage project (.lineage/config.toml)
    Init {
        /// Path to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: String,

        /// Snapshot path to record in the config
        #[arg(long)]
        snapshot: Option<PathBuf>,
    },

    /// Show an entity's stored anchor and effective lineage
    Resolve {
        /// Entity reference, e.g. milestone:101
        entity: EntityRef,
    },

    /// List valid goal / project / milestone candidates for a selection
    Options {
        #[command(flatten)]
        selection: SelectionArgs,

        /// Entity being edited; it and its descendants are excluded
        #[arg(long)]
        editing: Option<EntityRef>,

        /// Keep projects with no direct goal while a goal is selected
        #[arg(long)]
        keep_flat: bool,
    },

    /// Apply field changes to a selection, in order
    Reconcile {
        #[command(flatten)]
        selection: SelectionArgs,

        /// Change as field=value or field=none (repeatable)
        #[arg(long = "change", short = 'c', required = true)]
        changes: Vec<Change>,

        /// Entity being edited; it and its descendants are never kept
        #[arg(long)]
        editing: Option<EntityRef>,

        /// Keep projects with no direct goal while a goal is selected
        #[arg(long)]
        keep_flat: bool,
    },

    /// Apply one change to every selection in a JSON file
    ReconcileBatch {
        /// JSON array of selections
        file: PathBuf,

        /// Change as field=value or field=none
        #[arg(long, short = 'c')]
        change: Change,
    },

    /// Collapse a selection into the stored anchor for an entity kind
    Payload {
        /// Kind of entity being saved
        #[arg(long, value_enum)]
        kind: EntityKind,

        #[command(flatten)]
        selection: SelectionArgs,
    },

    /// Anchor to store when grouping an entity of KIND under TARGET
    GroupUnder {
        /// Kind of entity being moved
        #[arg(long, value_enum)]
        kind: EntityKind,

        /// Target entity, or omit to ungroup
        target: Option<EntityRef>,
    },

    /// Resolve a timer target to its full path
    TimerPath {
        /// Entity reference, e.g. task:1000
        entity: EntityRef,
    },

    /// Print the ancestor titles of an entity
    Breadcrumb {
        /// Entity reference, e.g. task:1000
        entity: EntityRef,

        /// Only the direct anchor's title
        #[arg(long)]
        immediate: bool,
    },

    /// Check a snapshot for cycles, XOR violations and dangling or cross-mode anchors
    Audit {
        /// Exit with an error if anything is found
        #[arg(long)]
        strict: bool,
    },
}

/// Sets up tracing on stderr.
///
/// `LINEAGE_LOG` takes an `EnvFilter` directive; `LINEAGE_LOG_FORMAT=json`
/// switches to JSON lines.
fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("LINEAGE_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose {
            "lineage_engine=debug,info"
        } else {
            "lineage_engine=info,warn"
        })
    });

    let format = env::var("LINEAGE_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    // An already-installed subscriber is left in place
    let _ = match format.as_str() {
        "json" => registry
            .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
            .try_init(),
        _ => registry
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .try_init(),
    };
}

/// State shared by the commands that read a snapshot
pub struct Session {
    pub config: Config,
    pub data: Datasets,
}

impl Session {
    fn open(data_arg: Option<&Path>, config: Config) -> Result<Self> {
        let path = match data_arg {
            Some(path) => path.to_path_buf(),
            None => config.snapshot_path().context(
                "No snapshot given. Pass --data PATH or set `snapshot` in .lineage/config.toml",
            )?,
        };
        let data = snapshot::load(&path).with_context(|| format!("Failed to load snapshot {}", path.display()))?;
        Ok(Self { config, data })
    }
}

fn init(output: &Output, path: &str, snapshot: Option<PathBuf>) -> Result<()> {
    let root = Path::new(path);
    output.verbose_ctx("init", &format!("Initializing project at: {}", root.display()));
    let config = Config::init_project(root, snapshot)?;
    output.verbose_ctx("init", &format!("snapshot: {:?}", config.project.snapshot));
    output.success(&format!("Initialized lineage project at {}", root.display()));
    Ok(())
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::load()?;
    let format = cli.format.unwrap_or_else(|| config.global.default_format.into());
    let output = Output::new(format);
    output.verbose_ctx("startup", &format!("project root: {:?}", config.project_root));

    // Only commands that read data pay for loading the snapshot
    let data_arg = cli.data;
    let open = move || Session::open(data_arg.as_deref(), config);

    match cli.command {
        Commands::Init { path, snapshot } => init(&output, &path, snapshot)?,
        Commands::Resolve { entity } => inspect::resolve(&output, &open()?, entity)?,
        Commands::Options {
            selection,
            editing,
            keep_flat,
        } => editor::options(&output, &open()?, &selection, editing, keep_flat)?,
        Commands::Reconcile {
            selection,
            changes,
            editing,
            keep_flat,
        } => editor::reconcile(&output, &open()?, &selection, &changes, editing, keep_flat)?,
        Commands::ReconcileBatch { file, change } => editor::reconcile_batch(&output, &open()?, &file, change)?,
        Commands::Payload { kind, selection } => editor::payload(&output, &open()?, kind, &selection)?,
        Commands::GroupUnder { kind, target } => editor::group_under(&output, kind, target)?,
        Commands::TimerPath { entity } => inspect::timer_path(&output, &open()?, entity)?,
        Commands::Breadcrumb { entity, immediate } => inspect::breadcrumb(&output, &open()?, entity, immediate)?,
        Commands::Audit { strict } => audit_cmd::run(&output, &open()?, strict)?,
    }

    output.verbose_ctx("run", "command completed");
    Ok(())
}
