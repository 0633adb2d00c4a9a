//! Lineage Engine - ancestry resolution and reconciliation for a
//! Mode / Goal / Project / Milestone / Task hierarchy
//!
//! Every entity stores at most one direct anchor. The engine resolves the
//! goal and project an entity inherits through its anchor chain, builds the
//! candidate lists an editor may offer, and keeps a four-field editor
//! selection consistent as any one field changes.

pub mod domain;
pub mod lineage;
pub mod storage;
pub mod cli;

pub use domain::{Anchor, Datasets, EntityKind, EntityRef, GoalId, MilestoneId, ModeId, ProjectId, TaskId};
pub use lineage::{Change, LineageMaps, Selection};
