//! Domain models for the lineage engine
//!
//! Contains the entity records and typed ids without any I/O concerns.

mod id;
mod entity;

pub use id::{nullable, EntityKind, EntityRef, GoalId, IdError, MilestoneId, ModeId, ProjectId, TaskId};
pub use entity::{Anchor, AnchorKind, Datasets, Goal, Milestone, Mode, Nested, Project, Task};
