//! Typed identifiers for lineage entities
//!
//! Every entity kind gets its own id newtype so a `GoalId` can never be
//! passed where a `ProjectId` is expected. Ids are plain `u64` on the wire.
//!
//! References are written `{kind}:{id}` on the command line
//! (e.g. `milestone:101`, `project:3`).

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum IdError {
    #[error("Invalid id: expected a positive integer, got '{0}'")]
    InvalidId(String),

    #[error("Unknown entity kind '{0}' (expected mode, goal, project, milestone or task)")]
    UnknownKind(String),

    #[error("Invalid entity reference: expected '{{kind}}:{{id}}', got '{0}'")]
    InvalidRef(String),
}

fn parse_raw(s: &str) -> Result<u64, IdError> {
    let s = s.trim();
    match s.parse::<u64>() {
        Ok(0) | Err(_) => Err(IdError::InvalidId(s.to_string())),
        Ok(raw) => Ok(raw),
    }
}

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            pub const fn new(raw: u64) -> Self {
                Self(raw)
            }

            /// Returns the raw numeric id
            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                Self(raw)
            }
        }

        // Honours width and alignment flags
        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl FromStr for $name {
            type Err = IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                parse_raw(s).map(Self)
            }
        }
    };
}

entity_id!(
    /// Identifier of a Mode (top-level workspace)
    ModeId
);
entity_id!(
    /// Identifier of a Goal
    GoalId
);
entity_id!(
    /// Identifier of a Project
    ProjectId
);
entity_id!(
    /// Identifier of a Milestone
    MilestoneId
);
entity_id!(
    /// Identifier of a Task
    TaskId
);

/// Deserializes a nullable id column.
///
/// `null`, a missing field (with `#[serde(default)]`) and `0` all decode to `None`.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: From<u64>,
{
    let raw = Option::<u64>::deserialize(deserializer)?;
    Ok(raw.filter(|v| *v != 0).map(T::from))
}

/// The kinds of entity in the hierarchy, from the top down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Mode,
    Goal,
    Project,
    Milestone,
    Task,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Mode => "mode",
            EntityKind::Goal => "goal",
            EntityKind::Project => "project",
            EntityKind::Milestone => "milestone",
            EntityKind::Task => "task",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mode" => Ok(EntityKind::Mode),
            "goal" => Ok(EntityKind::Goal),
            "project" => Ok(EntityKind::Project),
            "milestone" => Ok(EntityKind::Milestone),
            "task" => Ok(EntityKind::Task),
            other => Err(IdError::UnknownKind(other.to_string())),
        }
    }
}

/// A reference to any entity: kind plus typed id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum EntityRef {
    Mode(ModeId),
    Goal(GoalId),
    Project(ProjectId),
    Milestone(MilestoneId),
    Task(TaskId),
}

impl EntityRef {
    pub fn kind(&self) -> EntityKind {
        match self {
            EntityRef::Mode(_) => EntityKind::Mode,
            EntityRef::Goal(_) => EntityKind::Goal,
            EntityRef::Project(_) => EntityKind::Project,
            EntityRef::Milestone(_) => EntityKind::Milestone,
            EntityRef::Task(_) => EntityKind::Task,
        }
    }

    /// Returns the raw numeric id regardless of kind
    pub fn raw(&self) -> u64 {
        match self {
            EntityRef::Mode(id) => id.get(),
            EntityRef::Goal(id) => id.get(),
            EntityRef::Project(id) => id.get(),
            EntityRef::Milestone(id) => id.get(),
            EntityRef::Task(id) => id.get(),
        }
    }

    pub fn new(kind: EntityKind, raw: u64) -> Self {
        match kind {
            EntityKind::Mode => EntityRef::Mode(ModeId(raw)),
            EntityKind::Goal => EntityRef::Goal(GoalId(raw)),
            EntityKind::Project => EntityRef::Project(ProjectId(raw)),
            EntityKind::Milestone => EntityRef::Milestone(MilestoneId(raw)),
            EntityKind::Task => EntityRef::Task(TaskId(raw)),
        }
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind(), self.raw())
    }
}

impl FromStr for EntityRef {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (kind, id) = s
            .split_once(':')
            .ok_or_else(|| IdError::InvalidRef(s.to_string()))?;
        let kind: EntityKind = kind.parse()?;
        let raw = parse_raw(id)?;
        Ok(EntityRef::new(kind, raw))
    }
}
