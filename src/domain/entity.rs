//! Entity records for the Mode / Goal / Project / Milestone / Task hierarchy
//!
//! Records mirror the persisted row shape: an `id`, a `modeId`, and nullable
//! anchor columns. At most one anchor column should be set per row (the XOR
//! invariant); [`Anchor`] is the tagged form of that single anchor.
//!
//! Reads accept both `camelCase` and `snake_case` keys. Writes use `camelCase`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::id::{nullable, EntityKind, EntityRef, GoalId, MilestoneId, ModeId, ProjectId, TaskId};

/// The single direct ancestor of an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Anchor {
    #[default]
    None,
    Goal(GoalId),
    Project(ProjectId),
    Milestone(MilestoneId),
}

impl Anchor {
    pub fn kind(&self) -> Option<AnchorKind> {
        match self {
            Anchor::None => None,
            Anchor::Goal(_) => Some(AnchorKind::Goal),
            Anchor::Project(_) => Some(AnchorKind::Project),
            Anchor::Milestone(_) => Some(AnchorKind::Milestone),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Anchor::None)
    }

    pub fn goal_id(&self) -> Option<GoalId> {
        match self {
            Anchor::Goal(id) => Some(*id),
            _ => None,
        }
    }

    pub fn project_id(&self) -> Option<ProjectId> {
        match self {
            Anchor::Project(id) => Some(*id),
            _ => None,
        }
    }

    pub fn milestone_id(&self) -> Option<MilestoneId> {
        match self {
            Anchor::Milestone(id) => Some(*id),
            _ => None,
        }
    }

    /// The anchored entity, if any
    pub fn target(&self) -> Option<EntityRef> {
        match *self {
            Anchor::None => None,
            Anchor::Goal(id) => Some(EntityRef::Goal(id)),
            Anchor::Project(id) => Some(EntityRef::Project(id)),
            Anchor::Milestone(id) => Some(EntityRef::Milestone(id)),
        }
    }
}

impl std::fmt::Display for Anchor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.target() {
            Some(target) => write!(f, "{}", target),
            None => f.write_str("none"),
        }
    }
}

/// Kinds an anchor may point at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorKind {
    Goal,
    Project,
    Milestone,
}

impl EntityKind {
    /// Anchor kinds an entity of this kind may hold, nearest first.
    ///
    /// | Kind      | Anchors                       |
    /// |-----------|-------------------------------|
    /// | Mode      | -                             |
    /// | Goal      | -                             |
    /// | Project   | Project, Goal                 |
    /// | Milestone | Milestone, Project, Goal      |
    /// | Task      | Milestone, Project, Goal      |
    pub fn allowed_anchors(&self) -> &'static [AnchorKind] {
        match self {
            EntityKind::Mode | EntityKind::Goal => &[],
            EntityKind::Project => &[AnchorKind::Project, AnchorKind::Goal],
            EntityKind::Milestone | EntityKind::Task => {
                &[AnchorKind::Milestone, AnchorKind::Project, AnchorKind::Goal]
            }
        }
    }

    /// Returns true if this kind may nest under another entity of the same kind
    pub fn is_self_nestable(&self) -> bool {
        matches!(self, EntityKind::Project | EntityKind::Milestone)
    }

    pub fn allows(&self, anchor: AnchorKind) -> bool {
        self.allowed_anchors().contains(&anchor)
    }
}

/// An entity that may nest under another entity of its own kind
pub trait Nested {
    type Id: Copy + Ord + std::hash::Hash + std::fmt::Debug;

    fn id(&self) -> Self::Id;
    fn parent_id(&self) -> Option<Self::Id>;
}

/// A top-level workspace partition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mode {
    pub id: ModeId,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub position: i64,
}

/// A goal, always top-level inside its mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: GoalId,

    #[serde(alias = "mode_id")]
    pub mode_id: ModeId,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub position: i64,

    #[serde(default, alias = "is_completed")]
    pub is_completed: bool,

    #[serde(default, alias = "due_date", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
}

/// A project, directly under a parent project, a goal, or nothing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,

    #[serde(alias = "mode_id")]
    pub mode_id: ModeId,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub position: i64,

    #[serde(default, alias = "is_completed")]
    pub is_completed: bool,

    #[serde(default, alias = "due_date", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,

    #[serde(default, alias = "parent_id", deserialize_with = "nullable")]
    pub parent_id: Option<ProjectId>,

    #[serde(default, alias = "goal_id", deserialize_with = "nullable")]
    pub goal_id: Option<GoalId>,
}

impl Project {
    pub fn new(id: impl Into<ProjectId>, mode_id: impl Into<ModeId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            mode_id: mode_id.into(),
            title: title.into(),
            position: 0,
            is_completed: false,
            due_date: None,
            parent_id: None,
            goal_id: None,
        }
    }

    /// Direct anchor, parent project first
    pub fn anchor(&self) -> Anchor {
        if let Some(parent) = self.parent_id {
            Anchor::Project(parent)
        } else if let Some(goal) = self.goal_id {
            Anchor::Goal(goal)
        } else {
            Anchor::None
        }
    }

    /// Number of anchor columns set (more than one breaks the XOR invariant)
    pub fn anchor_count(&self) -> usize {
        usize::from(self.parent_id.is_some()) + usize::from(self.goal_id.is_some())
    }
}

impl Nested for Project {
    type Id = ProjectId;

    fn id(&self) -> ProjectId {
        self.id
    }

    fn parent_id(&self) -> Option<ProjectId> {
        self.parent_id
    }
}

/// A milestone, directly under a parent milestone, a project, a goal, or nothing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub id: MilestoneId,

    #[serde(alias = "mode_id")]
    pub mode_id: ModeId,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub position: i64,

    #[serde(default, alias = "is_completed")]
    pub is_completed: bool,

    #[serde(default, alias = "due_date", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,

    #[serde(default, alias = "parent_id", deserialize_with = "nullable")]
    pub parent_id: Option<MilestoneId>,

    #[serde(default, alias = "project_id", deserialize_with = "nullable")]
    pub project_id: Option<ProjectId>,

    #[serde(default, alias = "goal_id", deserialize_with = "nullable")]
    pub goal_id: Option<GoalId>,
}

impl Milestone {
    pub fn new(id: impl Into<MilestoneId>, mode_id: impl Into<ModeId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            mode_id: mode_id.into(),
            title: title.into(),
            position: 0,
            is_completed: false,
            due_date: None,
            parent_id: None,
            project_id: None,
            goal_id: None,
        }
    }

    /// Direct anchor, parent milestone first, then project, then goal
    pub fn anchor(&self) -> Anchor {
        if let Some(parent) = self.parent_id {
            Anchor::Milestone(parent)
        } else if let Some(project) = self.project_id {
            Anchor::Project(project)
        } else if let Some(goal) = self.goal_id {
            Anchor::Goal(goal)
        } else {
            Anchor::None
        }
    }

    pub fn anchor_count(&self) -> usize {
        usize::from(self.parent_id.is_some())
            + usize::from(self.project_id.is_some())
            + usize::from(self.goal_id.is_some())
    }
}

impl Nested for Milestone {
    type Id = MilestoneId;

    fn id(&self) -> MilestoneId {
        self.id
    }

    fn parent_id(&self) -> Option<MilestoneId> {
        self.parent_id
    }
}

/// A task, directly under a milestone, a project, a goal, or nothing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,

    #[serde(alias = "mode_id")]
    pub mode_id: ModeId,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub position: i64,

    #[serde(default, alias = "is_completed")]
    pub is_completed: bool,

    #[serde(default, alias = "due_date", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,

    #[serde(default, alias = "milestone_id", deserialize_with = "nullable")]
    pub milestone_id: Option<MilestoneId>,

    #[serde(default, alias = "project_id", deserialize_with = "nullable")]
    pub project_id: Option<ProjectId>,

    #[serde(default, alias = "goal_id", deserialize_with = "nullable")]
    pub goal_id: Option<GoalId>,
}

impl Task {
    pub fn new(id: impl Into<TaskId>, mode_id: impl Into<ModeId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            mode_id: mode_id.into(),
            title: title.into(),
            position: 0,
            is_completed: false,
            due_date: None,
            milestone_id: None,
            project_id: None,
            goal_id: None,
        }
    }

    /// Direct anchor, milestone first, then project, then goal
    pub fn anchor(&self) -> Anchor {
        if let Some(milestone) = self.milestone_id {
            Anchor::Milestone(milestone)
        } else if let Some(project) = self.project_id {
            Anchor::Project(project)
        } else if let Some(goal) = self.goal_id {
            Anchor::Goal(goal)
        } else {
            Anchor::None
        }
    }

    pub fn anchor_count(&self) -> usize {
        usize::from(self.milestone_id.is_some())
            + usize::from(self.project_id.is_some())
            + usize::from(self.goal_id.is_some())
    }
}

/// A read-only snapshot of every collection the engine works over
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Datasets {
    pub modes: Vec<Mode>,
    pub goals: Vec<Goal>,
    pub projects: Vec<Project>,
    pub milestones: Vec<Milestone>,
    pub tasks: Vec<Task>,
}

impl Datasets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of entities across all collections
    pub fn len(&self) -> usize {
        self.modes.len() + self.goals.len() + self.projects.len() + self.milestones.len() + self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
