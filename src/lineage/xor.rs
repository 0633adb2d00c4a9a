//! Normalizer: collapse a selection into the single stored anchor
//!
//! Editor selections carry derived fields (a milestone's project and goal,
//! a project's goal). At submit time only the nearest one is stored, with
//! precedence Milestone > Project > Goal > none.

use serde::{Deserialize, Serialize};

use super::selection::Selection;
use crate::domain::{Anchor, AnchorKind, EntityKind, GoalId, MilestoneId, ProjectId};

/// The three anchor columns with at most one set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XorPayload {
    pub goal_id: Option<GoalId>,
    pub project_id: Option<ProjectId>,
    pub milestone_id: Option<MilestoneId>,
}

impl XorPayload {
    pub fn from_anchor(anchor: Anchor) -> Self {
        Self {
            goal_id: anchor.goal_id(),
            project_id: anchor.project_id(),
            milestone_id: anchor.milestone_id(),
        }
    }

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

    /// Number of non-null fields
    pub fn count_set(&self) -> usize {
        usize::from(self.goal_id.is_some())
            + usize::from(self.project_id.is_some())
            + usize::from(self.milestone_id.is_some())
    }
}

/// Keeps only the nearest anchor of `sel`
pub fn build_xor_payload(sel: &Selection) -> XorPayload {
    let full = XorPayload {
        goal_id: sel.goal_id,
        project_id: sel.project_id,
        milestone_id: sel.milestone_id,
    };
    XorPayload::from_anchor(full.anchor())
}

/// Picks the nearest anchor of `sel` that an entity of `kind` may hold.
///
/// For a project, `sel.project_id` is the parent project and any milestone
/// is ignored. For a milestone, `sel.milestone_id` is the parent milestone.
pub fn normalize_for(kind: EntityKind, sel: &Selection) -> Anchor {
    for allowed in kind.allowed_anchors() {
        let anchor = match allowed {
            AnchorKind::Milestone => sel.milestone_id.map(Anchor::Milestone),
            AnchorKind::Project => sel.project_id.map(Anchor::Project),
            AnchorKind::Goal => sel.goal_id.map(Anchor::Goal),
        };
        if let Some(anchor) = anchor {
            return anchor;
        }
    }
    Anchor::None
}

/// Stored anchor columns of a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPayload {
    pub parent_id: Option<ProjectId>,
    pub goal_id: Option<GoalId>,
}

/// Stored anchor columns of a milestone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MilestonePayload {
    pub parent_id: Option<MilestoneId>,
    pub project_id: Option<ProjectId>,
    pub goal_id: Option<GoalId>,
}

/// Stored anchor columns of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPayload {
    pub milestone_id: Option<MilestoneId>,
    pub project_id: Option<ProjectId>,
    pub goal_id: Option<GoalId>,
}

pub fn build_project_payload(sel: &Selection) -> ProjectPayload {
    let anchor = normalize_for(EntityKind::Project, sel);
    ProjectPayload {
        parent_id: anchor.project_id(),
        goal_id: anchor.goal_id(),
    }
}

pub fn build_milestone_payload(sel: &Selection) -> MilestonePayload {
    let anchor = normalize_for(EntityKind::Milestone, sel);
    MilestonePayload {
        parent_id: anchor.milestone_id(),
        project_id: anchor.project_id(),
        goal_id: anchor.goal_id(),
    }
}

pub fn build_task_payload(sel: &Selection) -> TaskPayload {
    let anchor = normalize_for(EntityKind::Task, sel);
    TaskPayload {
        milestone_id: anchor.milestone_id(),
        project_id: anchor.project_id(),
        goal_id: anchor.goal_id(),
    }
}

/// Anchor to store when grouping an entity of `kind` under `target`.
///
/// Returns `None` when the nesting table forbids it (a project under a
/// milestone, anything under a goal for a goal). `Anchor::None` ungroups.
pub fn group_under(kind: EntityKind, target: Anchor) -> Option<Anchor> {
    match target.kind() {
        None if kind.allowed_anchors().is_empty() => None,
        None => Some(Anchor::None),
        Some(anchor_kind) if kind.allows(anchor_kind) => Some(target),
        Some(_) => None,
    }
}
