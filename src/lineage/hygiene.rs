//! Mode hygiene for anchor fields
//!
//! Moving an entity to another mode leaves anchors pointing into the old one.
//! [`cleanse_by_mode`] nulls every anchor whose target is missing or lives in
//! a different mode.

use serde::{Deserialize, Serialize};

use crate::domain::{nullable, Datasets, GoalId, MilestoneId, ModeId, ProjectId};

/// Raw anchor columns as they arrive from a form or a batch request.
///
/// `parent_id` is a parent milestone; project parents travel in `project_id`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnchorFields {
    #[serde(default, alias = "goal_id", deserialize_with = "nullable")]
    pub goal_id: Option<GoalId>,

    #[serde(default, alias = "project_id", deserialize_with = "nullable")]
    pub project_id: Option<ProjectId>,

    #[serde(default, alias = "parent_id", deserialize_with = "nullable")]
    pub parent_id: Option<MilestoneId>,

    #[serde(default, alias = "milestone_id", deserialize_with = "nullable")]
    pub milestone_id: Option<MilestoneId>,
}

pub fn cleanse_by_mode(mode_id: ModeId, ids: AnchorFields, data: &Datasets) -> AnchorFields {
    let in_mode_milestone =
        |id: MilestoneId| data.milestones.iter().any(|m| m.id == id && m.mode_id == mode_id);

    let cleaned = AnchorFields {
        goal_id: ids
            .goal_id
            .filter(|id| data.goals.iter().any(|g| g.id == *id && g.mode_id == mode_id)),
        project_id: ids
            .project_id
            .filter(|id| data.projects.iter().any(|p| p.id == *id && p.mode_id == mode_id)),
        parent_id: ids.parent_id.filter(|id| in_mode_milestone(*id)),
        milestone_id: ids.milestone_id.filter(|id| in_mode_milestone(*id)),
    };

    if cleaned != ids {
        tracing::debug!(mode = %mode_id, before = ?ids, after = ?cleaned, "dropped cross-mode anchors");
    }
    cleaned
}
