//! Effective lineage: inherited Goal / Project ownership
//!
//! An entity stores at most one direct anchor. Its *effective* project and
//! goal are found by walking up its own kind's `parent_id` chain until an
//! anchor of the wanted kind turns up. Inherited values are always computed
//! here and never written back into records.
//!
//! Every walk is an explicit loop with a `seen` set. Revisiting a node means
//! the stored data has a cycle; the walk stops and reports `None`. Anchors
//! that point at an id missing from the maps are skipped and the walk goes on.

use std::collections::HashSet;

use serde::Serialize;

use super::maps::{LineageMaps, NestedIndex};
use crate::domain::{Anchor, EntityRef, GoalId, MilestoneId, Nested, ProjectId, Task};

/// Walks up the same-kind chain from `start`, returning the first value `pick` yields
pub fn walk_up<T, R>(
    start: T::Id,
    index: &NestedIndex<'_, T>,
    mut pick: impl FnMut(&T) -> Option<R>,
) -> Option<R>
where
    T: Nested,
{
    let mut seen = HashSet::new();
    let mut current = index.get(start);

    while let Some(node) = current {
        if !seen.insert(node.id()) {
            tracing::debug!(id = ?node.id(), "cycle in parent chain, walk halted");
            return None;
        }
        if let Some(found) = pick(node) {
            return Some(found);
        }
        current = match node.parent_id() {
            Some(parent) if parent != node.id() => index.get(parent),
            _ => None,
        };
    }
    None
}

fn existing_goal(goal: Option<GoalId>, maps: &LineageMaps<'_>) -> Option<GoalId> {
    goal.filter(|id| {
        let found = maps.goals.contains_key(id);
        if !found {
            tracing::trace!(goal = %id, "skipping dangling goal anchor");
        }
        found
    })
}

fn existing_project(project: Option<ProjectId>, maps: &LineageMaps<'_>) -> Option<ProjectId> {
    project.filter(|id| {
        let found = maps.projects.contains(*id);
        if !found {
            tracing::trace!(project = %id, "skipping dangling project anchor");
        }
        found
    })
}

fn existing_milestone(milestone: Option<MilestoneId>, maps: &LineageMaps<'_>) -> Option<MilestoneId> {
    milestone.filter(|id| maps.milestones.contains(*id))
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

/// Direct parent project (a single hop)
pub fn project_effective_parent_id(id: ProjectId, maps: &LineageMaps<'_>) -> Option<ProjectId> {
    maps.project(id).and_then(|p| p.parent_id)
}

/// First goal found walking up the project chain
pub fn project_effective_goal_id(id: ProjectId, maps: &LineageMaps<'_>) -> Option<GoalId> {
    walk_up(id, &maps.projects, |p| existing_goal(p.goal_id, maps))
}

// ---------------------------------------------------------------------------
// Milestones
// ---------------------------------------------------------------------------

/// Direct parent milestone (a single hop)
pub fn milestone_effective_parent_id(id: MilestoneId, maps: &LineageMaps<'_>) -> Option<MilestoneId> {
    maps.milestone(id).and_then(|m| m.parent_id)
}

/// First project found walking up the milestone chain
pub fn effective_project_id(milestone: MilestoneId, maps: &LineageMaps<'_>) -> Option<ProjectId> {
    walk_up(milestone, &maps.milestones, |m| existing_project(m.project_id, maps))
}

/// Effective goal of a milestone.
///
/// The milestone's effective project is resolved first and, when that project
/// inherits a goal, the goal is taken from it. Otherwise the milestone chain is
/// walked for a direct goal anchor.
pub fn milestone_effective_goal_id(id: MilestoneId, maps: &LineageMaps<'_>) -> Option<GoalId> {
    effective_project_id(id, maps)
        .and_then(|project| project_effective_goal_id(project, maps))
        .or_else(|| walk_up(id, &maps.milestones, |m| existing_goal(m.goal_id, maps)))
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

pub fn task_effective_project_id(task: &Task, maps: &LineageMaps<'_>) -> Option<ProjectId> {
    match task.milestone_id {
        Some(milestone) => effective_project_id(milestone, maps),
        None => existing_project(task.project_id, maps),
    }
}

pub fn task_effective_goal_id(task: &Task, maps: &LineageMaps<'_>) -> Option<GoalId> {
    path_for_anchor(task.anchor(), maps).goal_id
}

/// Effective goal of any entity. A goal is its own effective goal.
pub fn effective_goal_id(entity: EntityRef, maps: &LineageMaps<'_>) -> Option<GoalId> {
    match entity {
        EntityRef::Mode(_) => None,
        EntityRef::Goal(id) => existing_goal(Some(id), maps),
        EntityRef::Project(id) => project_effective_goal_id(id, maps),
        EntityRef::Milestone(id) => milestone_effective_goal_id(id, maps),
        EntityRef::Task(id) => maps.task(id).and_then(|t| task_effective_goal_id(t, maps)),
    }
}

// ---------------------------------------------------------------------------
// Packed lineage
// ---------------------------------------------------------------------------

/// The full path implied by a single anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineagePath {
    pub goal_id: Option<GoalId>,
    pub project_id: Option<ProjectId>,
    pub milestone_id: Option<MilestoneId>,
}

/// Expands an anchor to the goal / project / milestone it implies
pub fn path_for_anchor(anchor: Anchor, maps: &LineageMaps<'_>) -> LineagePath {
    match anchor {
        Anchor::None => LineagePath::default(),
        Anchor::Goal(goal) => LineagePath {
            goal_id: existing_goal(Some(goal), maps),
            ..LineagePath::default()
        },
        Anchor::Project(project) => LineagePath {
            goal_id: project_effective_goal_id(project, maps),
            project_id: existing_project(Some(project), maps),
            milestone_id: None,
        },
        Anchor::Milestone(milestone) => LineagePath {
            goal_id: milestone_effective_goal_id(milestone, maps),
            project_id: effective_project_id(milestone, maps),
            milestone_id: existing_milestone(Some(milestone), maps),
        },
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectLineage {
    pub parent_id: Option<ProjectId>,
    pub goal_id: Option<GoalId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MilestoneLineage {
    pub parent_id: Option<MilestoneId>,
    pub project_id: Option<ProjectId>,
    pub goal_id: Option<GoalId>,
}

pub fn project_lineage(id: ProjectId, maps: &LineageMaps<'_>) -> ProjectLineage {
    ProjectLineage {
        parent_id: project_effective_parent_id(id, maps),
        goal_id: project_effective_goal_id(id, maps),
    }
}

pub fn milestone_lineage(id: MilestoneId, maps: &LineageMaps<'_>) -> MilestoneLineage {
    MilestoneLineage {
        parent_id: milestone_effective_parent_id(id, maps),
        project_id: effective_project_id(id, maps),
        goal_id: milestone_effective_goal_id(id, maps),
    }
}
