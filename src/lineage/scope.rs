//! List scoping for timer and stats pickers
//!
//! Unlike the editor filter these narrow whole lists by the nearest selected
//! level: a milestone beats a project, a project beats a goal, and a goal
//! beats the bare mode. A context with no mode scopes everything away.

use serde::{Deserialize, Serialize};

use super::cycle::is_descendant_or_self;
use super::effective::{
    effective_project_id, milestone_effective_goal_id, project_effective_goal_id, task_effective_goal_id,
    task_effective_project_id,
};
use super::maps::LineageMaps;
use crate::domain::{nullable, Goal, GoalId, Milestone, MilestoneId, ModeId, Project, ProjectId, Task};

/// What a picker is currently scoped to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeCtx {
    /// `None` means no mode is chosen
    #[serde(default, alias = "mode_id", deserialize_with = "nullable")]
    pub mode_id: Option<ModeId>,

    #[serde(default, alias = "goal_id", deserialize_with = "nullable")]
    pub goal_id: Option<GoalId>,

    #[serde(default, alias = "project_id", deserialize_with = "nullable")]
    pub project_id: Option<ProjectId>,

    #[serde(default, alias = "milestone_id", deserialize_with = "nullable")]
    pub milestone_id: Option<MilestoneId>,
}

impl ScopeCtx {
    pub fn mode(mode_id: impl Into<ModeId>) -> Self {
        Self {
            mode_id: Some(mode_id.into()),
            ..Self::default()
        }
    }
}

pub fn scope_goals<'a>(goals: &'a [Goal], ctx: &ScopeCtx) -> Vec<&'a Goal> {
    let Some(mode) = ctx.mode_id else {
        return Vec::new();
    };
    goals.iter().filter(|g| g.mode_id == mode).collect()
}

pub fn scope_projects<'a>(projects: &'a [Project], ctx: &ScopeCtx, maps: &LineageMaps<'_>) -> Vec<&'a Project> {
    let Some(mode) = ctx.mode_id else {
        return Vec::new();
    };
    projects
        .iter()
        .filter(|p| p.mode_id == mode)
        .filter(|p| match ctx.goal_id {
            Some(goal) => project_effective_goal_id(p.id, maps) == Some(goal),
            None => true,
        })
        .collect()
}

pub fn scope_milestones<'a>(milestones: &'a [Milestone], ctx: &ScopeCtx, maps: &LineageMaps<'_>) -> Vec<&'a Milestone> {
    let Some(mode) = ctx.mode_id else {
        return Vec::new();
    };
    milestones
        .iter()
        .filter(|m| m.mode_id == mode)
        .filter(|m| {
            if let Some(selected) = ctx.project_id {
                return effective_project_id(m.id, maps)
                    .is_some_and(|owner| is_descendant_or_self(owner, selected, maps.projects.by_id()));
            }
            match ctx.goal_id {
                Some(goal) => milestone_effective_goal_id(m.id, maps) == Some(goal),
                None => true,
            }
        })
        .collect()
}

pub fn scope_tasks<'a>(tasks: &'a [Task], ctx: &ScopeCtx, maps: &LineageMaps<'_>) -> Vec<&'a Task> {
    let Some(mode) = ctx.mode_id else {
        return Vec::new();
    };
    tasks
        .iter()
        .filter(|t| t.mode_id == mode)
        .filter(|t| {
            if let Some(selected) = ctx.milestone_id {
                return t
                    .milestone_id
                    .is_some_and(|ms| is_descendant_or_self(ms, selected, maps.milestones.by_id()));
            }
            if let Some(selected) = ctx.project_id {
                return task_effective_project_id(t, maps)
                    .is_some_and(|owner| is_descendant_or_self(owner, selected, maps.projects.by_id()));
            }
            match ctx.goal_id {
                Some(goal) => task_effective_goal_id(t, maps) == Some(goal),
                None => true,
            }
        })
        .collect()
}
