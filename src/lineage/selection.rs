//! The four-field editor selection and single-field changes to it

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::{nullable, GoalId, IdError, MilestoneId, ModeId, ProjectId};

/// What an editor form currently has selected.
///
/// `goal_id` and `project_id` may hold values derived from a nearer
/// selection (a milestone's effective project, say). Use
/// [`build_xor_payload`](super::xor::build_xor_payload) to get the single
/// stored anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    #[serde(alias = "mode_id")]
    pub mode_id: ModeId,

    #[serde(default, alias = "goal_id", deserialize_with = "nullable")]
    pub goal_id: Option<GoalId>,

    #[serde(default, alias = "project_id", deserialize_with = "nullable")]
    pub project_id: Option<ProjectId>,

    #[serde(default, alias = "milestone_id", deserialize_with = "nullable")]
    pub milestone_id: Option<MilestoneId>,
}

impl Selection {
    /// An empty selection in `mode_id` (the "build" form defaults)
    pub fn new(mode_id: impl Into<ModeId>) -> Self {
        Self {
            mode_id: mode_id.into(),
            goal_id: None,
            project_id: None,
            milestone_id: None,
        }
    }

    pub fn with_goal(mut self, goal: impl Into<GoalId>) -> Self {
        self.goal_id = Some(goal.into());
        self
    }

    pub fn with_project(mut self, project: impl Into<ProjectId>) -> Self {
        self.project_id = Some(project.into());
        self
    }

    pub fn with_milestone(mut self, milestone: impl Into<MilestoneId>) -> Self {
        self.milestone_id = Some(milestone.into());
        self
    }

    /// Clears goal, project and milestone
    pub fn clear_ancestry(&mut self) {
        self.goal_id = None;
        self.project_id = None;
        self.milestone_id = None;
    }

    pub fn is_empty(&self) -> bool {
        self.goal_id.is_none() && self.project_id.is_none() && self.milestone_id.is_none()
    }
}

/// A change to exactly one selection field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum Change {
    Mode(ModeId),
    Goal(Option<GoalId>),
    Project(Option<ProjectId>),
    Milestone(Option<MilestoneId>),
}

impl Change {
    /// Returns true if applying this to `selection` would leave the field unchanged
    pub fn is_noop_for(&self, selection: &Selection) -> bool {
        match self {
            Change::Mode(mode) => *mode == selection.mode_id,
            Change::Goal(goal) => *goal == selection.goal_id,
            Change::Project(project) => *project == selection.project_id,
            Change::Milestone(milestone) => *milestone == selection.milestone_id,
        }
    }
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn show<T: fmt::Display>(v: &Option<T>) -> String {
            v.as_ref().map_or_else(|| "none".to_string(), ToString::to_string)
        }
        match self {
            Change::Mode(mode) => write!(f, "mode={}", mode),
            Change::Goal(goal) => write!(f, "goal={}", show(goal)),
            Change::Project(project) => write!(f, "project={}", show(project)),
            Change::Milestone(milestone) => write!(f, "milestone={}", show(milestone)),
        }
    }
}

/// Parses `field=value`, where value is an id or `none`
impl FromStr for Change {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (field, value) = s
            .split_once('=')
            .ok_or_else(|| IdError::InvalidRef(s.to_string()))?;
        let value = value.trim();
        let cleared = value.is_empty() || value.eq_ignore_ascii_case("none") || value.eq_ignore_ascii_case("null");

        match field.trim().to_ascii_lowercase().as_str() {
            "mode" => Ok(Change::Mode(value.parse()?)),
            "goal" if cleared => Ok(Change::Goal(None)),
            "goal" => Ok(Change::Goal(Some(value.parse()?))),
            "project" if cleared => Ok(Change::Project(None)),
            "project" => Ok(Change::Project(Some(value.parse()?))),
            "milestone" if cleared => Ok(Change::Milestone(None)),
            "milestone" => Ok(Change::Milestone(Some(value.parse()?))),
            other => Err(IdError::UnknownKind(other.to_string())),
        }
    }
}
