//! Display-only lineage
//!
//! Editors show the goal and project an anchor implies even though the stored
//! record holds a single anchor. Nothing here is ever written back into a
//! [`Selection`](super::selection::Selection): the displayed goal of a nested
//! project is not its `goal_id`.

use std::collections::HashSet;

use serde::Serialize;

use super::effective::{effective_project_id, milestone_effective_goal_id, project_effective_goal_id};
use super::maps::LineageMaps;
use super::xor::XorPayload;
use crate::domain::{Anchor, EntityRef, GoalId, MilestoneId, ProjectId};

/// Which stored field the displayed lineage comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplaySource {
    Milestone,
    Project,
    Goal,
    None,
}

/// What to show beside an anchor picker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineageDisplay {
    pub source: DisplaySource,
    pub milestone_id: Option<MilestoneId>,
    pub project_id: Option<ProjectId>,
    pub goal_id: Option<GoalId>,
}

/// Expands a stored payload into its displayed lineage
pub fn derive_display(payload: &XorPayload, maps: &LineageMaps<'_>) -> LineageDisplay {
    match payload.anchor() {
        Anchor::Milestone(milestone) => LineageDisplay {
            source: DisplaySource::Milestone,
            milestone_id: Some(milestone),
            project_id: effective_project_id(milestone, maps),
            goal_id: milestone_effective_goal_id(milestone, maps),
        },
        Anchor::Project(project) => LineageDisplay {
            source: DisplaySource::Project,
            milestone_id: None,
            project_id: Some(project),
            goal_id: project_effective_goal_id(project, maps),
        },
        Anchor::Goal(goal) => LineageDisplay {
            source: DisplaySource::Goal,
            milestone_id: None,
            project_id: None,
            goal_id: Some(goal),
        },
        Anchor::None => LineageDisplay {
            source: DisplaySource::None,
            milestone_id: None,
            project_id: None,
            goal_id: None,
        },
    }
}

fn stored_anchor(entity: EntityRef, maps: &LineageMaps<'_>) -> Anchor {
    match entity {
        EntityRef::Mode(_) | EntityRef::Goal(_) => Anchor::None,
        EntityRef::Project(id) => maps.project(id).map_or(Anchor::None, |p| p.anchor()),
        EntityRef::Milestone(id) => maps.milestone(id).map_or(Anchor::None, |m| m.anchor()),
        EntityRef::Task(id) => maps.task(id).map_or(Anchor::None, |t| t.anchor()),
    }
}

fn anchor_title<'a>(anchor: Anchor, maps: &LineageMaps<'a>) -> Option<&'a str> {
    match anchor {
        Anchor::None => None,
        Anchor::Goal(id) => maps.goal(id).map(|g| g.title.as_str()),
        Anchor::Project(id) => maps.project(id).map(|p| p.title.as_str()),
        Anchor::Milestone(id) => maps.milestone(id).map(|m| m.title.as_str()),
    }
}

/// Ancestor titles of `entity`, outermost first, joined with `" | "`.
///
/// The path runs goal, then the project chain from its root, then the
/// milestone chain from its root, ending at the direct anchor. With
/// `immediate_only` only the direct anchor's title is returned. Unknown
/// entities and entities with no anchor give an empty string.
pub fn breadcrumb(entity: EntityRef, maps: &LineageMaps<'_>, immediate_only: bool) -> String {
    let anchor = stored_anchor(entity, maps);
    if immediate_only {
        return anchor_title(anchor, maps).unwrap_or_default().to_string();
    }

    let (milestone, project, goal) = match anchor {
        Anchor::None => return String::new(),
        Anchor::Goal(goal) => (None, None, Some(goal)),
        Anchor::Project(project) => (None, Some(project), project_effective_goal_id(project, maps)),
        Anchor::Milestone(milestone) => (
            Some(milestone),
            effective_project_id(milestone, maps),
            milestone_effective_goal_id(milestone, maps),
        ),
    };

    let mut parts: Vec<&str> = Vec::new();

    // Each chain is collected leaf-first and reversed on the way in
    let mut milestones = Vec::new();
    let mut seen = HashSet::new();
    let mut current = milestone.and_then(|id| maps.milestone(id));
    while let Some(node) = current {
        if !seen.insert(node.id) {
            break;
        }
        milestones.push(node.title.as_str());
        current = node.parent_id.and_then(|id| maps.milestone(id));
    }

    let mut projects = Vec::new();
    let mut seen = HashSet::new();
    let mut current = project.and_then(|id| maps.project(id));
    while let Some(node) = current {
        if !seen.insert(node.id) {
            break;
        }
        projects.push(node.title.as_str());
        current = node.parent_id.and_then(|id| maps.project(id));
    }

    if let Some(goal) = goal.and_then(|id| maps.goal(id)) {
        parts.push(goal.title.as_str());
    }
    parts.extend(projects.into_iter().rev());
    parts.extend(milestones.into_iter().rev());
    parts.join(" | ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TaskId;
    use crate::lineage::fixtures;

    #[test]
    fn milestone_payload_displays_inherited_lineage() {
        let data = fixtures::sample();
        let maps = LineageMaps::build(&data);
        let payload = XorPayload {
            milestone_id: Some(MilestoneId::new(101)),
            ..XorPayload::default()
        };

        let display = derive_display(&payload, &maps);
        assert_eq!(display.source, DisplaySource::Milestone);
        assert_eq!(display.project_id, Some(ProjectId::new(10)));
        assert_eq!(display.goal_id, Some(GoalId::new(1)));
    }

    #[test]
    fn nested_project_displays_goal_it_does_not_store() {
        let data = fixtures::project_chain();
        let maps = LineageMaps::build(&data);
        let project = maps.project(ProjectId::new(3)).unwrap();
        assert_eq!(project.goal_id, None);

        let payload = XorPayload::from_anchor(project.anchor());
        let display = derive_display(&payload, &maps);
        assert_eq!(display.source, DisplaySource::Project);
        assert_eq!(display.project_id, Some(ProjectId::new(2)));
        assert_eq!(display.goal_id, Some(GoalId::new(1)));
    }

    #[test]
    fn empty_payload_displays_nothing() {
        let data = fixtures::sample();
        let maps = LineageMaps::build(&data);
        let display = derive_display(&XorPayload::default(), &maps);

        assert_eq!(display.source, DisplaySource::None);
        assert!(display.goal_id.is_none() && display.project_id.is_none());
    }

    #[test]
    fn breadcrumb_runs_from_goal_to_anchor() {
        let data = fixtures::sample();
        let maps = LineageMaps::build(&data);
        let task = EntityRef::Task(TaskId::new(1000));

        assert_eq!(
            breadcrumb(task, &maps, false),
            "Goal 1 | Project 10 | Milestone 100 | Milestone 101"
        );
        assert_eq!(breadcrumb(task, &maps, true), "Milestone 101");
    }

    #[test]
    fn breadcrumb_survives_cycles() {
        let data = fixtures::cyclic();
        let maps = LineageMaps::build(&data);

        assert_eq!(breadcrumb(EntityRef::Project(ProjectId::new(1)), &maps, false), "Project 1 | Project 2");
        assert_eq!(breadcrumb(EntityRef::Milestone(MilestoneId::new(7)), &maps, false), "Milestone 7");
    }

    #[test]
    fn unanchored_entities_have_empty_breadcrumb() {
        let data = fixtures::sample();
        let maps = LineageMaps::build(&data);

        assert_eq!(breadcrumb(EntityRef::Goal(GoalId::new(1)), &maps, false), "");
        assert_eq!(breadcrumb(EntityRef::Project(ProjectId::new(11)), &maps, false), "");
        assert_eq!(breadcrumb(EntityRef::Task(TaskId::new(5)), &maps, true), "");
    }
}
