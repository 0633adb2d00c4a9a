//! Resolves a timer target to its full effective path

use serde::Serialize;

use super::effective::{effective_project_id, milestone_effective_goal_id, project_effective_goal_id};
use super::maps::LineageMaps;
use crate::domain::{EntityRef, GoalId, MilestoneId, ModeId, ProjectId, TaskId};

/// Every level a running timer is attributed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerPath {
    pub mode_id: ModeId,
    pub goal_id: Option<GoalId>,
    pub project_id: Option<ProjectId>,
    pub milestone_id: Option<MilestoneId>,
    pub task_id: Option<TaskId>,
}

impl TimerPath {
    fn mode(mode_id: ModeId) -> Self {
        Self {
            mode_id,
            goal_id: None,
            project_id: None,
            milestone_id: None,
            task_id: None,
        }
    }
}

/// `None` when the target entity is not in the maps
pub fn to_timer_path(target: EntityRef, maps: &LineageMaps<'_>) -> Option<TimerPath> {
    let path = match target {
        EntityRef::Mode(id) => TimerPath::mode(maps.mode(id)?.id),
        EntityRef::Goal(id) => {
            let goal = maps.goal(id)?;
            TimerPath {
                goal_id: Some(goal.id),
                ..TimerPath::mode(goal.mode_id)
            }
        }
        EntityRef::Project(id) => {
            let project = maps.project(id)?;
            TimerPath {
                goal_id: project_effective_goal_id(project.id, maps),
                project_id: Some(project.id),
                ..TimerPath::mode(project.mode_id)
            }
        }
        EntityRef::Milestone(id) => {
            let milestone = maps.milestone(id)?;
            TimerPath {
                goal_id: milestone_effective_goal_id(milestone.id, maps),
                project_id: effective_project_id(milestone.id, maps),
                milestone_id: Some(milestone.id),
                ..TimerPath::mode(milestone.mode_id)
            }
        }
        EntityRef::Task(id) => {
            let task = maps.task(id)?;
            let project_id = match task.milestone_id {
                Some(milestone) => effective_project_id(milestone, maps),
                None => task.project_id,
            };
            // A stored direct goal wins over anything derived
            let goal_id = task.goal_id.or_else(|| match (task.milestone_id, project_id) {
                (Some(milestone), _) => milestone_effective_goal_id(milestone, maps),
                (None, Some(project)) => project_effective_goal_id(project, maps),
                (None, None) => None,
            });
            TimerPath {
                goal_id,
                project_id,
                milestone_id: task.milestone_id,
                task_id: Some(task.id),
                ..TimerPath::mode(task.mode_id)
            }
        }
    };
    tracing::trace!(%target, ?path, "resolved timer path");
    Some(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Task;
    use crate::lineage::fixtures;

    #[test]
    fn task_under_nested_milestone_gets_full_path() {
        let data = fixtures::sample();
        let maps = LineageMaps::build(&data);

        let path = to_timer_path(EntityRef::Task(TaskId::new(1000)), &maps).unwrap();
        assert_eq!(
            path,
            TimerPath {
                mode_id: ModeId::new(1),
                goal_id: Some(GoalId::new(1)),
                project_id: Some(ProjectId::new(10)),
                milestone_id: Some(MilestoneId::new(101)),
                task_id: Some(TaskId::new(1000)),
            }
        );
    }

    #[test]
    fn task_direct_goal_wins() {
        let mut data = fixtures::sample();
        let mut task = Task::new(1001u64, 1u64, "Odd");
        task.project_id = Some(ProjectId::new(10));
        task.goal_id = Some(GoalId::new(2));
        data.tasks.push(task);
        let maps = LineageMaps::build(&data);

        let path = to_timer_path(EntityRef::Task(TaskId::new(1001)), &maps).unwrap();
        assert_eq!(path.goal_id, Some(GoalId::new(2)));
        assert_eq!(path.project_id, Some(ProjectId::new(10)));
    }

    #[test]
    fn goal_and_mode_targets() {
        let data = fixtures::sample();
        let maps = LineageMaps::build(&data);

        let path = to_timer_path(EntityRef::Goal(GoalId::new(2)), &maps).unwrap();
        assert_eq!(path.mode_id, ModeId::new(2));
        assert_eq!(path.goal_id, Some(GoalId::new(2)));
        assert!(path.project_id.is_none());

        let path = to_timer_path(EntityRef::Mode(ModeId::new(1)), &maps).unwrap();
        assert_eq!(path, TimerPath::mode(ModeId::new(1)));
    }

    #[test]
    fn unknown_target_has_no_path() {
        let data = fixtures::sample();
        let maps = LineageMaps::build(&data);
        assert!(to_timer_path(EntityRef::Milestone(MilestoneId::new(9)), &maps).is_none());
    }
}
