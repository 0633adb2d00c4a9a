//! Shared snapshots for unit tests

use crate::domain::{Datasets, Goal, GoalId, Milestone, MilestoneId, Mode, ModeId, Project, ProjectId, Task};

pub fn mode(id: u64) -> Mode {
    Mode {
        id: ModeId::new(id),
        title: format!("Mode {}", id),
        position: 0,
    }
}

pub fn goal(id: u64, mode: u64) -> Goal {
    Goal {
        id: GoalId::new(id),
        mode_id: ModeId::new(mode),
        title: format!("Goal {}", id),
        position: 0,
        is_completed: false,
        due_date: None,
    }
}

pub fn project(id: u64, mode: u64, parent: Option<u64>, goal: Option<u64>) -> Project {
    let mut p = Project::new(id, mode, format!("Project {}", id));
    p.parent_id = parent.map(ProjectId::new);
    p.goal_id = goal.map(GoalId::new);
    p
}

pub fn milestone(id: u64, mode: u64, parent: Option<u64>, project: Option<u64>, goal: Option<u64>) -> Milestone {
    let mut m = Milestone::new(id, mode, format!("Milestone {}", id));
    m.parent_id = parent.map(MilestoneId::new);
    m.project_id = project.map(ProjectId::new);
    m.goal_id = goal.map(GoalId::new);
    m
}

/// Goal 1 → Project 10 → Milestone 100 → Milestone 101, all in mode 1.
///
/// Mode 2 holds Goal 2, Project 20 (under Goal 2) and Milestone 200 (under
/// Goal 2). Project 11 sits loose in mode 1; Milestone 102 sits directly
/// under Goal 1.
pub fn sample() -> Datasets {
    let mut task = Task::new(1000u64, 1u64, "Task under M2");
    task.milestone_id = Some(MilestoneId::new(101));

    Datasets {
        modes: vec![mode(1), mode(2)],
        goals: vec![goal(1, 1), goal(2, 2)],
        projects: vec![
            project(10, 1, None, Some(1)),
            project(11, 1, None, None),
            project(20, 2, None, Some(2)),
        ],
        milestones: vec![
            milestone(100, 1, None, Some(10), None),
            milestone(101, 1, Some(100), None, None),
            milestone(102, 1, None, None, Some(1)),
            milestone(200, 2, None, None, Some(2)),
        ],
        tasks: vec![task],
    }
}

/// Project A(1) → B(2, parent 1) → C(3, parent 2), plus a loose D(4), mode 1.
pub fn project_chain() -> Datasets {
    Datasets {
        modes: vec![mode(1)],
        goals: vec![goal(1, 1)],
        projects: vec![
            project(1, 1, None, Some(1)),
            project(2, 1, Some(1), None),
            project(3, 1, Some(2), None),
            project(4, 1, None, None),
        ],
        ..Datasets::default()
    }
}

/// Projects 1 → 2 → 1 form a loop; milestone 7 is its own parent.
pub fn cyclic() -> Datasets {
    Datasets {
        modes: vec![mode(1)],
        goals: vec![goal(1, 1)],
        projects: vec![project(1, 1, Some(2), None), project(2, 1, Some(1), None)],
        milestones: vec![milestone(7, 1, Some(7), None, None)],
        ..Datasets::default()
    }
}
