use std::collections::HashMap;

use lineage_engine::domain::{Goal, Milestone, Mode, Project, Task};
use lineage_engine::lineage::{self, FilterOptions};
use lineage_engine::{Change, Datasets, EntityKind, EntityRef, GoalId, LineageMaps, MilestoneId, ModeId, ProjectId, Selection};
use proptest::prelude::*;
use proptest::sample::Index;

const GOALS: u64 = 4;

/// (mode, anchor choice, pick) per row; parents always point at a lower id
type Row = (u64, u8, Index);

fn rows(max: usize) -> impl Strategy<Value = Vec<Row>> {
    prop::collection::vec((1u64..=2, 0u8..4, any::<Index>()), 0..max)
}

fn build(projects: Vec<Row>, milestones: Vec<Row>, tasks: Vec<Row>) -> Datasets {
    let mut data = Datasets::new();
    data.modes = (1..=2)
        .map(|id| Mode {
            id: ModeId::new(id),
            title: format!("Mode {}", id),
            position: 0,
        })
        .collect();
    data.goals = (1..=GOALS)
        .map(|id| Goal {
            id: GoalId::new(id),
            mode_id: ModeId::new(1 + id % 2),
            title: format!("Goal {}", id),
            position: 0,
            is_completed: false,
            due_date: None,
        })
        .collect();

    let pick_goal = |pick: &Index| GoalId::new(1 + pick.index(GOALS as usize) as u64);

    for (i, (mode, choice, pick)) in projects.iter().enumerate() {
        let id = i as u64 + 1;
        let mut p = Project::new(id, *mode, format!("Project {}", id));
        match choice {
            1 => p.goal_id = Some(pick_goal(pick)),
            2 | 3 if i > 0 => p.parent_id = Some(ProjectId::new(1 + pick.index(i) as u64)),
            _ => {}
        }
        data.projects.push(p);
    }

    let project_count = data.projects.len();
    for (i, (mode, choice, pick)) in milestones.iter().enumerate() {
        let id = i as u64 + 1;
        let mut m = Milestone::new(id, *mode, format!("Milestone {}", id));
        match choice {
            1 => m.goal_id = Some(pick_goal(pick)),
            2 if project_count > 0 => m.project_id = Some(ProjectId::new(1 + pick.index(project_count) as u64)),
            3 if i > 0 => m.parent_id = Some(MilestoneId::new(1 + pick.index(i) as u64)),
            _ => {}
        }
        data.milestones.push(m);
    }

    let milestone_count = data.milestones.len();
    for (i, (mode, choice, pick)) in tasks.iter().enumerate() {
        let id = i as u64 + 1;
        let mut t = Task::new(id, *mode, format!("Task {}", id));
        match choice {
            1 => t.goal_id = Some(pick_goal(pick)),
            2 if project_count > 0 => t.project_id = Some(ProjectId::new(1 + pick.index(project_count) as u64)),
            3 if milestone_count > 0 => t.milestone_id = Some(MilestoneId::new(1 + pick.index(milestone_count) as u64)),
            _ => {}
        }
        data.tasks.push(t);
    }
    data
}

fn arb_datasets() -> impl Strategy<Value = Datasets> {
    (rows(10), rows(10), rows(6)).prop_map(|(p, m, t)| build(p, m, t))
}

fn arb_selection() -> impl Strategy<Value = Selection> {
    (
        1u64..=2,
        prop::option::of(1u64..=GOALS),
        prop::option::of(1u64..=10),
        prop::option::of(1u64..=10),
    )
        .prop_map(|(mode, goal, project, milestone)| Selection {
            mode_id: ModeId::new(mode),
            goal_id: goal.map(GoalId::new),
            project_id: project.map(ProjectId::new),
            milestone_id: milestone.map(MilestoneId::new),
        })
}

fn arb_change() -> impl Strategy<Value = Change> {
    prop_oneof![
        (1u64..=3).prop_map(|id| Change::Mode(ModeId::new(id))),
        prop::option::of(1u64..=GOALS + 1).prop_map(|id| Change::Goal(id.map(GoalId::new))),
        prop::option::of(1u64..=11).prop_map(|id| Change::Project(id.map(ProjectId::new))),
        prop::option::of(1u64..=11).prop_map(|id| Change::Milestone(id.map(MilestoneId::new))),
    ]
}

/// True if walking up from `candidate` reaches `ancestor` (generated chains are acyclic)
fn project_under(data: &Datasets, candidate: ProjectId, ancestor: ProjectId) -> bool {
    let parents: HashMap<ProjectId, Option<ProjectId>> = data.projects.iter().map(|p| (p.id, p.parent_id)).collect();
    let mut current = Some(candidate);
    while let Some(id) = current {
        if id == ancestor {
            return true;
        }
        current = parents.get(&id).copied().flatten();
    }
    false
}

fn milestone_under(data: &Datasets, candidate: MilestoneId, ancestor: MilestoneId) -> bool {
    let parents: HashMap<MilestoneId, Option<MilestoneId>> =
        data.milestones.iter().map(|m| (m.id, m.parent_id)).collect();
    let mut current = Some(candidate);
    while let Some(id) = current {
        if id == ancestor {
            return true;
        }
        current = parents.get(&id).copied().flatten();
    }
    false
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(256))]

    #[test]
    fn reconcile_is_idempotent(data in arb_datasets(), sel in arb_selection(), change in arb_change()) {
        let once = lineage::reconcile_after_change(&sel, change, &data);
        let twice = lineage::reconcile_after_change(&once, change, &data);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn mode_change_clears_ancestry(data in arb_datasets(), sel in arb_selection(), mode in 1u64..=3) {
        let out = lineage::reconcile_after_change(&sel, Change::Mode(ModeId::new(mode)), &data);
        prop_assert_eq!(out.mode_id, ModeId::new(mode));
        if sel.mode_id != ModeId::new(mode) {
            prop_assert!(out.is_empty());
        }
    }

    #[test]
    fn payload_sets_at_most_one_column(sel in arb_selection()) {
        let payload = lineage::build_xor_payload(&sel);
        let set = [payload.goal_id.is_some(), payload.project_id.is_some(), payload.milestone_id.is_some()]
            .iter()
            .filter(|&&b| b)
            .count();
        prop_assert!(set <= 1);
        prop_assert_eq!(set == 0, sel.is_empty());

        for kind in [EntityKind::Project, EntityKind::Milestone, EntityKind::Task] {
            let anchor = lineage::normalize_for(kind, &sel);
            if let Some(anchor_kind) = anchor.kind() {
                prop_assert!(kind.allows(anchor_kind));
            }
        }
    }

    #[test]
    fn options_stay_in_mode(data in arb_datasets(), sel in arb_selection()) {
        let options = lineage::filter_editor_options(&sel, &data, FilterOptions::default());
        prop_assert!(options.goals.iter().all(|g| g.mode_id == sel.mode_id));
        prop_assert!(options.projects.iter().all(|p| p.mode_id == sel.mode_id));
        prop_assert!(options.milestones.iter().all(|m| m.mode_id == sel.mode_id));
    }

    #[test]
    fn edited_project_never_offers_its_subtree(data in arb_datasets(), sel in arb_selection(), pick in any::<Index>()) {
        prop_assume!(!data.projects.is_empty());
        let editing = data.projects[pick.index(data.projects.len())].id;

        let options = lineage::filter_editor_options(&sel, &data, FilterOptions::editing(EntityRef::Project(editing)));
        for p in &options.projects {
            prop_assert!(!project_under(&data, p.id, editing), "{} offered while editing {}", p.id, editing);
        }
    }

    #[test]
    fn edited_project_subtree_never_survives_reconcile(
        data in arb_datasets(),
        sel in arb_selection(),
        pick in any::<Index>(),
    ) {
        prop_assume!(!data.projects.is_empty());
        let editing = data.projects[pick.index(data.projects.len())].id;
        let opts = FilterOptions::editing(EntityRef::Project(editing));

        for target in data.projects.iter().filter(|p| project_under(&data, p.id, editing)) {
            let out = lineage::apply_change(&sel, Change::Project(Some(target.id)), &data, opts);
            prop_assert_eq!(out.selection.project_id, None, "{} kept while editing {}", target.id, editing);
        }
    }

    #[test]
    fn edited_milestone_subtree_never_survives_reconcile(
        data in arb_datasets(),
        sel in arb_selection(),
        pick in any::<Index>(),
    ) {
        prop_assume!(!data.milestones.is_empty());
        let editing = data.milestones[pick.index(data.milestones.len())].id;
        let opts = FilterOptions::editing(EntityRef::Milestone(editing));

        for target in data.milestones.iter().filter(|m| milestone_under(&data, m.id, editing)) {
            let out = lineage::apply_change(&sel, Change::Milestone(Some(target.id)), &data, opts);
            prop_assert_eq!(out.selection.milestone_id, None, "{} kept while editing {}", target.id, editing);
        }
    }

    #[test]
    fn applied_change_only_keeps_offered_ids(data in arb_datasets(), sel in arb_selection(), change in arb_change()) {
        let out = lineage::apply_change(&sel, change, &data, FilterOptions::default());
        if let Some(goal) = out.selection.goal_id {
            prop_assert!(out.options.goals.iter().any(|g| g.id == goal));
        }
        if let Some(project) = out.selection.project_id {
            prop_assert!(out.options.projects.iter().any(|p| p.id == project));
        }
        if let Some(milestone) = out.selection.milestone_id {
            prop_assert!(out.options.milestones.iter().any(|m| m.id == milestone));
        }
    }

    #[test]
    fn timer_path_keeps_entity_mode(data in arb_datasets()) {
        let maps = LineageMaps::build(&data);
        for task in &data.tasks {
            let path = lineage::to_timer_path(EntityRef::Task(task.id), &maps);
            prop_assert!(path.is_some());
            if let Some(path) = path {
                prop_assert_eq!(path.mode_id, task.mode_id);
                prop_assert_eq!(path.task_id, Some(task.id));
            }
        }
    }

    #[test]
    fn audit_finds_no_cycles_in_forward_chains(data in arb_datasets()) {
        let report = lineage::audit(&data);
        prop_assert!(report.cycles.is_empty());
        prop_assert!(report.xor_violations.is_empty());
        prop_assert!(report.dangling.is_empty());
    }
}
