//! Candidate filter for editor option lists
//!
//! Given a partial [`Selection`], computes which goals, projects and
//! milestones may be offered as anchor targets:
//!
//! 1. Everything is scoped to `selection.mode_id`.
//! 2. With a goal selected, projects and milestones must have that goal as
//!    their effective goal.
//! 3. With a project selected, milestones must have the project (or one of
//!    its descendants) as their effective project. This takes precedence
//!    over the goal rule for milestones.
//! 4. When an existing project or milestone is being edited, it and its
//!    descendants are removed from the list of its own kind.
//!
//! An unknown mode yields three empty lists. Nothing here fails.

use serde::Serialize;

use super::cycle::is_descendant_or_self;
use super::effective::{effective_project_id, milestone_effective_goal_id, project_effective_goal_id};
use super::maps::LineageMaps;
use super::selection::Selection;
use crate::domain::{Datasets, EntityRef, Goal, Milestone, Project};

/// Knobs for [`filter_editor_options`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterOptions {
    /// Keep projects with no direct goal listed while a goal is selected
    pub keep_flat_to_mode_when_goal_selected: bool,

    /// The entity being edited, if any
    pub editing: Option<EntityRef>,
}

impl FilterOptions {
    pub fn editing(entity: EntityRef) -> Self {
        Self {
            editing: Some(entity),
            ..Self::default()
        }
    }
}

/// Candidate lists, in input order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilteredOptions<'a> {
    pub goals: Vec<&'a Goal>,
    pub projects: Vec<&'a Project>,
    pub milestones: Vec<&'a Milestone>,
}

impl FilteredOptions<'_> {
    pub fn is_empty(&self) -> bool {
        self.goals.is_empty() && self.projects.is_empty() && self.milestones.is_empty()
    }
}

/// An entry in a rendered option list: a real entity or a synthetic row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "item", rename_all = "snake_case")]
pub enum Choice<T> {
    /// "None" (clear the field)
    None,
    /// "Create new…"
    CreateNew,
    Item(T),
}

impl<T> Choice<T> {
    pub fn is_synthetic(&self) -> bool {
        !matches!(self, Choice::Item(_))
    }

    pub fn item(&self) -> Option<&T> {
        match self {
            Choice::Item(item) => Some(item),
            _ => None,
        }
    }
}

/// Keeps synthetic choices untouched and real ones where `keep` holds
pub fn retain_choices<T>(choices: Vec<Choice<T>>, mut keep: impl FnMut(&T) -> bool) -> Vec<Choice<T>> {
    choices
        .into_iter()
        .filter(|choice| match choice {
            Choice::Item(item) => keep(item),
            _ => true,
        })
        .collect()
}

/// Wraps filtered items into a choice list with optional leading synthetic rows
pub fn to_choices<T>(items: impl IntoIterator<Item = T>, with_none: bool, with_create: bool) -> Vec<Choice<T>> {
    let mut out = Vec::new();
    if with_none {
        out.push(Choice::None);
    }
    out.extend(items.into_iter().map(Choice::Item));
    if with_create {
        out.push(Choice::CreateNew);
    }
    out
}

/// True if `project` can be offered under `sel`
pub fn is_project_compatible(sel: &Selection, project: &Project, maps: &LineageMaps<'_>) -> bool {
    if project.mode_id != sel.mode_id {
        return false;
    }
    match sel.goal_id {
        None => true,
        Some(goal) => project_effective_goal_id(project.id, maps) == Some(goal),
    }
}

/// True if `milestone` can be offered under `sel`
pub fn is_milestone_compatible(sel: &Selection, milestone: &Milestone, maps: &LineageMaps<'_>) -> bool {
    if milestone.mode_id != sel.mode_id {
        return false;
    }
    if let Some(selected) = sel.project_id {
        return match effective_project_id(milestone.id, maps) {
            Some(owner) => is_descendant_or_self(owner, selected, maps.projects.by_id()),
            None => false,
        };
    }
    match sel.goal_id {
        None => true,
        Some(goal) => milestone_effective_goal_id(milestone.id, maps) == Some(goal),
    }
}

/// Computes the candidate lists for `sel`
pub fn filter_editor_options<'a>(sel: &Selection, data: &'a Datasets, opts: FilterOptions) -> FilteredOptions<'a> {
    let maps = LineageMaps::build(data);
    filter_with_maps(sel, data, &maps, opts)
}

/// As [`filter_editor_options`], reusing prebuilt maps over the same `data`
pub fn filter_with_maps<'a>(
    sel: &Selection,
    data: &'a Datasets,
    maps: &LineageMaps<'_>,
    opts: FilterOptions,
) -> FilteredOptions<'a> {
    let goals = data.goals.iter().filter(|g| g.mode_id == sel.mode_id).collect();

    let projects = data
        .projects
        .iter()
        .filter(|p| {
            if p.mode_id != sel.mode_id {
                return false;
            }
            if let Some(EntityRef::Project(editing)) = opts.editing {
                if is_descendant_or_self(p.id, editing, maps.projects.by_id()) {
                    return false;
                }
            }
            if opts.keep_flat_to_mode_when_goal_selected && sel.goal_id.is_some() && p.goal_id.is_none() {
                return true;
            }
            is_project_compatible(sel, p, maps)
        })
        .collect();

    let milestones = data
        .milestones
        .iter()
        .filter(|m| {
            if let Some(EntityRef::Milestone(editing)) = opts.editing {
                if is_descendant_or_self(m.id, editing, maps.milestones.by_id()) {
                    return false;
                }
            }
            is_milestone_compatible(sel, m, maps)
        })
        .collect();

    let filtered = FilteredOptions {
        goals,
        projects,
        milestones,
    };
    tracing::debug!(
        mode = %sel.mode_id,
        goals = filtered.goals.len(),
        projects = filtered.projects.len(),
        milestones = filtered.milestones.len(),
        "filtered editor options"
    );
    filtered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MilestoneId, ModeId, ProjectId};
    use crate::lineage::fixtures;

    fn project_ids(f: &FilteredOptions<'_>) -> Vec<u64> {
        f.projects.iter().map(|p| p.id.get()).collect()
    }

    fn milestone_ids(f: &FilteredOptions<'_>) -> Vec<u64> {
        f.milestones.iter().map(|m| m.id.get()).collect()
    }

    #[test]
    fn scopes_everything_to_mode() {
        let data = fixtures::sample();
        let filtered = filter_editor_options(&Selection::new(2u64), &data, FilterOptions::default());

        assert_eq!(filtered.goals.len(), 1);
        assert!(filtered.goals.iter().all(|g| g.mode_id == ModeId::new(2)));
        assert_eq!(project_ids(&filtered), vec![20]);
        assert_eq!(milestone_ids(&filtered), vec![200]);
    }

    #[test]
    fn unknown_mode_yields_empty_lists() {
        let data = fixtures::sample();
        let filtered = filter_editor_options(&Selection::new(42u64), &data, FilterOptions::default());
        assert!(filtered.is_empty());
    }

    #[test]
    fn goal_narrows_projects_and_milestones_by_effective_goal() {
        let data = fixtures::sample();
        let sel = Selection::new(1u64).with_goal(1u64);
        let filtered = filter_editor_options(&sel, &data, FilterOptions::default());

        assert_eq!(project_ids(&filtered), vec![10]);
        assert_eq!(milestone_ids(&filtered), vec![100, 101, 102]);
    }

    #[test]
    fn project_takes_precedence_for_milestones() {
        let data = fixtures::sample();
        let sel = Selection::new(1u64).with_goal(1u64).with_project(10u64);
        let filtered = filter_editor_options(&sel, &data, FilterOptions::default());

        // 102 is under goal 1 directly and has no project
        assert_eq!(milestone_ids(&filtered), vec![100, 101]);
    }

    #[test]
    fn milestones_under_sub_projects_are_included() {
        let mut data = fixtures::project_chain();
        data.milestones.push(fixtures::milestone(50, 1, None, Some(3), None));
        data.milestones.push(fixtures::milestone(51, 1, None, Some(4), None));

        let sel = Selection::new(1u64).with_project(1u64);
        let filtered = filter_editor_options(&sel, &data, FilterOptions::default());
        assert_eq!(milestone_ids(&filtered), vec![50]);
    }

    #[test]
    fn keep_flat_lists_unanchored_projects() {
        let data = fixtures::sample();
        let sel = Selection::new(1u64).with_goal(1u64);
        let opts = FilterOptions {
            keep_flat_to_mode_when_goal_selected: true,
            ..FilterOptions::default()
        };
        let filtered = filter_editor_options(&sel, &data, opts);
        assert_eq!(project_ids(&filtered), vec![10, 11]);
    }

    #[test]
    fn editing_excludes_self_and_descendants() {
        let data = fixtures::project_chain();
        let opts = FilterOptions::editing(EntityRef::Project(ProjectId::new(1)));
        let filtered = filter_editor_options(&Selection::new(1u64), &data, opts);
        assert_eq!(project_ids(&filtered), vec![4]);
    }

    #[test]
    fn editing_milestone_excludes_its_subtree() {
        let data = fixtures::sample();
        let opts = FilterOptions::editing(EntityRef::Milestone(MilestoneId::new(100)));
        let filtered = filter_editor_options(&Selection::new(1u64), &data, opts);
        assert_eq!(milestone_ids(&filtered), vec![102]);
    }

    #[test]
    fn dangling_selection_filters_to_nothing() {
        let data = fixtures::sample();
        let sel = Selection::new(1u64).with_project(999u64);
        let filtered = filter_editor_options(&sel, &data, FilterOptions::default());

        assert!(filtered.milestones.is_empty());
        assert!(!filtered.projects.iter().any(|p| p.id == ProjectId::new(999)));
    }

    #[test]
    fn compatibility_checks_match_filter() {
        let data = fixtures::sample();
        let maps = LineageMaps::build(&data);
        let sel = Selection::new(1u64).with_goal(1u64);

        assert!(is_project_compatible(&sel, maps.project(ProjectId::new(10)).unwrap(), &maps));
        assert!(!is_project_compatible(&sel, maps.project(ProjectId::new(11)).unwrap(), &maps));
        assert!(!is_project_compatible(&sel, maps.project(ProjectId::new(20)).unwrap(), &maps));
        assert!(is_milestone_compatible(&sel, maps.milestone(MilestoneId::new(102)).unwrap(), &maps));
    }

    #[test]
    fn synthetic_choices_pass_through() {
        let data = fixtures::sample();
        let choices = to_choices(data.projects.iter(), true, true);
        assert_eq!(choices.len(), 5);

        let kept = retain_choices(choices, |p| p.mode_id == ModeId::new(2));
        assert_eq!(kept.len(), 3);
        assert_eq!(kept[0], Choice::None);
        assert_eq!(kept[1].item().map(|p| p.id.get()), Some(20));
        assert!(kept[2].is_synthetic());
    }
}
