//! Id-indexed lookup maps over a [`Datasets`] snapshot
//!
//! Maps borrow the snapshot, so building them is a single O(n) pass with no
//! cloning. A fresh set is built per computation; callers that recompute
//! often should hold on to the maps for as long as the snapshot is unchanged.

use std::collections::HashMap;
use std::hash::Hash;

use crate::domain::{Anchor, Datasets, Goal, GoalId, Milestone, MilestoneId, Mode, ModeId, Nested, Project, ProjectId, Task, TaskId};

/// Builds an id → entity map. On duplicate ids the last entry wins.
pub fn build_by_id<'a, T, K>(items: &'a [T], key: impl Fn(&T) -> K) -> HashMap<K, &'a T>
where
    K: Eq + Hash,
{
    let mut by_id = HashMap::with_capacity(items.len());
    for item in items {
        by_id.insert(key(item), item);
    }
    by_id
}

/// Lookup and child index for a self-nesting kind (projects, milestones)
#[derive(Debug)]
pub struct NestedIndex<'a, T: Nested> {
    by_id: HashMap<T::Id, &'a T>,
    children: HashMap<T::Id, Vec<T::Id>>,
}

impl<'a, T: Nested> NestedIndex<'a, T> {
    pub fn build(items: &'a [T]) -> Self {
        let by_id = build_by_id(items, |item: &T| item.id());

        let mut children: HashMap<T::Id, Vec<T::Id>> = HashMap::new();
        for item in by_id.values() {
            if let Some(parent) = item.parent_id() {
                // A self-parent is not a child edge
                if parent != item.id() {
                    children.entry(parent).or_default().push(item.id());
                }
            }
        }
        for ids in children.values_mut() {
            ids.sort_unstable();
        }

        Self { by_id, children }
    }

    pub fn get(&self, id: T::Id) -> Option<&'a T> {
        self.by_id.get(&id).copied()
    }

    pub fn contains(&self, id: T::Id) -> bool {
        self.by_id.contains_key(&id)
    }

    pub fn by_id(&self) -> &HashMap<T::Id, &'a T> {
        &self.by_id
    }

    /// Direct children of `id`, ordered by id
    pub fn children(&self, id: T::Id) -> &[T::Id] {
        self.children.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = &'a T> + '_ {
        self.by_id.values().copied()
    }
}

/// Every lookup the lineage engine needs, built once per snapshot
#[derive(Debug)]
pub struct LineageMaps<'a> {
    pub modes: HashMap<ModeId, &'a Mode>,
    pub goals: HashMap<GoalId, &'a Goal>,
    pub projects: NestedIndex<'a, Project>,
    pub milestones: NestedIndex<'a, Milestone>,
    pub tasks: HashMap<TaskId, &'a Task>,

    /// Projects whose direct anchor is a goal
    pub projects_by_goal: HashMap<GoalId, Vec<ProjectId>>,

    /// Milestones whose direct anchor is a project
    pub milestones_by_project: HashMap<ProjectId, Vec<MilestoneId>>,
}

fn group_by<K, V, I>(pairs: I) -> HashMap<K, Vec<V>>
where
    K: Eq + Hash,
    V: Ord,
    I: IntoIterator<Item = (K, V)>,
{
    let mut out: HashMap<K, Vec<V>> = HashMap::new();
    for (key, value) in pairs {
        out.entry(key).or_default().push(value);
    }
    for values in out.values_mut() {
        values.sort_unstable();
        values.dedup();
    }
    out
}

impl<'a> LineageMaps<'a> {
    pub fn build(data: &'a Datasets) -> Self {
        let maps = Self {
            modes: build_by_id(&data.modes, |m| m.id),
            goals: build_by_id(&data.goals, |g| g.id),
            projects: NestedIndex::build(&data.projects),
            milestones: NestedIndex::build(&data.milestones),
            tasks: build_by_id(&data.tasks, |t| t.id),
            projects_by_goal: group_by(data.projects.iter().filter_map(|p| match p.anchor() {
                Anchor::Goal(goal) => Some((goal, p.id)),
                _ => None,
            })),
            milestones_by_project: group_by(data.milestones.iter().filter_map(|m| match m.anchor() {
                Anchor::Project(project) => Some((project, m.id)),
                _ => None,
            })),
        };
        tracing::trace!(
            goals = maps.goals.len(),
            projects = maps.projects.len(),
            milestones = maps.milestones.len(),
            tasks = maps.tasks.len(),
            "built lineage maps"
        );
        maps
    }

    pub fn goal(&self, id: GoalId) -> Option<&'a Goal> {
        self.goals.get(&id).copied()
    }

    pub fn project(&self, id: ProjectId) -> Option<&'a Project> {
        self.projects.get(id)
    }

    pub fn milestone(&self, id: MilestoneId) -> Option<&'a Milestone> {
        self.milestones.get(id)
    }

    pub fn task(&self, id: TaskId) -> Option<&'a Task> {
        self.tasks.get(&id).copied()
    }

    pub fn mode(&self, id: ModeId) -> Option<&'a Mode> {
        self.modes.get(&id).copied()
    }

    pub fn children_of_project(&self, id: ProjectId) -> &[ProjectId] {
        self.projects.children(id)
    }

    pub fn children_of_milestone(&self, id: MilestoneId) -> &[MilestoneId] {
        self.milestones.children(id)
    }

    /// Projects anchored directly to `goal`, ordered by id
    pub fn projects_under_goal(&self, goal: GoalId) -> &[ProjectId] {
        self.projects_by_goal.get(&goal).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Milestones anchored directly to `project`, ordered by id
    pub fn milestones_under_project(&self, project: ProjectId) -> &[MilestoneId] {
        self.milestones_by_project.get(&project).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lineage::fixtures;

    #[test]
    fn builds_lookup_for_every_kind() {
        let data = fixtures::sample();
        let maps = LineageMaps::build(&data);

        assert!(maps.goal(GoalId::new(1)).is_some());
        assert!(maps.project(ProjectId::new(10)).is_some());
        assert!(maps.milestone(MilestoneId::new(101)).is_some());
        assert!(maps.project(ProjectId::new(999)).is_none());
    }

    #[test]
    fn child_index_follows_parent_ids() {
        let data = fixtures::project_chain();
        let maps = LineageMaps::build(&data);

        assert_eq!(maps.projects.children(ProjectId::new(1)), &[ProjectId::new(2)]);
        assert_eq!(maps.projects.children(ProjectId::new(2)), &[ProjectId::new(3)]);
        assert!(maps.projects.children(ProjectId::new(3)).is_empty());
    }

    #[test]
    fn direct_anchor_indexes_skip_nested_entities() {
        let data = fixtures::sample();
        let maps = LineageMaps::build(&data);

        assert_eq!(maps.projects_under_goal(GoalId::new(1)), &[ProjectId::new(10)]);
        // 101 sits under milestone 100, not directly under the project
        assert_eq!(maps.milestones_under_project(ProjectId::new(10)), &[MilestoneId::new(100)]);
        assert_eq!(maps.children_of_milestone(MilestoneId::new(100)), &[MilestoneId::new(101)]);
        assert!(maps.projects_under_goal(GoalId::new(9)).is_empty());
    }

    #[test]
    fn self_parent_is_not_indexed_as_child() {
        let mut data = Datasets::new();
        let mut p = Project::new(5u64, 1u64, "Loop");
        p.parent_id = Some(ProjectId::new(5));
        data.projects.push(p);

        let maps = LineageMaps::build(&data);
        assert!(maps.projects.children(ProjectId::new(5)).is_empty());
    }

    #[test]
    fn duplicate_ids_keep_last_entry() {
        let mut data = Datasets::new();
        data.projects.push(Project::new(1u64, 1u64, "First"));
        data.projects.push(Project::new(1u64, 1u64, "Second"));

        let maps = LineageMaps::build(&data);
        assert_eq!(maps.projects.len(), 1);
        assert_eq!(maps.project(ProjectId::new(1)).map(|p| p.title.as_str()), Some("Second"));
    }
}
