//! Selection reconciler
//!
//! Every editor form funnels field changes through [`reconcile_after_change`]
//! so the four selection fields always describe one consistent ancestry path.
//!
//! | Change                | Result                                                    |
//! |-----------------------|-----------------------------------------------------------|
//! | `mode`                | goal, project and milestone cleared                       |
//! | `goal → value`        | goal set; project and milestone cleared                   |
//! | `goal → none`         | goal cleared                                              |
//! | `project → value`     | project set; goal = its effective goal; milestone cleared |
//! | `project → none`      | project cleared; an inherited goal and a dependent milestone cleared |
//! | `milestone → value`   | milestone set; project and goal = its effective lineage   |
//! | `milestone → none`    | milestone cleared                                         |
//!
//! A change that leaves its field unchanged is a no-op, which makes every
//! change idempotent. No cycle validation happens here: candidate lists
//! already exclude anything that would create one.

use serde::Serialize;

use super::cycle::is_descendant_or_self;
use super::effective::{effective_project_id, milestone_effective_goal_id, path_for_anchor, project_effective_goal_id};
use super::filter::{filter_with_maps, FilterOptions, FilteredOptions};
use super::maps::LineageMaps;
use super::selection::{Change, Selection};
use crate::domain::{Datasets, EntityRef};

/// Applies one field change to `prior`
pub fn reconcile_after_change(prior: &Selection, change: Change, data: &Datasets) -> Selection {
    let maps = LineageMaps::build(data);
    reconcile_with_maps(prior, change, &maps)
}

/// As [`reconcile_after_change`], reusing prebuilt maps
pub fn reconcile_with_maps(prior: &Selection, change: Change, maps: &LineageMaps<'_>) -> Selection {
    if change.is_noop_for(prior) {
        return *prior;
    }

    let mut next = *prior;
    match change {
        Change::Mode(mode) => {
            next.mode_id = mode;
            next.clear_ancestry();
        }
        Change::Goal(Some(goal)) => {
            next.goal_id = Some(goal);
            next.project_id = None;
            next.milestone_id = None;
        }
        Change::Goal(None) => next.goal_id = None,
        Change::Project(Some(project)) => {
            next.project_id = Some(project);
            next.goal_id = project_effective_goal_id(project, maps);
            next.milestone_id = None;
        }
        Change::Project(None) => {
            next.project_id = None;
            if let Some(cleared) = prior.project_id {
                // Only a goal that merely mirrored the project goes away
                let inherited = project_effective_goal_id(cleared, maps);
                if inherited.is_some() && inherited == prior.goal_id {
                    next.goal_id = None;
                }
                let dependent = prior
                    .milestone_id
                    .and_then(|ms| effective_project_id(ms, maps))
                    .is_some_and(|owner| is_descendant_or_self(owner, cleared, maps.projects.by_id()));
                if dependent {
                    next.milestone_id = None;
                }
            }
        }
        Change::Milestone(Some(milestone)) => {
            next.milestone_id = Some(milestone);
            if maps.milestone(milestone).is_some() {
                next.project_id = effective_project_id(milestone, maps);
                next.goal_id = milestone_effective_goal_id(milestone, maps);
            }
        }
        Change::Milestone(None) => next.milestone_id = None,
    }

    tracing::debug!(%change, ?prior, ?next, "reconciled selection");
    next
}

/// Applies one change to many selections
pub fn reconcile_batch(items: &[Selection], change: Change, data: &Datasets) -> Vec<Selection> {
    let maps = LineageMaps::build(data);
    items
        .iter()
        .map(|item| reconcile_with_maps(item, change, &maps))
        .collect()
}

/// Post-filter safety check: nulls any id not offered by `options`
pub fn sanitize(sel: &Selection, options: &FilteredOptions<'_>) -> Selection {
    let mut out = *sel;
    if let Some(goal) = out.goal_id {
        if !options.goals.iter().any(|g| g.id == goal) {
            tracing::debug!(%goal, "dropping goal missing from candidates");
            out.goal_id = None;
        }
    }
    if let Some(project) = out.project_id {
        if !options.projects.iter().any(|p| p.id == project) {
            tracing::debug!(%project, "dropping project missing from candidates");
            out.project_id = None;
        }
    }
    if let Some(milestone) = out.milestone_id {
        if !options.milestones.iter().any(|m| m.id == milestone) {
            tracing::debug!(%milestone, "dropping milestone missing from candidates");
            out.milestone_id = None;
        }
    }
    out
}

/// A reconciled selection together with the option lists built from it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reconciled<'a> {
    pub selection: Selection,
    pub options: FilteredOptions<'a>,
}

/// Filters against `selection` and runs the safety check until nothing drops.
///
/// Dropping a project puts milestones back under the goal rule, so a rebuild
/// can narrow a list as well as widen it. Each round clears at least one
/// field, so this stops after three rounds at most.
fn settle<'a>(
    mut selection: Selection,
    data: &'a Datasets,
    maps: &LineageMaps<'_>,
    opts: FilterOptions,
) -> Reconciled<'a> {
    loop {
        let options = filter_with_maps(&selection, data, maps, opts);
        let cleaned = sanitize(&selection, &options);
        if cleaned == selection {
            return Reconciled { selection, options };
        }
        selection = cleaned;
    }
}

/// `prior` with the field named by `change` cleared and nothing else touched
fn without_changed_field(prior: &Selection, change: Change) -> Selection {
    let mut out = *prior;
    match change {
        Change::Mode(_) => {}
        Change::Goal(_) => out.goal_id = None,
        Change::Project(_) => out.project_id = None,
        Change::Milestone(_) => out.milestone_id = None,
    }
    out
}

/// Reconciles `change`, then filters against the fresh selection and runs the
/// safety check.
///
/// Options are never computed from `prior`. If the safety check drops the
/// value `change` set, the change is rejected: its field is cleared and the
/// fields it would have derived keep their prior values.
pub fn apply_change<'a>(prior: &Selection, change: Change, data: &'a Datasets, opts: FilterOptions) -> Reconciled<'a> {
    let maps = LineageMaps::build(data);
    let reconciled = settle(reconcile_with_maps(prior, change, &maps), data, &maps, opts);

    if change.is_noop_for(&reconciled.selection) {
        return reconciled;
    }
    tracing::debug!(%change, "change dropped by safety check, keeping prior lineage");
    settle(without_changed_field(prior, change), data, &maps, opts)
}

/// Loads an existing entity's stored anchor into an editor selection.
///
/// Inherited goal / project fields are derived once here, on open. `None` if
/// the entity is not in the maps.
pub fn edit_selection(entity: EntityRef, maps: &LineageMaps<'_>) -> Option<Selection> {
    let (mode_id, anchor) = match entity {
        EntityRef::Mode(id) => return maps.mode(id).map(|m| Selection::new(m.id)),
        EntityRef::Goal(id) => return maps.goal(id).map(|g| Selection::new(g.mode_id)),
        EntityRef::Project(id) => maps.project(id).map(|p| (p.mode_id, p.anchor()))?,
        EntityRef::Milestone(id) => maps.milestone(id).map(|m| (m.mode_id, m.anchor()))?,
        EntityRef::Task(id) => maps.task(id).map(|t| (t.mode_id, t.anchor()))?,
    };
    let path = path_for_anchor(anchor, maps);
    Some(Selection {
        mode_id,
        goal_id: path.goal_id,
        project_id: path.project_id,
        milestone_id: path.milestone_id,
    })
}
