//! Read-only lineage lookups (resolve, timer-path, breadcrumb)

use anyhow::{anyhow, Result};
use serde::Serialize;

use super::app::Session;
use super::output::{opt, Output};
use crate::domain::{Anchor, EntityRef, ModeId};
use crate::lineage::{self, LineageDisplay, LineageMaps, Selection, TimerPath, XorPayload};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Resolved<'a> {
    entity: EntityRef,
    title: &'a str,
    mode_id: ModeId,
    anchor: Anchor,
    anchor_count: usize,
    path: TimerPath,
    display: LineageDisplay,
    breadcrumb: String,
    children: Vec<EntityRef>,
    /// Selection an edit form opens with
    editor: Option<Selection>,
}

fn not_found(entity: EntityRef) -> anyhow::Error {
    anyhow!("{} not found in snapshot", entity)
}

/// Title, mode, stored anchor and anchor count of `entity`
fn stored<'a>(entity: EntityRef, maps: &LineageMaps<'a>) -> Option<(&'a str, ModeId, Anchor, usize)> {
    match entity {
        EntityRef::Mode(id) => maps.mode(id).map(|m| (m.title.as_str(), m.id, Anchor::None, 0)),
        EntityRef::Goal(id) => maps.goal(id).map(|g| (g.title.as_str(), g.mode_id, Anchor::None, 0)),
        EntityRef::Project(id) => maps
            .project(id)
            .map(|p| (p.title.as_str(), p.mode_id, p.anchor(), p.anchor_count())),
        EntityRef::Milestone(id) => maps
            .milestone(id)
            .map(|m| (m.title.as_str(), m.mode_id, m.anchor(), m.anchor_count())),
        EntityRef::Task(id) => maps
            .task(id)
            .map(|t| (t.title.as_str(), t.mode_id, t.anchor(), t.anchor_count())),
    }
}

/// Entities anchored directly to `entity`
fn children(entity: EntityRef, maps: &LineageMaps<'_>) -> Vec<EntityRef> {
    match entity {
        EntityRef::Goal(id) => maps.projects_under_goal(id).iter().copied().map(EntityRef::Project).collect(),
        EntityRef::Project(id) => maps
            .children_of_project(id)
            .iter()
            .copied()
            .map(EntityRef::Project)
            .chain(maps.milestones_under_project(id).iter().copied().map(EntityRef::Milestone))
            .collect(),
        EntityRef::Milestone(id) => maps
            .children_of_milestone(id)
            .iter()
            .copied()
            .map(EntityRef::Milestone)
            .collect(),
        EntityRef::Mode(_) | EntityRef::Task(_) => Vec::new(),
    }
}

pub fn resolve(output: &Output, session: &Session, entity: EntityRef) -> Result<()> {
    let maps = LineageMaps::build(&session.data);
    let (title, mode_id, anchor, anchor_count) = stored(entity, &maps).ok_or_else(|| not_found(entity))?;
    let path = lineage::to_timer_path(entity, &maps).ok_or_else(|| not_found(entity))?;

    let resolved = Resolved {
        entity,
        title,
        mode_id,
        anchor,
        anchor_count,
        path,
        display: lineage::derive_display(&XorPayload::from_anchor(anchor), &maps),
        breadcrumb: lineage::breadcrumb(entity, &maps, false),
        children: children(entity, &maps),
        editor: lineage::edit_selection(entity, &maps),
    };
    output.verbose_ctx("resolve", &format!("{} has {} direct children", entity, resolved.children.len()));

    if output.is_json() {
        output.data(&resolved);
        return Ok(());
    }

    println!("{}  {}", resolved.entity, resolved.title);
    output.field("mode", resolved.mode_id);
    output.field("anchor", resolved.anchor);
    if resolved.anchor_count > 1 {
        output.field("warning", format!("{} anchor columns set", resolved.anchor_count));
    }
    output.field("goal", opt(resolved.path.goal_id));
    output.field("project", opt(resolved.path.project_id));
    output.field("milestone", opt(resolved.path.milestone_id));
    if !resolved.breadcrumb.is_empty() {
        output.field("breadcrumb", &resolved.breadcrumb);
    }
    if !resolved.children.is_empty() {
        let list: Vec<String> = resolved.children.iter().map(ToString::to_string).collect();
        output.field("children", list.join(", "));
    }
    Ok(())
}

pub fn timer_path(output: &Output, session: &Session, entity: EntityRef) -> Result<()> {
    let maps = LineageMaps::build(&session.data);
    let path = lineage::to_timer_path(entity, &maps).ok_or_else(|| not_found(entity))?;

    if output.is_json() {
        output.data(&path);
        return Ok(());
    }

    output.field("mode", path.mode_id);
    output.field("goal", opt(path.goal_id));
    output.field("project", opt(path.project_id));
    output.field("milestone", opt(path.milestone_id));
    output.field("task", opt(path.task_id));
    Ok(())
}

pub fn breadcrumb(output: &Output, session: &Session, entity: EntityRef, immediate: bool) -> Result<()> {
    let maps = LineageMaps::build(&session.data);
    stored(entity, &maps).ok_or_else(|| not_found(entity))?;

    let crumb = lineage::breadcrumb(entity, &maps, immediate);
    if output.is_json() {
        output.data(&serde_json::json!({
            "entity": entity,
            "breadcrumb": crumb,
        }));
    } else {
        println!("{}", crumb);
    }
    Ok(())
}
