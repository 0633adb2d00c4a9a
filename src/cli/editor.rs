//! Editor-form commands (options, reconcile, payload, group-under)

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Serialize;

use super::app::{Session, SelectionArgs};
use super::output::{opt, Output};
use crate::domain::{Anchor, EntityKind, EntityRef};
use crate::lineage::xor::{build_milestone_payload, build_project_payload, build_task_payload};
use crate::lineage::{
    self, AnchorFields, Change, Choice, FilterOptions, FilteredOptions, LineageDisplay, LineageMaps, Selection,
    XorPayload,
};

fn print_list<T>(label: &str, items: Vec<&T>, row: impl Fn(&T) -> String) {
    println!("{} ({}):", label, items.len());
    for choice in lineage::filter::to_choices(items, true, false) {
        match choice {
            Choice::Item(item) => println!("  {}", row(item)),
            Choice::None => println!("  {:<8} (none)", "-"),
            Choice::CreateNew => {}
        }
    }
}

fn print_options(options: &FilteredOptions<'_>) {
    print_list("Goals", options.goals.clone(), |g| format!("{:<8} {}", g.id, g.title));
    print_list("Projects", options.projects.clone(), |p| format!("{:<8} {}", p.id, p.title));
    print_list("Milestones", options.milestones.clone(), |m| format!("{:<8} {}", m.id, m.title));
}

fn print_selection(output: &Output, sel: &Selection) {
    output.field("mode", sel.mode_id);
    output.field("goal", opt(sel.goal_id));
    output.field("project", opt(sel.project_id));
    output.field("milestone", opt(sel.milestone_id));
}

fn filter_options(session: &Session, keep_flat: bool, editing: Option<EntityRef>) -> FilterOptions {
    let mut opts = session.config.project.filter.options();
    opts.keep_flat_to_mode_when_goal_selected |= keep_flat;
    opts.editing = editing;
    opts
}

pub fn options(
    output: &Output,
    session: &Session,
    args: &SelectionArgs,
    editing: Option<EntityRef>,
    keep_flat: bool,
) -> Result<()> {
    let selection = args.selection();
    let opts = filter_options(session, keep_flat, editing);
    let options = lineage::filter_editor_options(&selection, &session.data, opts);
    output.verbose_ctx("options", &format!("filter options: {:?}", opts));

    if output.is_json() {
        output.data(&options);
    } else if options.is_empty() {
        println!("No candidates in mode {}.", selection.mode_id);
    } else {
        print_options(&options);
    }
    Ok(())
}

#[derive(Serialize)]
struct ReconcileReport<'a> {
    selection: Selection,
    payload: XorPayload,
    options: FilteredOptions<'a>,
}

pub fn reconcile(
    output: &Output,
    session: &Session,
    args: &SelectionArgs,
    changes: &[Change],
    editing: Option<EntityRef>,
    keep_flat: bool,
) -> Result<()> {
    let opts = filter_options(session, keep_flat, editing);
    let mut selection = args.selection();
    let mut options = FilteredOptions::default();

    for &change in changes {
        let reconciled = lineage::apply_change(&selection, change, &session.data, opts);
        output.verbose_ctx("reconcile", &format!("{} -> {:?}", change, reconciled.selection));
        selection = reconciled.selection;
        options = reconciled.options;
    }

    let report = ReconcileReport {
        selection,
        payload: lineage::build_xor_payload(&selection),
        options,
    };

    if output.is_json() {
        output.data(&report);
        return Ok(());
    }
    print_selection(output, &report.selection);
    output.field("stored", report.payload.anchor());
    output.blank();
    print_options(&report.options);
    Ok(())
}

pub fn reconcile_batch(output: &Output, session: &Session, file: &Path, change: Change) -> Result<()> {
    let content = fs::read_to_string(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let items: Vec<Selection> =
        serde_json::from_str(&content).with_context(|| format!("Failed to parse selections in {}", file.display()))?;

    let reconciled = lineage::reconcile_batch(&items, change, &session.data);
    output.verbose_ctx("reconcile-batch", &format!("applied {} to {} selections", change, reconciled.len()));

    if output.is_json() {
        output.data(&reconciled);
        return Ok(());
    }
    for sel in &reconciled {
        println!(
            "mode={} goal={} project={} milestone={}",
            sel.mode_id,
            opt(sel.goal_id),
            opt(sel.project_id),
            opt(sel.milestone_id)
        );
    }
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PayloadReport<T: Serialize> {
    kind: EntityKind,
    anchor: Anchor,
    payload: T,
    display: LineageDisplay,
}

pub fn payload(output: &Output, session: &Session, kind: EntityKind, args: &SelectionArgs) -> Result<()> {
    if kind.allowed_anchors().is_empty() {
        bail!("{} records have no anchor columns", kind);
    }

    // Anchors left over from another mode never reach the payload
    let raw = args.selection();
    let cleaned = lineage::cleanse_by_mode(
        raw.mode_id,
        AnchorFields {
            goal_id: raw.goal_id,
            project_id: raw.project_id,
            parent_id: None,
            milestone_id: raw.milestone_id,
        },
        &session.data,
    );
    let selection = Selection {
        mode_id: raw.mode_id,
        goal_id: cleaned.goal_id,
        project_id: cleaned.project_id,
        milestone_id: cleaned.milestone_id,
    };

    let anchor = lineage::normalize_for(kind, &selection);
    let maps = LineageMaps::build(&session.data);
    let display = lineage::derive_display(&XorPayload::from_anchor(anchor), &maps);

    if output.is_json() {
        match kind {
            EntityKind::Project => output.data(&PayloadReport {
                kind,
                anchor,
                payload: build_project_payload(&selection),
                display,
            }),
            EntityKind::Milestone => output.data(&PayloadReport {
                kind,
                anchor,
                payload: build_milestone_payload(&selection),
                display,
            }),
            _ => output.data(&PayloadReport {
                kind,
                anchor,
                payload: build_task_payload(&selection),
                display,
            }),
        }
        return Ok(());
    }

    output.field("kind", kind);
    output.field("anchor", anchor);
    output.field("goal", opt(display.goal_id));
    output.field("project", opt(display.project_id));
    Ok(())
}

pub fn group_under(output: &Output, kind: EntityKind, target: Option<EntityRef>) -> Result<()> {
    let target_anchor = match target {
        None => Anchor::None,
        Some(EntityRef::Goal(id)) => Anchor::Goal(id),
        Some(EntityRef::Project(id)) => Anchor::Project(id),
        Some(EntityRef::Milestone(id)) => Anchor::Milestone(id),
        Some(other) => bail!("Cannot group under a {}", other.kind()),
    };

    let Some(anchor) = lineage::group_under(kind, target_anchor) else {
        bail!("A {} cannot be grouped under {}", kind, target_anchor);
    };

    if output.is_json() {
        output.data(&serde_json::json!({
            "kind": kind,
            "anchor": anchor,
            "payload": XorPayload::from_anchor(anchor),
        }));
    } else {
        output.field("anchor", anchor);
    }
    Ok(())
}
