//! Snapshot integrity audit command

use anyhow::{bail, Result};

use super::app::Session;
use super::output::Output;
use crate::lineage::{self, AuditReport};

fn log_findings(report: &AuditReport) {
    for cycle in &report.cycles {
        tracing::warn!(kind = %cycle.kind, members = ?cycle.members, "parent chain cycle");
    }
    for v in &report.xor_violations {
        tracing::warn!(entity = %v.entity, anchors = v.anchors, "more than one anchor set");
    }
    for d in &report.dangling {
        tracing::warn!(entity = %d.entity, target = %d.target, "dangling anchor");
    }
    for c in &report.cross_mode {
        tracing::warn!(entity = %c.entity, target = %c.target, "cross-mode anchor");
    }
}

pub fn run(output: &Output, session: &Session, strict: bool) -> Result<()> {
    let report = lineage::audit(&session.data);
    log_findings(&report);

    if output.is_json() {
        output.data(&report);
    } else if report.is_clean() {
        println!("No problems found in {} entities.", session.data.len());
    } else {
        for cycle in &report.cycles {
            let members: Vec<String> = cycle.members.iter().map(ToString::to_string).collect();
            println!("cycle       {}", members.join(" -> "));
        }
        for v in &report.xor_violations {
            println!("xor         {} has {} anchors set", v.entity, v.anchors);
        }
        for d in &report.dangling {
            println!("dangling    {} -> {}", d.entity, d.target);
        }
        for c in &report.cross_mode {
            println!(
                "cross-mode  {} (mode {}) -> {} (mode {})",
                c.entity, c.mode_id, c.target, c.target_mode_id
            );
        }
    }

    if strict && !report.is_clean() {
        bail!("Audit found {} problem(s)", report.finding_count());
    }
    Ok(())
}
