//! Integrity audit over a stored snapshot
//!
//! The engine itself never trusts stored data to be well formed; it halts
//! walks on cycles and skips dangling anchors. The audit reports those
//! problems instead so they can be fixed at the source.
//!
//! Parent chains are loaded into a petgraph graph (child → parent edges) and
//! every strongly connected component with more than one node, or with a
//! self-loop, is a cycle.

use std::collections::HashMap;

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::Serialize;

use super::maps::LineageMaps;
use crate::domain::{Datasets, EntityKind, EntityRef, ModeId, Nested};

/// A loop in a same-kind parent chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CycleFinding {
    pub kind: EntityKind,
    /// Members ordered by id
    pub members: Vec<EntityRef>,
}

/// An entity with more than one anchor column set
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct XorViolation {
    pub entity: EntityRef,
    pub anchors: usize,
}

/// An anchor whose target is missing from the snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DanglingAnchor {
    pub entity: EntityRef,
    pub target: EntityRef,
}

/// An anchor whose target lives in another mode
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossModeAnchor {
    pub entity: EntityRef,
    pub target: EntityRef,
    pub mode_id: ModeId,
    pub target_mode_id: ModeId,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditReport {
    pub cycles: Vec<CycleFinding>,
    pub xor_violations: Vec<XorViolation>,
    pub dangling: Vec<DanglingAnchor>,
    pub cross_mode: Vec<CrossModeAnchor>,
}

impl AuditReport {
    pub fn is_clean(&self) -> bool {
        self.finding_count() == 0
    }

    pub fn finding_count(&self) -> usize {
        self.cycles.len() + self.xor_violations.len() + self.dangling.len() + self.cross_mode.len()
    }
}

/// Parent graph for one self-nesting kind
struct ParentGraph<Id> {
    graph: DiGraph<Id, ()>,
}

impl<Id: Copy + Ord + std::hash::Hash> ParentGraph<Id> {
    fn build<'a, T>(items: impl IntoIterator<Item = &'a T>) -> Self
    where
        T: Nested<Id = Id> + 'a,
    {
        let items: Vec<&T> = items.into_iter().collect();
        let mut graph = DiGraph::new();
        let mut node_map: HashMap<Id, NodeIndex> = HashMap::new();

        for item in &items {
            node_map.entry(item.id()).or_insert_with(|| graph.add_node(item.id()));
        }
        for item in &items {
            let Some(parent) = item.parent_id() else { continue };
            // Dangling parents are reported separately
            if let (Some(&child), Some(&parent)) = (node_map.get(&item.id()), node_map.get(&parent)) {
                if graph.find_edge(child, parent).is_none() {
                    graph.add_edge(child, parent, ());
                }
            }
        }
        Self { graph }
    }

    fn cycles(&self) -> Vec<Vec<Id>> {
        let mut cycles: Vec<Vec<Id>> = tarjan_scc(&self.graph)
            .into_iter()
            .filter(|scc| match scc.as_slice() {
                [single] => self.graph.contains_edge(*single, *single),
                _ => true,
            })
            .map(|scc| {
                let mut ids: Vec<Id> = scc.iter().map(|&idx| self.graph[idx]).collect();
                ids.sort_unstable();
                ids
            })
            .collect();
        cycles.sort_unstable();
        cycles
    }
}

fn mode_of(target: EntityRef, maps: &LineageMaps<'_>) -> Option<ModeId> {
    match target {
        EntityRef::Mode(id) => maps.mode(id).map(|m| m.id),
        EntityRef::Goal(id) => maps.goal(id).map(|g| g.mode_id),
        EntityRef::Project(id) => maps.project(id).map(|p| p.mode_id),
        EntityRef::Milestone(id) => maps.milestone(id).map(|m| m.mode_id),
        EntityRef::Task(id) => maps.task(id).map(|t| t.mode_id),
    }
}

/// Every anchor column set on each project, milestone and task
fn anchored(data: &Datasets) -> Vec<(EntityRef, ModeId, Vec<EntityRef>)> {
    let mut out = Vec::with_capacity(data.projects.len() + data.milestones.len() + data.tasks.len());

    for p in &data.projects {
        let targets = [p.parent_id.map(EntityRef::Project), p.goal_id.map(EntityRef::Goal)];
        out.push((EntityRef::Project(p.id), p.mode_id, targets.into_iter().flatten().collect()));
    }
    for m in &data.milestones {
        let targets = [
            m.parent_id.map(EntityRef::Milestone),
            m.project_id.map(EntityRef::Project),
            m.goal_id.map(EntityRef::Goal),
        ];
        out.push((EntityRef::Milestone(m.id), m.mode_id, targets.into_iter().flatten().collect()));
    }
    for t in &data.tasks {
        let targets = [
            t.milestone_id.map(EntityRef::Milestone),
            t.project_id.map(EntityRef::Project),
            t.goal_id.map(EntityRef::Goal),
        ];
        out.push((EntityRef::Task(t.id), t.mode_id, targets.into_iter().flatten().collect()));
    }
    out
}

/// Audits `data`. Never fails; an empty snapshot is clean.
pub fn audit(data: &Datasets) -> AuditReport {
    let maps = LineageMaps::build(data);
    let mut report = AuditReport::default();

    for members in ParentGraph::build(maps.projects.values()).cycles() {
        report.cycles.push(CycleFinding {
            kind: EntityKind::Project,
            members: members.into_iter().map(EntityRef::Project).collect(),
        });
    }
    for members in ParentGraph::build(maps.milestones.values()).cycles() {
        report.cycles.push(CycleFinding {
            kind: EntityKind::Milestone,
            members: members.into_iter().map(EntityRef::Milestone).collect(),
        });
    }

    for (entity, mode_id, targets) in anchored(data) {
        if targets.len() > 1 {
            report.xor_violations.push(XorViolation {
                entity,
                anchors: targets.len(),
            });
        }
        for target in targets {
            match mode_of(target, &maps) {
                None => report.dangling.push(DanglingAnchor { entity, target }),
                Some(target_mode_id) if target_mode_id != mode_id => report.cross_mode.push(CrossModeAnchor {
                    entity,
                    target,
                    mode_id,
                    target_mode_id,
                }),
                Some(_) => {}
            }
        }
    }

    tracing::debug!(
        cycles = report.cycles.len(),
        xor = report.xor_violations.len(),
        dangling = report.dangling.len(),
        cross_mode = report.cross_mode.len(),
        "audit complete"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{GoalId, MilestoneId, ProjectId, Task, TaskId};
    use crate::lineage::fixtures;

    #[test]
    fn sample_snapshot_is_clean() {
        let report = audit(&fixtures::sample());
        assert!(report.is_clean(), "{:?}", report);
    }

    #[test]
    fn finds_parent_loops_and_self_parents() {
        let report = audit(&fixtures::cyclic());

        assert_eq!(report.cycles.len(), 2);
        assert_eq!(report.cycles[0].kind, EntityKind::Project);
        assert_eq!(
            report.cycles[0].members,
            vec![EntityRef::Project(ProjectId::new(1)), EntityRef::Project(ProjectId::new(2))]
        );
        assert_eq!(report.cycles[1].members, vec![EntityRef::Milestone(MilestoneId::new(7))]);
    }

    #[test]
    fn acyclic_chain_has_no_cycles() {
        assert!(audit(&fixtures::project_chain()).cycles.is_empty());
    }

    #[test]
    fn reports_xor_dangling_and_cross_mode() {
        let mut data = fixtures::sample();
        let mut task = Task::new(2000u64, 1u64, "Messy");
        task.milestone_id = Some(MilestoneId::new(404));
        task.goal_id = Some(GoalId::new(2));
        data.tasks.push(task);

        let report = audit(&data);
        let entity = EntityRef::Task(TaskId::new(2000));

        assert_eq!(report.xor_violations, vec![XorViolation { entity, anchors: 2 }]);
        assert_eq!(
            report.dangling,
            vec![DanglingAnchor {
                entity,
                target: EntityRef::Milestone(MilestoneId::new(404)),
            }]
        );
        assert_eq!(report.cross_mode.len(), 1);
        assert_eq!(report.cross_mode[0].target_mode_id, ModeId::new(2));
        assert_eq!(report.finding_count(), 3);
    }
}
