//! The lineage engine
//!
//! Pure functions over a borrowed [`Datasets`](crate::domain::Datasets)
//! snapshot: no I/O and no shared state. Data flows leaves-first:
//!
//! maps → effective / cycle → filter → reconcile → xor
//!
//! Editors call [`filter_editor_options`] to render option lists,
//! [`reconcile_after_change`] on every field change (or [`apply_change`] for
//! both at once), and [`build_xor_payload`] right before submit.

pub mod audit;
pub mod cycle;
pub mod derive;
pub mod effective;
pub mod filter;
pub mod hygiene;
pub mod maps;
pub mod reconcile;
pub mod scope;
pub mod selection;
pub mod timer_path;
pub mod xor;

#[cfg(test)]
pub(crate) mod fixtures;

pub use audit::{audit, AuditReport};
pub use cycle::{belongs_under, descendants_of, is_descendant_or_self, parent_candidates};
pub use derive::{breadcrumb, derive_display, DisplaySource, LineageDisplay};
pub use effective::{
    effective_goal_id, effective_project_id, milestone_effective_goal_id, milestone_lineage, path_for_anchor,
    project_effective_goal_id, project_lineage, task_effective_goal_id, task_effective_project_id, LineagePath,
};
pub use filter::{filter_editor_options, Choice, FilterOptions, FilteredOptions};
pub use hygiene::{cleanse_by_mode, AnchorFields};
pub use maps::LineageMaps;
pub use reconcile::{apply_change, edit_selection, reconcile_after_change, reconcile_batch, sanitize, Reconciled};
pub use scope::{scope_goals, scope_milestones, scope_projects, scope_tasks, ScopeCtx};
pub use selection::{Change, Selection};
pub use timer_path::{to_timer_path, TimerPath};
pub use xor::{build_xor_payload, group_under, normalize_for, XorPayload};
