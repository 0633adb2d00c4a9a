//! Snapshot files
//!
//! A snapshot is one JSON or YAML document holding every collection:
//!
//! ```json
//! { "modes": [...], "goals": [...], "projects": [...], "milestones": [...], "tasks": [...] }
//! ```
//!
//! Missing collections are empty. Rows with id `0` are placeholders for
//! "none" entries in the source app and are dropped on load.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::domain::Datasets;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Failed to read snapshot {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse JSON snapshot {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to parse YAML snapshot {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Unsupported snapshot format '{0}' (expected .json, .yaml or .yml)")]
    UnsupportedFormat(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    Json,
    Yaml,
}

impl SnapshotFormat {
    pub fn from_path(path: &Path) -> Result<Self, SnapshotError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "json" => Ok(SnapshotFormat::Json),
            "yaml" | "yml" => Ok(SnapshotFormat::Yaml),
            _ => Err(SnapshotError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Loads a snapshot, picking the format from the file extension
pub fn load(path: &Path) -> Result<Datasets, SnapshotError> {
    let format = SnapshotFormat::from_path(path)?;
    let content = fs::read_to_string(path).map_err(|source| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let data = parse(&content, format, path)?;
    tracing::debug!(path = %path.display(), entities = data.len(), "loaded snapshot");
    Ok(data)
}

/// Parses snapshot text. `path` is only used in error messages.
pub fn parse(content: &str, format: SnapshotFormat, path: &Path) -> Result<Datasets, SnapshotError> {
    let mut data: Datasets = match format {
        SnapshotFormat::Json => serde_json::from_str(content).map_err(|source| SnapshotError::Json {
            path: path.to_path_buf(),
            source,
        })?,
        SnapshotFormat::Yaml => serde_yaml::from_str(content).map_err(|source| SnapshotError::Yaml {
            path: path.to_path_buf(),
            source,
        })?,
    };
    drop_placeholders(&mut data);
    Ok(data)
}

fn drop_placeholders(data: &mut Datasets) {
    let before = data.len();
    data.modes.retain(|m| m.id.get() != 0);
    data.goals.retain(|g| g.id.get() != 0);
    data.projects.retain(|p| p.id.get() != 0);
    data.milestones.retain(|m| m.id.get() != 0);
    data.tasks.retain(|t| t.id.get() != 0);

    let dropped = before - data.len();
    if dropped > 0 {
        tracing::trace!(dropped, "dropped placeholder rows");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MilestoneId, ProjectId};
    use tempfile::TempDir;

    #[test]
    fn loads_json_with_camel_case_and_nulls() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("snap.json");
        fs::write(
            &path,
            r#"{
                "goals": [{"id": 1, "modeId": 1, "title": "Ship"}],
                "projects": [{"id": 10, "modeId": 1, "title": "Engine", "goalId": 1, "parentId": null}],
                "milestones": [{"id": 100, "modeId": 1, "title": "M1", "projectId": 10, "goalId": 0}]
            }"#,
        )
        .unwrap();

        let data = load(&path).unwrap();
        assert!(data.modes.is_empty());
        assert_eq!(data.projects[0].parent_id, None);
        assert_eq!(data.milestones[0].project_id, Some(ProjectId::new(10)));
        assert_eq!(data.milestones[0].goal_id, None);
    }

    #[test]
    fn loads_yaml_with_snake_case() {
        let yaml = r#"
milestones:
  - id: 101
    mode_id: 1
    title: Nested
    parent_id: 100
    is_completed: true
    due_date: 2026-03-01
"#;
        let data = parse(yaml, SnapshotFormat::Yaml, Path::new("snap.yaml")).unwrap();
        let milestone = &data.milestones[0];
        assert_eq!(milestone.parent_id, Some(MilestoneId::new(100)));
        assert!(milestone.is_completed);
        assert!(milestone.due_date.is_some());
    }

    #[test]
    fn drops_placeholder_rows() {
        let json = r#"{"projects": [{"id": 0, "modeId": 1, "title": "None"}, {"id": 3, "modeId": 1}]}"#;
        let data = parse(json, SnapshotFormat::Json, Path::new("s.json")).unwrap();
        assert_eq!(data.projects.len(), 1);
        assert_eq!(data.projects[0].id, ProjectId::new(3));
    }

    #[test]
    fn rejects_unknown_extension() {
        let err = load(Path::new("snapshot.csv")).unwrap_err();
        assert!(matches!(err, SnapshotError::UnsupportedFormat(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = load(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, SnapshotError::Io { .. }));
    }
}
