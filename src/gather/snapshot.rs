//! Snapshot files: facts captured earlier and replayed offline.

use super::GatherError;
use crate::analyzer::facts::FactSnapshot;
use std::path::Path;

/// Load a snapshot from a `.json`, `.yaml` or `.yml` file.
///
/// Files with any other extension are parsed as YAML, which also accepts JSON.
pub fn load_snapshot(path: &Path) -> Result<FactSnapshot, GatherError> {
    let content = std::fs::read_to_string(path).map_err(|source| GatherError::SnapshotRead {
        path: path.to_path_buf(),
        source,
    })?;

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    parse_snapshot(&content, is_json).map_err(|message| GatherError::SnapshotParse {
        path: path.to_path_buf(),
        message,
    })
}

/// Parse snapshot text.
pub fn parse_snapshot(content: &str, is_json: bool) -> Result<FactSnapshot, String> {
    if is_json {
        serde_json::from_str(content).map_err(|e| e.to_string())
    } else {
        serde_yaml::from_str(content).map_err(|e| e.to_string())
    }
}
