//! Plan session files: save a plan to JSON and restore it for later edits.
//!
//! Format (camelCase):
//! `{"root": "...", "savedAt": "<RFC3339>", "entries": [{"parentPath", "oldName", "newName",
//! "renameRequested", "isDirectory", "locked", "modified"}]}`

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

use super::{Plan, PlanEntry};
use crate::error::{Error, Result};
use crate::utils::io;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PlanDocument<'a> {
    root: String,
    saved_at: String,
    entries: &'a [PlanEntry],
}

/// Entry as read back: everything but `oldName` may be missing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredEntry {
    #[serde(default)]
    parent_path: String,
    old_name: String,
    #[serde(default)]
    new_name: Option<String>,
    #[serde(default)]
    rename_requested: bool,
    #[serde(default)]
    is_directory: bool,
    #[serde(default)]
    locked: bool,
    #[serde(default)]
    modified: bool,
}

impl From<StoredEntry> for PlanEntry {
    fn from(stored: StoredEntry) -> Self {
        let new_name = stored
            .new_name
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| stored.old_name.clone());
        PlanEntry {
            parent_path: stored.parent_path,
            old_name: stored.old_name,
            new_name,
            is_directory: stored.is_directory,
            rename_requested: stored.rename_requested,
            locked: stored.locked,
            modified: stored.modified,
        }
    }
}

pub fn to_json(plan: &Plan) -> Result<String> {
    let doc = PlanDocument {
        root: plan.root.to_string_lossy().into_owned(),
        saved_at: chrono::Utc::now().to_rfc3339(),
        entries: plan.entries(),
    };
    serde_json::to_string_pretty(&doc)
        .map_err(|e| Error::internal_json(e.to_string(), Some("serialize plan".to_string())))
}

pub fn from_json(raw: &str) -> Result<Plan> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| Error::validation_invalid_json(e, Some("parse plan session".to_string())))?;

    let root = value
        .get("root")
        .and_then(Value::as_str)
        .filter(|root| !root.trim().is_empty())
        .ok_or_else(|| {
            Error::validation_invalid_payload(
                "'root' must be a non-empty string",
                Some("plan session".to_string()),
            )
        })?;

    let entries = match value.get("entries") {
        Some(Value::Array(items)) => items,
        _ => {
            return Err(Error::validation_invalid_payload(
                "'entries' must be an array",
                Some("plan session".to_string()),
            ))
        }
    };

    let mut parsed = Vec::with_capacity(entries.len());
    for (idx, item) in entries.iter().enumerate() {
        let stored: StoredEntry = serde_json::from_value(item.clone()).map_err(|e| {
            Error::validation_invalid_json(e, Some(format!("plan session entry {}", idx)))
        })?;
        parsed.push(PlanEntry::from(stored));
    }

    Plan::from_entries(root, parsed)
}

/// Write the plan atomically.
pub fn save(plan: &Plan, path: &Path) -> Result<()> {
    let json = to_json(plan)?;
    io::write_file_atomic(path, &json, &format!("save plan {}", path.display()))?;
    log_status!("session", "Saved {} entries to {}", plan.len(), path.display());
    Ok(())
}

pub fn load(path: &Path) -> Result<Plan> {
    let raw = io::read_file(path, &format!("read plan {}", path.display()))?;
    from_json(&raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::plan::EntryId;
    use tempfile::tempdir;

    #[test]
    fn save_and_load_preserve_entries_and_flags() {
        let dir = tempdir().unwrap();
        let mut plan = Plan::from_entries(
            dir.path(),
            vec![
                PlanEntry::new("", "kot.txt", "кот.txt", false),
                PlanEntry::new("docs", "mir", "мир", true),
            ],
        )
        .unwrap();
        plan.set_locked(EntryId(1), true).unwrap();
        plan.set_new_name(EntryId(0), "котик.txt").unwrap();

        let file = dir.path().join("session").join("plan.json");
        save(&plan, &file).unwrap();
        let restored = load(&file).unwrap();

        assert_eq!(restored, plan);
        assert!(!dir.path().join("session").join("plan.json.tmp").exists());
    }

    #[test]
    fn saved_document_uses_camel_case_and_timestamp() {
        let plan = Plan::from_entries("/tmp/root", vec![PlanEntry::new("", "a", "а", false)])
            .unwrap();
        let value: Value = serde_json::from_str(&to_json(&plan).unwrap()).unwrap();

        assert_eq!(value["root"], "/tmp/root");
        assert!(chrono::DateTime::parse_from_rfc3339(value["savedAt"].as_str().unwrap()).is_ok());
        assert_eq!(value["entries"][0]["oldName"], "a");
        assert_eq!(value["entries"][0]["renameRequested"], true);
    }

    #[test]
    fn missing_optional_fields_get_defaults() {
        let plan = from_json(
            r#"{"root": "/tmp/root", "entries": [{"oldName": "kot.txt"}, {"oldName": "mir", "newName": ""}]}"#,
        )
        .unwrap();

        let first = &plan.entries()[0];
        assert_eq!(first.parent_path, "");
        assert_eq!(first.new_name, "kot.txt");
        assert!(!first.rename_requested && !first.is_directory && !first.locked && !first.modified);
        assert_eq!(plan.entries()[1].new_name, "mir");
    }

    #[test]
    fn rejects_malformed_payloads() {
        let cases = [
            r#"{"root": "/tmp/root", "entries": {"oldName": "a"}}"#,
            r#"{"root": "/tmp/root"}"#,
            r#"{"entries": []}"#,
            r#"{"root": "/tmp/root", "entries": [{"newName": "а"}]}"#,
            "not json",
        ];
        for raw in cases {
            let err = from_json(raw).unwrap_err();
            assert_eq!(err.code, ErrorCode::ValidationInvalidJson, "{}", raw);
        }
    }

    #[test]
    fn rejects_duplicate_objects() {
        let err = from_json(
            r#"{"root": "/tmp/root", "entries": [{"oldName": "a"}, {"oldName": "a", "newName": "б"}]}"#,
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationInvalidArgument);
    }
}
