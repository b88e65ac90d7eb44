use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigInvalidJson,
    ConfigInvalidValue,

    ValidationMissingArgument,
    ValidationInvalidArgument,
    ValidationInvalidJson,

    PlanEntryNotFound,
    PlanUnresolvedConflicts,

    RenameConflict,
    RenameSourceMissing,
    RenameDestinationExists,
    RenameFailed,
    RenameSuffixExhausted,

    InternalIoError,
    InternalJsonError,
    InternalUnexpected,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ConfigInvalidJson => "config.invalid_json",
            ErrorCode::ConfigInvalidValue => "config.invalid_value",

            ErrorCode::ValidationMissingArgument => "validation.missing_argument",
            ErrorCode::ValidationInvalidArgument => "validation.invalid_argument",
            ErrorCode::ValidationInvalidJson => "validation.invalid_json",

            ErrorCode::PlanEntryNotFound => "plan.entry_not_found",
            ErrorCode::PlanUnresolvedConflicts => "plan.unresolved_conflicts",

            ErrorCode::RenameConflict => "rename.conflict",
            ErrorCode::RenameSourceMissing => "rename.source_missing",
            ErrorCode::RenameDestinationExists => "rename.destination_exists",
            ErrorCode::RenameFailed => "rename.failed",
            ErrorCode::RenameSuffixExhausted => "rename.suffix_exhausted",

            ErrorCode::InternalIoError => "internal.io_error",
            ErrorCode::InternalJsonError => "internal.json_error",
            ErrorCode::InternalUnexpected => "internal.unexpected",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hint {
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigInvalidJsonDetails {
    pub path: String,
    pub error: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigInvalidValueDetails {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub problem: String,
}

#[derive(Debug, Clone)]
pub struct Error {
    pub code: ErrorCode,
    pub message: String,
    pub details: Value,
    pub hints: Vec<Hint>,
    pub retryable: Option<bool>,
}

pub type Result<T> = std::result::Result<T, Error>;

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingArgumentDetails {
    pub args: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidArgumentDetails {
    pub field: String,
    pub problem: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tried: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalIoErrorDetails {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalJsonErrorDetails {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

/// Source and destination of a single rename, attached to every `rename.*` error.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameTargetDetails {
    pub source: String,
    pub destination: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn to_details<T: Serialize>(details: T) -> Value {
    serde_json::to_value(details).unwrap_or_else(|_| Value::Object(serde_json::Map::new()))
}

impl Error {
    pub fn new(code: ErrorCode, message: impl Into<String>, details: Value) -> Self {
        Self {
            code,
            message: message.into(),
            details,
            hints: Vec::new(),
            retryable: None,
        }
    }

    pub fn validation_missing_argument(args: Vec<String>) -> Self {
        Self::new(
            ErrorCode::ValidationMissingArgument,
            "Missing required argument",
            to_details(MissingArgumentDetails { args }),
        )
    }

    pub fn validation_invalid_argument(
        field: impl Into<String>,
        problem: impl Into<String>,
        id: Option<String>,
        tried: Option<Vec<String>>,
    ) -> Self {
        let details = to_details(InvalidArgumentDetails {
            field: field.into(),
            problem: problem.into(),
            id,
            tried,
        });

        Self::new(
            ErrorCode::ValidationInvalidArgument,
            "Invalid argument",
            details,
        )
    }

    pub fn validation_invalid_json(err: serde_json::Error, context: Option<String>) -> Self {
        let details = serde_json::json!({
            "error": err.to_string(),
            "context": context,
        });

        Self::new(ErrorCode::ValidationInvalidJson, "Invalid JSON", details)
    }

    /// Structurally valid JSON whose shape is wrong (e.g. `entries` is not an array).
    pub fn validation_invalid_payload(problem: impl Into<String>, context: Option<String>) -> Self {
        let details = serde_json::json!({
            "error": problem.into(),
            "context": context,
        });

        Self::new(ErrorCode::ValidationInvalidJson, "Invalid JSON", details)
    }

    pub fn config_invalid_json(path: impl Into<String>, err: serde_json::Error) -> Self {
        let details = to_details(ConfigInvalidJsonDetails {
            path: path.into(),
            error: err.to_string(),
        });

        Self::new(
            ErrorCode::ConfigInvalidJson,
            "Invalid JSON in configuration",
            details,
        )
    }

    pub fn config_invalid_value(
        key: impl Into<String>,
        value: Option<String>,
        problem: impl Into<String>,
    ) -> Self {
        let details = to_details(ConfigInvalidValueDetails {
            key: key.into(),
            value,
            problem: problem.into(),
        });

        Self::new(
            ErrorCode::ConfigInvalidValue,
            "Invalid configuration value",
            details,
        )
    }

    pub fn plan_entry_not_found(path: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::PlanEntryNotFound,
            "Plan entry not found",
            serde_json::json!({ "path": path.into() }),
        )
        .with_hint("Run 'cyrillize plan show' to list entries in the plan")
    }

    pub fn plan_unresolved_conflicts(paths: Vec<String>) -> Self {
        let count = paths.len();
        Self::new(
            ErrorCode::PlanUnresolvedConflicts,
            format!("{} planned rename(s) still conflict", count),
            serde_json::json!({ "paths": paths }),
        )
        .with_hint("Run 'cyrillize plan resolve' to add numeric suffixes to unlocked entries")
        .with_hint("Pass --skip-conflicts to apply everything else and skip conflicting entries")
    }

    pub fn rename_conflict(source: impl Into<String>, destination: impl Into<String>) -> Self {
        Self::rename_error(
            ErrorCode::RenameConflict,
            "Destination collides with another planned or existing name",
            source,
            destination,
            None,
        )
    }

    pub fn rename_source_missing(source: impl Into<String>, destination: impl Into<String>) -> Self {
        Self::rename_error(
            ErrorCode::RenameSourceMissing,
            "Source no longer exists",
            source,
            destination,
            None,
        )
        .with_hint("Re-run 'cyrillize scan' to rebuild the plan from disk")
    }

    pub fn rename_destination_exists(
        source: impl Into<String>,
        destination: impl Into<String>,
    ) -> Self {
        Self::rename_error(
            ErrorCode::RenameDestinationExists,
            "Destination already exists",
            source,
            destination,
            None,
        )
    }

    pub fn rename_failed(
        source: impl Into<String>,
        destination: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        let mut err = Self::rename_error(
            ErrorCode::RenameFailed,
            "Rename failed",
            source,
            destination,
            Some(error.into()),
        );
        err.retryable = Some(true);
        err
    }

    pub fn rename_suffix_exhausted(name: impl Into<String>, limit: u32) -> Self {
        Self::new(
            ErrorCode::RenameSuffixExhausted,
            format!("No free numeric suffix up to {}", limit),
            serde_json::json!({ "name": name.into(), "limit": limit }),
        )
        .with_hint("Pick a different name manually with 'cyrillize plan edit --name'")
    }

    fn rename_error(
        code: ErrorCode,
        message: &str,
        source: impl Into<String>,
        destination: impl Into<String>,
        error: Option<String>,
    ) -> Self {
        let details = to_details(RenameTargetDetails {
            source: source.into(),
            destination: destination.into(),
            error,
        });
        Self::new(code, message, details)
    }

    pub fn internal_io(error: impl Into<String>, context: Option<String>) -> Self {
        let details = to_details(InternalIoErrorDetails {
            error: error.into(),
            context,
        });

        Self::new(ErrorCode::InternalIoError, "IO error", details)
    }

    pub fn internal_json(error: impl Into<String>, context: Option<String>) -> Self {
        let details = to_details(InternalJsonErrorDetails {
            error: error.into(),
            context,
        });

        Self::new(ErrorCode::InternalJsonError, "JSON error", details)
    }

    pub fn internal_unexpected(error: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::InternalUnexpected,
            "Unexpected error",
            serde_json::json!({ "error": error.into() }),
        )
    }

    pub fn with_hint(mut self, message: impl Into<String>) -> Self {
        self.hints.push(Hint {
            message: message.into(),
        });
        self
    }

    /// One-line `code: message` form used in per-entry diagnostics.
    pub fn summary(&self) -> String {
        match self.details.get("error").and_then(Value::as_str) {
            Some(cause) => format!("{}: {} ({})", self.code.as_str(), self.message, cause),
            None => format!("{}: {}", self.code.as_str(), self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_render_as_dotted_ids() {
        assert_eq!(ErrorCode::RenameSourceMissing.as_str(), "rename.source_missing");
        assert_eq!(ErrorCode::ConfigInvalidJson.as_str(), "config.invalid_json");
    }

    #[test]
    fn rename_failed_carries_cause_and_is_retryable() {
        let err = Error::rename_failed("a/kot.txt", "a/кот.txt", "permission denied");
        assert_eq!(err.code, ErrorCode::RenameFailed);
        assert_eq!(err.retryable, Some(true));
        assert_eq!(err.details["source"], "a/kot.txt");
        assert!(err.summary().contains("permission denied"));
    }

    #[test]
    fn unresolved_conflicts_lists_paths_and_hints() {
        let err = Error::plan_unresolved_conflicts(vec!["kot.txt".into(), "qot.txt".into()]);
        assert!(err.message.starts_with('2'));
        assert_eq!(err.hints.len(), 2);
    }
}
