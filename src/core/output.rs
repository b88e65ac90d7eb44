//! Public output types for cyrillize command responses.

use serde::{Deserialize, Serialize};

use crate::error::Error;

// ============================================================================
// Batch Operations
// ============================================================================

/// Summary of one execution pass over a plan.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionReport {
    pub renamed: u32,
    /// Entries passed over without an error (not requested, or nothing to change).
    pub skipped: u32,
    pub errors: u32,
    pub items: Vec<ExecutionItem>,
}

/// Individual entry result within an execution pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionItem {
    /// Root-relative path of the original object.
    pub path: String,
    pub from: String,
    pub to: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExecutionReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_renamed(&mut self, path: String, from: String, to: String) {
        self.renamed += 1;
        self.items.push(ExecutionItem {
            path,
            from,
            to,
            status: "renamed".to_string(),
            code: None,
            error: None,
        });
    }

    /// Silent skips are counted but not itemized.
    pub fn record_skipped(&mut self) {
        self.skipped += 1;
    }

    pub fn record_error(&mut self, path: String, from: String, to: String, error: &Error) {
        self.errors += 1;
        self.items.push(ExecutionItem {
            path,
            from,
            to,
            status: "error".to_string(),
            code: Some(error.code.as_str().to_string()),
            error: Some(error.summary()),
        });
    }

    pub fn is_clean(&self) -> bool {
        self.errors == 0
    }
}
