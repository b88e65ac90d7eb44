//! Input validation primitives.
//!
//! Provides ergonomic helpers for common validation patterns:
//! - Validating non-empty strings
//! - Validating that a name is a single path component

use crate::error::{Error, Result};

/// Require a string to be non-empty after trimming.
///
/// Returns a reference to the trimmed string on success.
pub fn require_non_empty<'a>(value: &'a str, field: &str, message: &str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(Error::validation_invalid_argument(field, message, None, None))
    } else {
        Ok(trimmed)
    }
}

/// Require a non-empty name that can live in a single directory: no separators,
/// no NUL, not `.` or `..`. Returns the trimmed name.
pub fn require_plain_name<'a>(value: &'a str, field: &str) -> Result<&'a str> {
    let name = require_non_empty(value, field, "Name cannot be empty")?;

    if name == "." || name == ".." {
        return Err(Error::validation_invalid_argument(
            field,
            format!("'{}' is not a valid name", name),
            Some(name.to_string()),
            None,
        ));
    }

    if name.contains(['/', '\\', '\0']) {
        return Err(Error::validation_invalid_argument(
            field,
            "Name must not contain path separators",
            Some(name.to_string()),
            None,
        ));
    }

    Ok(name)
}
