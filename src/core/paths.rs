use crate::error::{Error, Result};
use std::env;
use std::path::{Path, PathBuf};

/// Base cyrillize config directory (`$XDG_CONFIG_HOME/cyrillize`, else `~/.config/cyrillize`)
pub fn cyrillize() -> Result<PathBuf> {
    #[cfg(windows)]
    {
        let appdata = env::var("APPDATA").map_err(|_| {
            Error::internal_unexpected(
                "APPDATA environment variable not set on Windows".to_string(),
            )
        })?;
        Ok(PathBuf::from(appdata).join("cyrillize"))
    }

    #[cfg(not(windows))]
    {
        if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
            if !xdg.trim().is_empty() {
                return Ok(PathBuf::from(xdg).join("cyrillize"));
            }
        }
        let home = env::var("HOME").map_err(|_| {
            Error::internal_unexpected(
                "HOME environment variable not set on Unix-like system".to_string(),
            )
        })?;
        Ok(PathBuf::from(home).join(".config").join("cyrillize"))
    }
}

/// Default mapping-table override file
pub fn translit_config() -> Result<PathBuf> {
    Ok(cyrillize()?.join("translit_config.json"))
}

/// Expand `~` in a user-supplied path.
pub fn expand(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).into_owned())
}

/// Join a plan-relative parent path ("" = root) and a name into a relative path string.
pub fn join_relative(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", parent, name)
    }
}

/// Absolute location of `name` inside the plan-relative `parent` under `root`.
pub fn resolve_in(root: &Path, parent: &str, name: &str) -> PathBuf {
    let mut path = root.to_path_buf();
    for segment in parent.split('/').filter(|s| !s.is_empty()) {
        path.push(segment);
    }
    path.push(name);
    path
}
