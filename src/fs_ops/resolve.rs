//! Turning user-supplied root strings into absolute, lexically clean paths.
//!
//! Notes:
//! - Symlinks are NOT resolved here. A root that is itself a symlink must stay
//!   visible to preflight, which refuses it.
//! - `..` is folded lexically, the same way a shell `cd -L` would.

use std::path::{Component, MAIN_SEPARATOR, MAIN_SEPARATOR_STR, Path, PathBuf};
use tracing::trace;

use crate::errors::LswapError;

/// Resolve `raw` against the current working directory and clean it.
pub fn resolve_abs_path(raw: &str) -> Result<PathBuf, LswapError> {
    if raw.is_empty() {
        return Err(LswapError::MissingInput("path"));
    }

    let native = from_slash(raw);
    let abs = std::path::absolute(&native).map_err(|source| LswapError::PathResolution {
        path: raw.to_string(),
        source,
    })?;
    let cleaned = clean(dunce::simplified(&abs));
    trace!(raw, resolved = %cleaned.display(), "resolved path");
    Ok(cleaned)
}

/// Replace `/` with the platform separator.
fn from_slash(raw: &str) -> PathBuf {
    if MAIN_SEPARATOR == '/' {
        PathBuf::from(raw)
    } else {
        PathBuf::from(raw.replace('/', MAIN_SEPARATOR_STR))
    }
}

/// Lexically drop `.` segments, fold `..` into its parent and collapse repeated
/// separators. `..` directly under the root stays at the root.
pub fn clean(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for comp in path.components() {
        match comp {
            Component::Prefix(_) | Component::RootDir => out.push(comp.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                Some(Component::ParentDir) | Some(Component::CurDir) | None => out.push(".."),
            },
            Component::Normal(name) => out.push(name),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}
