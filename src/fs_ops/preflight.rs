//! Read-only safety gate run before anything is touched.
//!
//! Order of checks (first failure wins):
//! 1. roots differ as strings
//! 2. roots are real, non-symlink directories with different identities
//! 3. every content name is a real entry under the source root
//!    (or already relocated, see `Action::Skip`)
//! 4. every destination slot is free or a symlink back to its source
//!
//! Nothing in this module mutates the filesystem.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::errors::LswapError;
use crate::platform::file_identity;

use super::SwapOptions;
use super::classify::{EntryState, classify};
use super::content::{ContentList, ContentName};
use super::verify::verify_points_to;

/// What the relocator will do for one content name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Unlink destination slot, move, link back.
    Relocate,
    /// Entry already lives at the destination but the source link is missing
    /// (an earlier run stopped after its move phase). Only link back.
    LinkOnly,
    /// Source is already a verified symlink to a real destination entry.
    Skip,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedEntry {
    pub name: ContentName,
    pub action: Action,
}

/// Outcome of a successful preflight: validated roots plus one action per name,
/// in input order.
#[derive(Debug, Clone)]
pub struct Plan {
    pub source: PathBuf,
    pub dest: PathBuf,
    pub entries: Vec<PlannedEntry>,
}

impl Plan {
    pub fn source_path(&self, name: &ContentName) -> PathBuf {
        self.source.join(name)
    }

    pub fn dest_path(&self, name: &ContentName) -> PathBuf {
        self.dest.join(name)
    }

    /// Entries whose action is one of `actions`, in order.
    pub fn with_actions<'a>(
        &'a self,
        actions: &'a [Action],
    ) -> impl Iterator<Item = &'a PlannedEntry> + 'a {
        self.entries.iter().filter(move |e| actions.contains(&e.action))
    }

    /// True when every entry is already relocated.
    pub fn is_noop(&self) -> bool {
        self.entries.iter().all(|e| e.action == Action::Skip)
    }
}

/// Run every preflight check for the given (already resolved) roots.
pub fn validate(
    source: &Path,
    dest: &Path,
    contents: &ContentList,
    opts: &SwapOptions,
) -> Result<Plan, LswapError> {
    check_roots(source, dest)?;
    // Physical location of the destination, for the containment check.
    let dest_real = dunce::canonicalize(dest).map_err(|e| root_inspect(dest, e))?;

    let mut entries = Vec::with_capacity(contents.len());
    for name in contents {
        let action = plan_source_entry(source, dest, &dest_real, name, opts)?;
        debug!(content = %name, ?action, "source entry checked");
        entries.push(PlannedEntry {
            name: name.clone(),
            action,
        });
    }

    for entry in entries.iter().filter(|e| e.action == Action::Relocate) {
        check_destination_entry(source, dest, &entry.name)?;
    }

    info!(
        source = %source.display(),
        dest = %dest.display(),
        count = entries.len(),
        "source and destination look good"
    );
    Ok(Plan {
        source: source.to_path_buf(),
        dest: dest.to_path_buf(),
        entries,
    })
}

/// Root checks (1 and 2). String equality is tested before any stat.
pub fn check_roots(source: &Path, dest: &Path) -> Result<(), LswapError> {
    let same = || LswapError::SameLocation {
        from: source.to_path_buf(),
        to: dest.to_path_buf(),
    };

    if source.as_os_str() == dest.as_os_str() {
        return Err(same());
    }

    let src_meta = root_metadata(source)?;
    let dst_meta = root_metadata(dest)?;

    for (path, meta) in [(source, &src_meta), (dest, &dst_meta)] {
        if meta.file_type().is_symlink() {
            return Err(LswapError::RootIsSymlink(path.to_path_buf()));
        }
    }
    for (path, meta) in [(source, &src_meta), (dest, &dst_meta)] {
        if !meta.is_dir() {
            return Err(LswapError::RootNotDirectory(path.to_path_buf()));
        }
    }

    let src_id = file_identity(source, false).map_err(|e| root_inspect(source, e))?;
    let dst_id = file_identity(dest, false).map_err(|e| root_inspect(dest, e))?;
    if src_id == dst_id {
        return Err(same());
    }

    debug!(source = %source.display(), dest = %dest.display(), "roots are distinct directories");
    Ok(())
}

fn root_metadata(path: &Path) -> Result<fs::Metadata, LswapError> {
    fs::symlink_metadata(path).map_err(|e| root_inspect(path, e))
}

fn root_inspect(path: &Path, source: std::io::Error) -> LswapError {
    LswapError::RootInspect {
        path: path.to_path_buf(),
        source,
    }
}

fn inspect(path: &Path) -> Result<EntryState, LswapError> {
    classify(path).map_err(|source| LswapError::Inspect {
        path: path.to_path_buf(),
        source,
    })
}

fn canonical(path: &Path) -> Result<PathBuf, LswapError> {
    dunce::canonicalize(path).map_err(|source| LswapError::Inspect {
        path: path.to_path_buf(),
        source,
    })
}

/// Check 3 for one name. Containment is tested on the lexical paths and on
/// the physical ones, so a destination reached through a symlinked ancestor
/// is caught too.
fn plan_source_entry(
    source: &Path,
    dest: &Path,
    dest_real: &Path,
    name: &ContentName,
    opts: &SwapOptions,
) -> Result<Action, LswapError> {
    let src = source.join(name);
    let dst = dest.join(name);

    match inspect(&src)? {
        EntryState::RealEntry { .. } => {
            if dest.starts_with(&src) || dest_real.starts_with(canonical(&src)?) {
                return Err(LswapError::ContentContainsDestination {
                    content: src,
                    dest: dest.to_path_buf(),
                });
            }
            Ok(Action::Relocate)
        }
        EntryState::Absent => {
            if opts.resume && inspect(&dst)?.is_real() {
                warn!(
                    content = %name,
                    dest = %dst.display(),
                    "source missing; linking to the existing destination entry, which is not checked to be from an earlier run"
                );
                Ok(Action::LinkOnly)
            } else {
                Err(LswapError::MissingSourceContent(src))
            }
        }
        EntryState::SymlinkTo(_) => {
            if inspect(&dst)?.is_real() && verify_points_to(&src, &dst).is_ok() {
                debug!(content = %name, "already relocated");
                Ok(Action::Skip)
            } else {
                Err(LswapError::SourceContentIsSymlink(src))
            }
        }
    }
}

/// Check 4 for one name.
fn check_destination_entry(
    source: &Path,
    dest: &Path,
    name: &ContentName,
) -> Result<(), LswapError> {
    let src = source.join(name);
    let dst = dest.join(name);

    match inspect(&dst)? {
        EntryState::Absent => Ok(()),
        EntryState::RealEntry { .. } => Err(LswapError::DestinationContentNotSymlink(dst)),
        EntryState::SymlinkTo(_) => verify_points_to(&dst, &src)
            .map_err(|source| LswapError::DestinationSymlinkMismatch { link: dst, source }),
    }
}
