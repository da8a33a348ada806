//! Filesystem operations: resolve roots, preflight, relocate.

mod classify;
mod content;
mod helpers;
mod preflight;
mod relocate;
mod resolve;
mod verify;

pub use classify::{EntryState, classify};
pub use content::{ContentList, ContentName};
pub use helpers::{describe_io_error, io_hint};
pub use preflight::{Action, Plan, PlannedEntry, check_roots, validate};
pub use relocate::{Report, relocate};
pub use resolve::{clean, resolve_abs_path};
pub use verify::verify_points_to;

use tracing::info;

use crate::errors::LswapError;

/// Knobs shared by preflight and relocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SwapOptions {
    /// Log every action but do not touch the filesystem.
    pub dry_run: bool,
    /// Accept names that were moved by an earlier, interrupted run but not yet
    /// linked back (source absent, destination real) and only relink them.
    pub resume: bool,
}

/// Full run: resolve both roots, preflight every name, then relocate.
///
/// Nothing is mutated unless preflight passes for the whole list.
pub fn swap(
    from: &str,
    to: &str,
    contents: &ContentList,
    opts: &SwapOptions,
) -> Result<Report, LswapError> {
    let source = resolve_abs_path(from)?;
    let dest = resolve_abs_path(to)?;
    info!(from = %source.display(), to = %dest.display(), %contents, "resolved roots");

    let plan = validate(&source, &dest, contents, opts)?;
    if plan.is_noop() {
        info!("all contents already relocated; nothing to do");
    } else {
        info!(dry_run = opts.dry_run, "starting work");
    }
    relocate(&plan, opts)
}
