//! Confirming that a symlink leads to an expected origin.
//!
//! The comparison is by filesystem identity, never by path string, so a link
//! written as `/mnt/x/pkg` still matches an origin reached as `/data/x/pkg`
//! through a bind mount or symlinked ancestor.

use std::path::{Path, PathBuf};
use tracing::debug;

use crate::errors::VerificationError;
use crate::platform::file_identity;

use super::classify::{EntryState, classify};

/// Check that `link` is a symlink whose target (one dereference) is the same
/// filesystem object as `origin`.
pub fn verify_points_to(link: &Path, origin: &Path) -> Result<(), VerificationError> {
    let raw_target = match classify(link) {
        Ok(EntryState::SymlinkTo(t)) => t,
        Ok(_) => return Err(VerificationError::NotASymlink(link.to_path_buf())),
        Err(source) => {
            return Err(VerificationError::Inspect {
                path: link.to_path_buf(),
                source,
            });
        }
    };
    let target = link_target_path(link, &raw_target);

    // lstat the target: the link itself is the single allowed dereference.
    let target_id =
        file_identity(&target, false).map_err(|source| VerificationError::BrokenLink {
            link: link.to_path_buf(),
            target: target.clone(),
            source,
        })?;
    let origin_id =
        file_identity(origin, false).map_err(|source| VerificationError::OriginMissing {
            origin: origin.to_path_buf(),
            source,
        })?;

    if target_id != origin_id {
        return Err(VerificationError::MismatchedTarget {
            link: link.to_path_buf(),
            target,
            origin: origin.to_path_buf(),
        });
    }

    debug!(link = %link.display(), origin = %origin.display(), "symlink verified");
    Ok(())
}

/// Relative link targets are interpreted from the directory holding the link.
pub(crate) fn link_target_path(link: &Path, raw_target: &Path) -> PathBuf {
    if raw_target.is_absolute() {
        return raw_target.to_path_buf();
    }
    match link.parent() {
        Some(parent) => parent.join(raw_target),
        None => raw_target.to_path_buf(),
    }
}
