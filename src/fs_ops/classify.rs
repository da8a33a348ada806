//! Non-dereferencing classification of a single path.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// What currently sits at a path, inspected with lstat semantics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryState {
    /// Nothing there.
    Absent,
    /// A symlink; carries the raw target as stored in the link.
    SymlinkTo(PathBuf),
    /// A file, directory or other non-symlink entry.
    RealEntry { is_dir: bool },
}

impl EntryState {
    pub fn is_real(&self) -> bool {
        matches!(self, EntryState::RealEntry { .. })
    }
}

/// Classify `path` without following a final symlink component.
///
/// Only `NotFound` counts as absence. Permission errors, ELOOP on an ancestor
/// and friends are returned to the caller.
pub fn classify(path: &Path) -> io::Result<EntryState> {
    let meta = match fs::symlink_metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(EntryState::Absent),
        Err(e) => return Err(e),
    };

    if meta.file_type().is_symlink() {
        Ok(EntryState::SymlinkTo(fs::read_link(path)?))
    } else {
        Ok(EntryState::RealEntry {
            is_dir: meta.is_dir(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;

    #[test]
    fn missing_path_is_absent() {
        let temp = assert_fs::TempDir::new().unwrap();
        let state = classify(&temp.path().join("nope")).unwrap();
        assert_eq!(state, EntryState::Absent);
    }

    #[test]
    fn file_and_dir_are_real() {
        let temp = assert_fs::TempDir::new().unwrap();
        let f = temp.child("f.txt");
        f.write_str("x").unwrap();
        let d = temp.child("d");
        d.create_dir_all().unwrap();

        assert_eq!(classify(f.path()).unwrap(), EntryState::RealEntry { is_dir: false });
        assert_eq!(classify(d.path()).unwrap(), EntryState::RealEntry { is_dir: true });
    }

    #[cfg(unix)]
    #[test]
    fn symlink_is_not_followed_even_when_dangling() {
        let temp = assert_fs::TempDir::new().unwrap();
        let link = temp.child("link");
        std::os::unix::fs::symlink("does/not/exist", link.path()).unwrap();

        let state = classify(link.path()).unwrap();
        assert_eq!(state, EntryState::SymlinkTo(PathBuf::from("does/not/exist")));
        assert!(!state.is_real());
    }

    #[cfg(unix)]
    #[test]
    fn non_notfound_errors_propagate() {
        let temp = assert_fs::TempDir::new().unwrap();
        let f = temp.child("plain");
        f.write_str("x").unwrap();
        // A regular file used as a directory yields ENOTDIR, not absence.
        let err = classify(&f.path().join("child")).unwrap_err();
        assert_ne!(err.kind(), io::ErrorKind::NotFound);
    }
}
