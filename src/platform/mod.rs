//! Platform-specific helpers.
//! This module hides OS differences (Unix/Windows) behind a uniform API so
//! the rest of the codebase can remain platform-agnostic.

#[cfg(unix)]
mod unix;
#[cfg(not(unix))]
mod windows;

#[cfg(unix)]
pub use unix::{
    create_symlink, file_identity, fsync_dir, open_log_file_secure_append, remove_symlink,
};

#[cfg(not(unix))]
pub use windows::{
    create_symlink, file_identity, fsync_dir, open_log_file_secure_append, remove_symlink,
};

/// Identity of a filesystem object: two paths with equal identities reach the
/// same underlying file or directory, whatever their spelling.
///
/// Unix: (st_dev, st_ino). Windows: (volume serial number, file index).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileIdentity {
    pub dev: u64,
    pub ino: u64,
}
