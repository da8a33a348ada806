//! I/O helper utilities.
//!
//! Turns io::Error values into actionable one-line diagnostics with
//! platform-aware hints. Used for config-file errors and for the final
//! message printed by the binary.

use std::io;
use std::path::Path;

/// Hint for a raw OS error code or, failing that, the error kind.
pub fn io_hint(e: &io::Error) -> Option<&'static str> {
    if let Some(code) = e.raw_os_error() {
        #[cfg(unix)]
        {
            let hint = match code {
                libc::EACCES | libc::EPERM => {
                    Some("permission denied; check ownership and write permissions.")
                }
                libc::EXDEV => Some(
                    "cross-filesystem; atomic rename not possible, keep both roots on one filesystem.",
                ),
                libc::EBUSY => Some("resource busy; a mount point or open handle is in the way."),
                libc::ENOENT => Some("path not found; verify it exists."),
                libc::EEXIST => Some("already exists; remove the entry or pick another name."),
                libc::ENOTEMPTY => Some("directory not empty."),
                libc::EINVAL => Some("invalid argument; cannot move a directory into itself."),
                libc::ENOSPC => Some("insufficient space on device."),
                libc::EROFS => Some("read-only filesystem; cannot write here."),
                libc::ELOOP => {
                    Some("too many symbolic link levels (ELOOP); possible symlink cycle.")
                }
                libc::ENAMETOOLONG => Some("filename or path too long; shorten path segments."),
                libc::ENOTDIR => Some("a path component is not a directory."),
                _ => None,
            };
            if hint.is_some() {
                return hint;
            }
        }
        #[cfg(windows)]
        {
            let hint = match code {
                5 => Some("access denied; check permissions."), // ERROR_ACCESS_DENIED
                17 => Some("not same device; cross-filesystem move."), // ERROR_NOT_SAME_DEVICE
                32 => Some("sharing violation; file is in use."), // ERROR_SHARING_VIOLATION
                2 | 3 => Some("path not found; verify it exists."), // FILE/ PATH NOT FOUND
                80 | 183 => Some("already exists; remove the entry or pick another name."),
                1314 => Some(
                    "creating symlinks needs Developer Mode or SeCreateSymbolicLinkPrivilege.",
                ), // ERROR_PRIVILEGE_NOT_HELD
                _ => None,
            };
            if hint.is_some() {
                return hint;
            }
        }
        #[cfg(not(any(unix, windows)))]
        let _ = code;
    }

    match e.kind() {
        io::ErrorKind::PermissionDenied => {
            Some("permission denied; check ownership and write permissions.")
        }
        io::ErrorKind::NotFound => Some("path not found; verify it exists."),
        io::ErrorKind::AlreadyExists => {
            Some("already exists; remove the entry or pick another name.")
        }
        _ => None,
    }
}

/// "<op> '<path>': <error>; <hint> [os code: N]"
pub fn describe_io_error(op: &str, path: &Path, e: &io::Error) -> String {
    let mut msg = format!("{} '{}': {}", op, path.display(), e);
    if let Some(hint) = io_hint(e) {
        msg.push_str("; ");
        msg.push_str(hint);
    }
    if let Some(code) = e.raw_os_error() {
        msg.push_str(&format!(" [os code: {}]", code));
    }
    msg
}
