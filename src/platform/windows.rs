//! Windows implementations of platform helpers.
//!
//! Notes:
//! - Creating symlinks needs Developer Mode or SeCreateSymbolicLinkPrivilege.
//! - Directory and file symlinks are distinct kinds; the kind follows the target.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::os::windows::fs::{FileTypeExt, OpenOptionsExt};
use std::os::windows::io::AsRawHandle;
use std::path::Path;

use windows_sys::Win32::Storage::FileSystem::{
    BY_HANDLE_FILE_INFORMATION, FILE_FLAG_BACKUP_SEMANTICS, FILE_FLAG_OPEN_REPARSE_POINT,
    GetFileInformationByHandle,
};

use super::FileIdentity;

/// Open log file for appending (best-effort; no symlink defense available via std on Windows).
pub fn open_log_file_secure_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// (volume serial, file index) of `path`. With `follow == false` a reparse
/// point is opened itself instead of its target.
pub fn file_identity(path: &Path, follow: bool) -> io::Result<FileIdentity> {
    // BACKUP_SEMANTICS is required to open directory handles.
    let mut flags = FILE_FLAG_BACKUP_SEMANTICS;
    if !follow {
        flags |= FILE_FLAG_OPEN_REPARSE_POINT;
    }
    let file = OpenOptions::new()
        .access_mode(0)
        .custom_flags(flags)
        .open(path)?;

    // SAFETY: the handle is owned by `file` and stays open for the call;
    // `info` is a plain C struct the API fills in.
    let mut info: BY_HANDLE_FILE_INFORMATION = unsafe { std::mem::zeroed() };
    let ok = unsafe { GetFileInformationByHandle(file.as_raw_handle() as _, &mut info) };
    if ok == 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(FileIdentity {
        dev: u64::from(info.dwVolumeSerialNumber),
        ino: (u64::from(info.nFileIndexHigh) << 32) | u64::from(info.nFileIndexLow),
    })
}

/// Create `link` pointing at `target`, choosing a directory or file symlink
/// based on what `target` currently is.
pub fn create_symlink(target: &Path, link: &Path) -> io::Result<()> {
    if fs::metadata(target)?.is_dir() {
        std::os::windows::fs::symlink_dir(target, link)
    } else {
        std::os::windows::fs::symlink_file(target, link)
    }
}

/// Remove a symlink (or any entry) without following it. Directory symlinks
/// must be removed with RemoveDirectory.
pub fn remove_symlink(path: &Path) -> io::Result<()> {
    let meta = fs::symlink_metadata(path)?;
    if meta.file_type().is_symlink_dir() {
        fs::remove_dir(path)
    } else {
        fs::remove_file(path)
    }
}

/// No-op on Windows; directory handles cannot be flushed via std.
pub fn fsync_dir(_dir: &Path) -> io::Result<()> {
    Ok(())
}
