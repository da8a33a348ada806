//! The mutating half: unlink, move, link.
//!
//! Each phase walks the whole plan before the next one starts. The first
//! failure aborts; there is no rollback. Only call this with a plan returned
//! by `preflight::validate` for the same roots.

use std::io;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::errors::LswapError;
use crate::platform::{create_symlink, fsync_dir, remove_symlink};

use super::SwapOptions;
use super::content::ContentName;
use super::preflight::{Action, Plan};

/// What a run did (or, with dry-run, would have done).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    /// Moved to the destination and linked back.
    pub relocated: Vec<ContentName>,
    /// Already at the destination; only the source link was recreated.
    pub relinked: Vec<ContentName>,
    /// Already relocated by an earlier run; untouched.
    pub skipped: Vec<ContentName>,
    pub dry_run: bool,
}

impl Report {
    pub fn changed_anything(&self) -> bool {
        !self.dry_run && !(self.relocated.is_empty() && self.relinked.is_empty())
    }
}

pub fn relocate(plan: &Plan, opts: &SwapOptions) -> Result<Report, LswapError> {
    let dry_run = opts.dry_run;

    unlink_phase(plan, dry_run)?;
    move_phase(plan, dry_run)?;
    link_phase(plan, dry_run)?;

    let names = |action: Action| -> Vec<ContentName> {
        plan.with_actions(&[action]).map(|e| e.name.clone()).collect()
    };
    Ok(Report {
        relocated: names(Action::Relocate),
        relinked: names(Action::LinkOnly),
        skipped: names(Action::Skip),
        dry_run,
    })
}

/// Clear destination slots. Preflight guarantees anything still there is a
/// symlink back to the source.
fn unlink_phase(plan: &Plan, dry_run: bool) -> Result<(), LswapError> {
    for entry in plan.with_actions(&[Action::Relocate]) {
        let dst = plan.dest_path(&entry.name);
        match std::fs::symlink_metadata(&dst) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
            Err(source) => return Err(LswapError::Unlink { path: dst, source }),
            Ok(_) => {}
        }

        if dry_run {
            info!(path = %dst.display(), "dry-run: would remove stale symlink");
            continue;
        }
        remove_symlink(&dst).map_err(|source| LswapError::Unlink {
            path: dst.clone(),
            source,
        })?;
        info!(path = %dst.display(), "Removed stale symlink");
    }
    Ok(())
}

fn move_phase(plan: &Plan, dry_run: bool) -> Result<(), LswapError> {
    let mut moved = 0usize;
    let mut failure = None;
    for entry in plan.with_actions(&[Action::Relocate]) {
        let src = plan.source_path(&entry.name);
        let dst = plan.dest_path(&entry.name);

        if dry_run {
            info!(src = %src.display(), dest = %dst.display(), "dry-run: would move");
            continue;
        }
        if let Err(source) = std::fs::rename(&src, &dst) {
            failure = Some(LswapError::Move {
                from: src,
                to: dst,
                source,
            });
            break;
        }
        moved += 1;
        info!(src = %src.display(), dest = %dst.display(), "Renamed atomically");
    }

    // Renames that went through are synced even when a later one failed.
    if moved > 0 {
        sync_root(&plan.dest);
        sync_root(&plan.source);
    }
    match failure {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn link_phase(plan: &Plan, dry_run: bool) -> Result<(), LswapError> {
    for entry in plan.with_actions(&[Action::Relocate, Action::LinkOnly]) {
        let link = plan.source_path(&entry.name);
        let target = plan.dest_path(&entry.name);

        if dry_run {
            info!(
                link = %link.display(),
                target = %target.display(),
                "dry-run: would create symlink"
            );
            continue;
        }
        create_symlink(&target, &link).map_err(|source| LswapError::Link {
            link: link.clone(),
            target: target.clone(),
            source,
        })?;
        info!(link = %link.display(), target = %target.display(), "Created symlink");
    }
    Ok(())
}

/// Best-effort: a failed fsync must not turn a completed rename into an error.
fn sync_root(dir: &Path) {
    match fsync_dir(dir) {
        Ok(()) => debug!(dir = %dir.display(), "fsynced directory"),
        Err(e) => warn!(dir = %dir.display(), error = %e, "fsync of directory failed"),
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::fs_ops::content::ContentList;
    use crate::fs_ops::preflight::validate;
    use assert_fs::prelude::*;
    use std::fs;
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    #[derive(Clone)]
    struct BufferWriter(Arc<Mutex<Vec<u8>>>);

    impl Write for BufferWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn moves_then_links_back() {
        let temp = assert_fs::TempDir::new().unwrap();
        let a = temp.child("a");
        let b = temp.child("b");
        a.child("pkg/lib.rs").write_str("fn main() {}").unwrap();
        a.child("README").write_str("hi").unwrap();
        b.create_dir_all().unwrap();

        let list: ContentList = "pkg,README".parse().unwrap();
        let opts = SwapOptions::default();
        let plan = validate(a.path(), b.path(), &list, &opts).unwrap();
        let report = relocate(&plan, &opts).unwrap();

        assert_eq!(report.relocated.len(), 2);
        assert!(report.changed_anything());
        assert_eq!(
            fs::read_to_string(b.path().join("pkg/lib.rs")).unwrap(),
            "fn main() {}"
        );
        assert_eq!(fs::read_link(a.path().join("pkg")).unwrap(), b.path().join("pkg"));
        assert_eq!(
            fs::read_link(a.path().join("README")).unwrap(),
            b.path().join("README")
        );
    }

    #[test]
    fn dry_run_changes_nothing() {
        let temp = assert_fs::TempDir::new().unwrap();
        let a = temp.child("a");
        let b = temp.child("b");
        a.child("pkg").create_dir_all().unwrap();
        b.create_dir_all().unwrap();

        let list: ContentList = "pkg".parse().unwrap();
        let opts = SwapOptions {
            dry_run: true,
            ..SwapOptions::default()
        };
        let plan = validate(a.path(), b.path(), &list, &opts).unwrap();
        let report = relocate(&plan, &opts).unwrap();

        assert!(report.dry_run);
        assert!(!report.changed_anything());
        assert!(fs::symlink_metadata(a.path().join("pkg")).unwrap().is_dir());
        assert!(!b.path().join("pkg").exists());
    }

    #[test]
    fn stale_back_link_is_replaced() {
        let temp = assert_fs::TempDir::new().unwrap();
        let a = temp.child("a");
        let b = temp.child("b");
        a.child("pkg/f").write_str("x").unwrap();
        b.create_dir_all().unwrap();
        std::os::unix::fs::symlink(a.path().join("pkg"), b.path().join("pkg")).unwrap();

        let list: ContentList = "pkg".parse().unwrap();
        let opts = SwapOptions::default();
        let plan = validate(a.path(), b.path(), &list, &opts).unwrap();
        relocate(&plan, &opts).unwrap();

        let dst_meta = fs::symlink_metadata(b.path().join("pkg")).unwrap();
        assert!(dst_meta.is_dir());
        assert!(fs::symlink_metadata(a.path().join("pkg")).unwrap().file_type().is_symlink());
        assert_eq!(fs::read_to_string(a.path().join("pkg/f")).unwrap(), "x");
    }

    #[test]
    fn link_phase_failure_surfaces_as_mutation_error() {
        let temp = assert_fs::TempDir::new().unwrap();
        let a = temp.child("a");
        let b = temp.child("b");
        a.child("pkg").create_dir_all().unwrap();
        b.create_dir_all().unwrap();

        let list: ContentList = "pkg".parse().unwrap();
        let opts = SwapOptions::default();
        let plan = validate(a.path(), b.path(), &list, &opts).unwrap();
        // Something reappears at the source between preflight and the link phase.
        fs::rename(a.path().join("pkg"), b.path().join("pkg")).unwrap();
        fs::write(a.path().join("pkg"), "squatter").unwrap();
        let plan = Plan {
            entries: plan
                .entries
                .into_iter()
                .map(|mut e| {
                    e.action = Action::LinkOnly;
                    e
                })
                .collect(),
            ..plan
        };

        let err = relocate(&plan, &opts).unwrap_err();
        assert!(matches!(err, LswapError::Link { .. }));
        assert_eq!(err.kind(), crate::errors::ErrorKind::Mutation);
    }

    #[test]
    fn failed_rename_still_syncs_earlier_moves() {
        let temp = assert_fs::TempDir::new().unwrap();
        let a = temp.child("a");
        let b = temp.child("b");
        a.child("first/f").write_str("1").unwrap();
        a.child("second").create_dir_all().unwrap();
        b.create_dir_all().unwrap();

        let list: ContentList = "first,second".parse().unwrap();
        let opts = SwapOptions::default();
        let plan = validate(a.path(), b.path(), &list, &opts).unwrap();
        // Vanishes after preflight, so the second rename fails.
        fs::remove_dir(a.path().join("second")).unwrap();

        let buf = Arc::new(Mutex::new(Vec::new()));
        let make_writer = {
            let buf = buf.clone();
            move || BufferWriter(buf.clone())
        };
        let subscriber = tracing_subscriber::fmt()
            .with_writer(make_writer)
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        let err = tracing::subscriber::with_default(subscriber, || relocate(&plan, &opts))
            .unwrap_err();

        assert!(
            matches!(err, LswapError::Move { ref from, .. } if *from == a.path().join("second"))
        );
        assert!(b.path().join("first/f").exists());
        let logs = String::from_utf8(buf.lock().unwrap().clone()).unwrap();
        assert!(logs.contains("fsynced directory"), "{logs}");
        assert!(!logs.contains("Created symlink"), "{logs}");
    }
}
