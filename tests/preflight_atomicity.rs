#![cfg(unix)]

//! Every input that fails preflight must leave both trees exactly as they were.

use lswap::{ContentList, ErrorKind, LswapError, SwapOptions, swap};
use std::collections::BTreeMap;
use std::fs;
use std::os::unix::fs::symlink;
use std::path::{Path, PathBuf};
use tempfile::tempdir;
use walkdir::WalkDir;

/// Relative path -> "dir" | "file:<contents>" | "link:<target>"
fn snapshot(root: &Path) -> BTreeMap<PathBuf, String> {
    WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .map(|e| e.expect("walk"))
        .map(|e| {
            let rel = e.path().strip_prefix(root).unwrap().to_path_buf();
            let ft = e.file_type();
            let desc = if ft.is_symlink() {
                format!("link:{}", fs::read_link(e.path()).unwrap().display())
            } else if ft.is_dir() {
                "dir".to_string()
            } else {
                format!("file:{}", fs::read_to_string(e.path()).unwrap())
            };
            (rel, desc)
        })
        .collect()
}

struct World {
    _td: tempfile::TempDir,
    base: PathBuf,
    a: PathBuf,
    b: PathBuf,
}

impl World {
    fn new() -> Self {
        let td = tempdir().unwrap();
        let base = fs::canonicalize(td.path()).unwrap();
        let a = base.join("a");
        let b = base.join("b");
        fs::create_dir_all(a.join("pkg")).unwrap();
        fs::write(a.join("pkg/data.txt"), "payload").unwrap();
        fs::create_dir_all(a.join("bin")).unwrap();
        fs::create_dir_all(&b).unwrap();
        Self { _td: td, base, a, b }
    }

    /// Run with `contents` and assert it fails with `kind` leaving the tree untouched.
    fn assert_rejected(&self, from: &Path, to: &Path, contents: &str) -> LswapError {
        let before = snapshot(&self.base);
        let list: ContentList = contents.parse().unwrap();
        let err = swap(
            from.to_str().unwrap(),
            to.to_str().unwrap(),
            &list,
            &SwapOptions::default(),
        )
        .unwrap_err();
        assert_eq!(snapshot(&self.base), before, "tree changed after: {err}");
        err
    }
}

#[test]
fn missing_later_name_leaves_earlier_names_alone() {
    let w = World::new();
    let err = w.assert_rejected(&w.a, &w.b, "pkg,bin,ghost");
    assert!(matches!(err, LswapError::MissingSourceContent(_)));
    assert_eq!(err.kind(), ErrorKind::Preflight);
}

#[test]
fn destination_conflict_on_last_name_blocks_everything() {
    let w = World::new();
    fs::create_dir_all(w.b.join("bin")).unwrap();
    let err = w.assert_rejected(&w.a, &w.b, "pkg,bin");
    assert!(matches!(err, LswapError::DestinationContentNotSymlink(_)));
}

#[test]
fn source_symlink_is_refused() {
    let w = World::new();
    let elsewhere = w.base.join("elsewhere");
    fs::create_dir_all(&elsewhere).unwrap();
    symlink(&elsewhere, w.a.join("lnk")).unwrap();
    let err = w.assert_rejected(&w.a, &w.b, "pkg,lnk");
    assert!(matches!(err, LswapError::SourceContentIsSymlink(_)));
}

#[test]
fn broken_destination_symlink_is_refused() {
    let w = World::new();
    symlink(w.base.join("vanished"), w.b.join("pkg")).unwrap();
    let err = w.assert_rejected(&w.a, &w.b, "pkg");
    assert!(matches!(
        err,
        LswapError::DestinationSymlinkMismatch {
            source: lswap::VerificationError::BrokenLink { .. },
            ..
        }
    ));
}

#[test]
fn symlinked_root_is_refused() {
    let w = World::new();
    let alias = w.base.join("alias_b");
    symlink(&w.b, &alias).unwrap();
    let err = w.assert_rejected(&w.a, &alias, "pkg");
    assert!(matches!(err, LswapError::RootIsSymlink(_)));
    assert_eq!(err.kind(), ErrorKind::RootValidation);
}

#[test]
fn file_root_is_refused() {
    let w = World::new();
    let file = w.base.join("plain");
    fs::write(&file, "x").unwrap();
    let err = w.assert_rejected(&w.a, &file, "pkg");
    assert!(matches!(err, LswapError::RootNotDirectory(_)));
}

#[test]
fn destination_inside_content_through_symlink_is_refused() {
    let w = World::new();
    fs::create_dir_all(w.a.join("pkg/inner")).unwrap();
    let alias = w.base.join("x");
    symlink(w.a.join("pkg"), &alias).unwrap();

    let err = w.assert_rejected(&w.a, &alias.join("inner"), "bin,pkg");
    assert!(matches!(err, LswapError::ContentContainsDestination { .. }), "got {err}");
    assert_eq!(err.kind(), ErrorKind::Preflight);
}
