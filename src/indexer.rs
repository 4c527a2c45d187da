//! Filesystem walk that builds the flat file index.
//!
//! The walk visits every entry under the root once, in discovery order.
//! Hidden-named directories are pruned wholesale (their entire subtree is
//! skipped, not merely hidden from results) and symbolic links are never
//! added or followed. Per-entry failures are counted and skipped; only a
//! failure to open the root itself aborts the build.

use std::ffi::OsStr;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::time::Instant;

use log::{debug, info};

use crate::error::{Result, ScoutError};

/// How often (in files) a progress line is emitted during the walk.
pub const PROGRESS_EVERY: usize = 10_000;

/// Counters accumulated over one walk.
#[derive(Debug, Default, Clone, Copy)]
pub struct WalkStats {
    pub files: usize,
    pub dirs: usize,
    pub errors: usize,
}

/// Walks `root` and returns the absolute paths of every non-directory,
/// non-symlink entry reachable from it, in discovery order.
pub fn build_file_index(root: &Path) -> Result<Vec<String>> {
    let started = Instant::now();
    let mut files = Vec::new();
    let mut stats = WalkStats::default();

    let entries = fs::read_dir(root).map_err(|source| ScoutError::WalkRoot {
        path: root.to_path_buf(),
        source,
    })?;
    walk_entries(entries, &mut files, &mut stats);

    if stats.files >= PROGRESS_EVERY {
        // End the carriage-return progress line.
        eprintln!();
    }
    info!(
        "indexed {} files ({} dirs, {} errors) in {:.2?}",
        stats.files,
        stats.dirs,
        stats.errors,
        started.elapsed()
    );
    Ok(files)
}

fn walk_entries(entries: fs::ReadDir, files: &mut Vec<String>, stats: &mut WalkStats) {
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(error) => {
                stats.errors += 1;
                debug!("skipping unreadable entry: {error}");
                continue;
            }
        };

        let file_type = match entry.file_type() {
            Ok(file_type) => file_type,
            Err(error) => {
                stats.errors += 1;
                debug!("skipping {}: {error}", entry.path().display());
                continue;
            }
        };

        // Symlinks are never added and never followed.
        if file_type.is_symlink() {
            continue;
        }

        if file_type.is_dir() {
            if is_hidden(&entry.file_name()) {
                continue;
            }
            stats.dirs += 1;
            match fs::read_dir(entry.path()) {
                Ok(children) => walk_entries(children, files, stats),
                Err(error) => {
                    stats.errors += 1;
                    debug!("cannot read {}: {error}", entry.path().display());
                }
            }
        } else {
            files.push(entry.path().to_string_lossy().into_owned());
            stats.files += 1;
            if stats.files % PROGRESS_EVERY == 0 {
                eprint!("\rIndexed {} files...", stats.files);
                let _ = io::stderr().flush();
            }
        }
    }
}

fn is_hidden(name: &OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use tempfile::TempDir;

    fn index_of(root: &Path) -> Vec<String> {
        build_file_index(root).expect("walk should succeed")
    }

    #[test]
    fn collects_files_in_nested_directories() {
        let temp = TempDir::new().unwrap();
        File::create(temp.path().join("top.txt")).unwrap();
        fs::create_dir(temp.path().join("sub")).unwrap();
        File::create(temp.path().join("sub/inner.log")).unwrap();

        let files = index_of(temp.path());
        assert_eq!(files.len(), 2);
        assert!(files.iter().any(|path| path.ends_with("top.txt")));
        assert!(files.iter().any(|path| path.ends_with("inner.log")));
    }

    #[test]
    fn hidden_directories_are_pruned_entirely() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join(".git")).unwrap();
        File::create(temp.path().join(".git/config")).unwrap();
        fs::create_dir(temp.path().join(".git/objects")).unwrap();
        File::create(temp.path().join(".git/objects/pack")).unwrap();
        File::create(temp.path().join("visible.txt")).unwrap();

        let files = index_of(temp.path());
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("visible.txt"));
        assert!(!files.iter().any(|path| path.contains(".git")));
    }

    #[test]
    fn hidden_files_outside_hidden_directories_are_indexed() {
        let temp = TempDir::new().unwrap();
        File::create(temp.path().join(".bashrc")).unwrap();

        let files = index_of(temp.path());
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with(".bashrc"));
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_are_neither_added_nor_followed() {
        use std::os::unix::fs::symlink;

        let temp = TempDir::new().unwrap();
        let outside = TempDir::new().unwrap();
        File::create(outside.path().join("secret.txt")).unwrap();
        File::create(temp.path().join("real.txt")).unwrap();
        symlink(outside.path(), temp.path().join("escape")).unwrap();
        symlink(temp.path().join("real.txt"), temp.path().join("alias.txt")).unwrap();

        let files = index_of(temp.path());
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("real.txt"));
    }

    #[test]
    fn unreadable_root_is_a_fatal_walk_error() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("does-not-exist");

        let error = build_file_index(&missing).expect_err("walk should fail");
        assert!(matches!(error, ScoutError::WalkRoot { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_subdirectory_is_skipped_not_fatal() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        File::create(temp.path().join("ok.txt")).unwrap();
        let locked = temp.path().join("locked");
        fs::create_dir(&locked).unwrap();
        File::create(locked.join("hidden-from-walk.txt")).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        if fs::read_dir(&locked).is_ok() {
            // Running as root; permission bits are not enforced.
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let files = build_file_index(temp.path());

        // Restore permissions so TempDir cleanup can remove the tree.
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        let files = files.expect("walk should survive unreadable subtree");
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("ok.txt"));
    }
}
