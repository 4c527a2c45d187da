//! Index persistence - cache read/write operations.
//!
//! The cache is a versioned postcard-encoded payload compressed with zstd,
//! written atomically (temp file + rename). File paths can leak directory
//! structure and usernames, so the cache file is created with owner-only
//! permissions.
//!
//! A missing cache file is reported distinctly from a present-but-invalid
//! one: missing means the caller should rebuild, invalid is a hard failure.

use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, ErrorKind};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScoutError};

/// Cache format version - increment when changing the format.
pub const INDEX_FORMAT_VERSION: u32 = 1;

/// Name of the cache file under the home directory.
pub const INDEX_FILE_NAME: &str = ".filescout-index";

/// Zstd compression level for cache writes.
const COMPRESSION_LEVEL: i32 = 6;

/// Persistent storage format for the file index.
#[derive(Deserialize)]
struct PersistedIndex {
    version: u32,
    #[allow(dead_code)]
    saved_at: u64,
    entries: Vec<String>,
}

/// Borrowed counterpart of [`PersistedIndex`] used on the write path.
#[derive(Serialize)]
struct PersistedIndexRef<'a> {
    version: u32,
    saved_at: u64,
    entries: &'a [String],
}

/// Writes the file index to `path`.
///
/// The payload is written to a sibling temp file first and renamed into
/// place so a crash mid-write never leaves a truncated cache behind.
pub fn save_index(path: &Path, entries: &[String]) -> Result<()> {
    let storage = PersistedIndexRef {
        version: INDEX_FORMAT_VERSION,
        saved_at: unix_now_secs(),
        entries,
    };

    let tmp_path = path.with_extension("tmp");
    {
        let output = create_private(&tmp_path)?;
        let encoder = zstd::Encoder::new(output, COMPRESSION_LEVEL)?;
        let mut output = BufWriter::new(encoder.auto_finish());
        postcard::to_io(&storage, &mut output)
            .map_err(|error| ScoutError::Serialization(format!("encode index: {error}")))?;
    }
    fs::rename(&tmp_path, path)?;

    debug!(
        "wrote index cache to {} ({} entries)",
        path.display(),
        entries.len()
    );
    Ok(())
}

/// Loads the file index from `path`.
///
/// Returns [`ScoutError::IndexMissing`] when the file does not exist and
/// [`ScoutError::CorruptIndex`] when it exists but does not decode as a
/// current-version index.
pub fn load_index(path: &Path) -> Result<Vec<String>> {
    let input = match File::open(path) {
        Ok(file) => file,
        Err(error) if error.kind() == ErrorKind::NotFound => {
            return Err(ScoutError::IndexMissing(path.to_path_buf()))
        }
        Err(error) => return Err(error.into()),
    };

    let decoder = zstd::Decoder::new(input)
        .map_err(|error| corrupt(path, format!("decompress: {error}")))?;
    let mut input = BufReader::new(decoder);
    let mut scratch = vec![0u8; 4 * 1024];

    let storage: PersistedIndex = match postcard::from_io((&mut input, &mut scratch)) {
        Ok((storage, _)) => storage,
        Err(error) => return Err(corrupt(path, format!("decode: {error}"))),
    };

    if storage.version != INDEX_FORMAT_VERSION {
        return Err(corrupt(
            path,
            format!(
                "version mismatch: {} != {}",
                storage.version, INDEX_FORMAT_VERSION
            ),
        ));
    }

    debug!(
        "loaded index cache from {} ({} entries)",
        path.display(),
        storage.entries.len()
    );
    Ok(storage.entries)
}

fn corrupt(path: &Path, reason: String) -> ScoutError {
    ScoutError::CorruptIndex {
        path: path.to_path_buf(),
        reason,
    }
}

/// Creates (or truncates) `path` readable and writable by the owner only.
#[cfg(unix)]
fn create_private(path: &Path) -> Result<File> {
    use std::os::unix::fs::OpenOptionsExt;

    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    Ok(file)
}

#[cfg(not(unix))]
fn create_private(path: &Path) -> Result<File> {
    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)?;
    Ok(file)
}

/// Returns the current Unix timestamp in seconds.
fn unix_now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|value| value.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn cache_path(temp: &TempDir) -> std::path::PathBuf {
        temp.path().join(INDEX_FILE_NAME)
    }

    #[test]
    fn save_then_load_round_trips() {
        let temp = TempDir::new().unwrap();
        let path = cache_path(&temp);
        let entries = vec![
            "/home/user/notes/todo.txt".to_string(),
            "/home/user/photos/cat.jpg".to_string(),
        ];

        save_index(&path, &entries).unwrap();
        let loaded = load_index(&path).unwrap();
        assert_eq!(loaded, entries);
    }

    #[test]
    fn empty_index_round_trips() {
        let temp = TempDir::new().unwrap();
        let path = cache_path(&temp);

        save_index(&path, &[]).unwrap();
        let loaded = load_index(&path).unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn missing_file_is_reported_as_missing() {
        let temp = TempDir::new().unwrap();
        let path = cache_path(&temp);

        let error = load_index(&path).expect_err("load should fail");
        assert!(matches!(error, ScoutError::IndexMissing(_)));
    }

    #[test]
    fn garbage_bytes_are_reported_as_corrupt() {
        let temp = TempDir::new().unwrap();
        let path = cache_path(&temp);
        fs::write(&path, b"this is definitely not a cache").unwrap();

        let error = load_index(&path).expect_err("load should fail");
        assert!(matches!(error, ScoutError::CorruptIndex { .. }));
    }

    #[test]
    fn version_mismatch_is_reported_as_corrupt() {
        let temp = TempDir::new().unwrap();
        let path = cache_path(&temp);

        let storage = PersistedIndexRef {
            version: INDEX_FORMAT_VERSION + 1,
            saved_at: unix_now_secs(),
            entries: &["/home/user/a.txt".to_string()],
        };
        let encoded = postcard::to_stdvec(&storage).unwrap();
        let compressed = zstd::stream::encode_all(encoded.as_slice(), COMPRESSION_LEVEL).unwrap();
        fs::write(&path, compressed).unwrap();

        let error = load_index(&path).expect_err("load should fail");
        assert!(matches!(error, ScoutError::CorruptIndex { .. }));
    }

    #[test]
    fn save_replaces_previous_contents() {
        let temp = TempDir::new().unwrap();
        let path = cache_path(&temp);

        save_index(&path, &["/home/user/old.txt".to_string()]).unwrap();
        save_index(&path, &["/home/user/new.txt".to_string()]).unwrap();

        let loaded = load_index(&path).unwrap();
        assert_eq!(loaded, vec!["/home/user/new.txt".to_string()]);
    }

    #[test]
    fn built_index_round_trips_through_the_cache() {
        let cache_dir = TempDir::new().unwrap();
        let tree = TempDir::new().unwrap();
        fs::write(tree.path().join("doc.txt"), b"x").unwrap();

        let path = cache_path(&cache_dir);
        assert!(!path.exists());

        let files = crate::indexer::build_file_index(tree.path()).unwrap();
        assert!(!files.is_empty());
        save_index(&path, &files).unwrap();
        assert_eq!(load_index(&path).unwrap(), files);
    }

    #[cfg(unix)]
    #[test]
    fn cache_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let path = cache_path(&temp);
        save_index(&path, &["/home/user/a.txt".to_string()]).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
