//! Source line cache: load each file once, serve context windows from memory.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use thiserror::Error;

/// Files larger than this are treated as unreadable rather than loaded.
const DEFAULT_MAX_FILE_LEN: u64 = 4 * 1024 * 1024;

/// Why a source file failed to load. Never surfaced to callers: reads are
/// best effort, so failures are logged and cached as an empty entry.
#[derive(Debug, Error)]
enum SourceError {
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("file is {len} bytes, over the {max} byte cap")]
    TooLarge { len: u64, max: u64 },
}

/// Caches source files split into lines so repeated context lookups never
/// re-read disk.
///
/// Failed loads (missing file, unreadable file, file over the size cap) are
/// cached as empty entries, making the miss permanent for the lifetime of
/// the cache; construct a fresh cache to observe filesystem changes. The
/// cache has no eviction and grows with the number of distinct paths seen,
/// which in practice is the set of source files appearing in traces.
pub struct SourceCache {
    /// Path → lines with terminators removed. Failed loads store an empty
    /// vector so the result is served without retrying disk.
    files: Mutex<HashMap<PathBuf, Vec<String>>>,
    max_file_len: u64,
}

impl SourceCache {
    /// Empty cache with the default per-file size cap.
    pub fn new() -> Self {
        Self::with_max_file_len(DEFAULT_MAX_FILE_LEN)
    }

    /// Empty cache that treats files larger than `max_file_len` bytes as
    /// unreadable.
    pub fn with_max_file_len(max_file_len: u64) -> Self {
        Self {
            files: Mutex::new(HashMap::new()),
            max_file_len,
        }
    }

    /// Look up a context window of `context` lines on each side of the
    /// 1-based `line_number`, loading and caching the file on first use.
    ///
    /// Returns the clamped window and the index within it of the line at
    /// `line_number`. The window never reaches outside the file, however
    /// large `context` is. A missing or unreadable file, an empty file, or
    /// an out-of-range `line_number` (0, or past the end of the file) all
    /// produce an empty window and index 0.
    pub fn load(&self, path: &Path, line_number: u32, context: usize) -> (Vec<String>, usize) {
        let max_file_len = self.max_file_len;
        let mut files = self.files.lock();
        let lines = files.entry(path.to_path_buf()).or_insert_with(|| {
            read_source(path, max_file_len).unwrap_or_else(|err| {
                log::debug!("Failed to read source file '{}': {}", path.display(), err);
                Vec::new()
            })
        });
        slice_window(lines, line_number, context)
    }

    /// Number of distinct paths seen so far, including failed loads.
    pub fn len(&self) -> usize {
        self.files.lock().len()
    }

    /// Whether any path has been looked up yet.
    pub fn is_empty(&self) -> bool {
        self.files.lock().is_empty()
    }
}

impl Default for SourceCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Read a file and split it into lines without terminators.
///
/// Content is decoded lossily; a mangled snippet in a report beats no
/// snippet. A trailing newline does not produce a phantom final line.
fn read_source(path: &Path, max_len: u64) -> Result<Vec<String>, SourceError> {
    let len = fs::metadata(path)?.len();
    if len > max_len {
        return Err(SourceError::TooLarge { len, max: max_len });
    }
    let bytes = fs::read(path)?;
    let text = String::from_utf8_lossy(&bytes);
    Ok(text.lines().map(str::to_owned).collect())
}

/// Clamp a context window around a 1-based line number.
fn slice_window(lines: &[String], line_number: u32, context: usize) -> (Vec<String>, usize) {
    if line_number == 0 {
        return (Vec::new(), 0);
    }
    let line = line_number as usize - 1;
    if line >= lines.len() {
        return (Vec::new(), 0);
    }
    let start = line.saturating_sub(context);
    let end = usize::min(line.saturating_add(context).saturating_add(1), lines.len());
    (lines[start..end].to_vec(), line - start)
}
