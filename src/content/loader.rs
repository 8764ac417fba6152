//! Content loader - reads a directory of data files into a [`ContentIndex`]

use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;
use walkdir::WalkDir;

use super::{relaxed, ContentError, ContentIndex};

/// Worker count used when the host parallelism cannot be detected
const DEFAULT_WORKERS: usize = 4;

/// Data-file suffix used when none is configured
pub const DEFAULT_EXTENSION: &str = "json";

/// Loads every data file in one directory, in parallel
#[derive(Debug, Clone)]
pub struct ContentLoader {
    dir: PathBuf,
    extensions: Vec<String>,
    workers: usize,
}

impl ContentLoader {
    /// Create a loader for `dir` that picks up `*.json` files
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            extensions: vec![DEFAULT_EXTENSION.to_string()],
            workers: default_workers(),
        }
    }

    /// Replace the set of eligible file suffixes (without the leading dot)
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions
            .into_iter()
            .map(|e| e.into().trim_start_matches('.').to_string())
            .filter(|e| !e.is_empty())
            .collect();
        self
    }

    /// Cap the worker pool at `workers` threads (at least one)
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Read and parse every eligible file
    ///
    /// Blocks until all files are loaded or one of them fails. A single
    /// failure fails the whole load and no partial index is returned.
    pub fn load(&self) -> Result<ContentIndex, ContentError> {
        let files = self.eligible_files()?;
        if files.is_empty() {
            tracing::debug!("No data files in {:?}", self.dir);
            return Ok(ContentIndex::default());
        }

        let workers = self.workers.min(files.len());
        let next = AtomicUsize::new(0);
        let failed = AtomicBool::new(false);

        let (shared_files, next, failed) = (&files, &next, &failed);
        let results: Vec<Result<Vec<(String, Value)>, ContentError>> = thread::scope(|scope| {
            let handles: Vec<_> = (0..workers)
                .map(|_| scope.spawn(move || run_worker(shared_files, next, failed)))
                .collect();

            handles
                .into_iter()
                .map(|handle| match handle.join() {
                    Ok(result) => result,
                    Err(panic) => std::panic::resume_unwind(panic),
                })
                .collect()
        });

        // Each worker owns its batch; merging happens here once all have finished.
        // Two files with the same stem race and the later merge wins.
        let mut groups = BTreeMap::new();
        for batch in results {
            for (name, value) in batch? {
                if groups.insert(name.clone(), value).is_some() {
                    tracing::warn!("Content group {:?} defined by more than one file", name);
                }
            }
        }

        tracing::info!(
            "Loaded {} content group(s) from {:?} with {} worker(s)",
            groups.len(),
            self.dir,
            workers
        );

        Ok(ContentIndex::from_groups(groups))
    }

    /// List the data files directly inside the directory
    fn eligible_files(&self) -> Result<Vec<PathBuf>, ContentError> {
        let metadata =
            fs::metadata(&self.dir).map_err(|e| ContentError::unavailable(&self.dir, e))?;
        if !metadata.is_dir() {
            return Err(ContentError::unavailable(
                &self.dir,
                io::Error::new(io::ErrorKind::Other, "not a directory"),
            ));
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(&self.dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(self.dir.as_path()).to_path_buf();
                ContentError::unavailable(path, e.into())
            })?;

            // Only entries with a data suffix are resolved; everything else is never touched.
            let path = entry.path();
            if !self.is_data_file(path) {
                continue;
            }

            let file_type = entry.file_type();
            if file_type.is_symlink() {
                let target = fs::metadata(path).map_err(|e| ContentError::unavailable(path, e))?;
                if !target.is_file() {
                    continue;
                }
            } else if !file_type.is_file() {
                continue;
            }

            files.push(path.to_path_buf());
        }

        files.sort();
        Ok(files)
    }

    /// Suffix match on the whole file name, so `.json` itself counts as a data file
    fn is_data_file(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .map(|name| {
                self.extensions
                    .iter()
                    .any(|ext| name.len() > ext.len() && name.ends_with(&format!(".{}", ext)))
            })
            .unwrap_or(false)
    }
}

/// Pull files off the shared cursor until the list is drained or a sibling fails
fn run_worker(
    files: &[PathBuf],
    next: &AtomicUsize,
    failed: &AtomicBool,
) -> Result<Vec<(String, Value)>, ContentError> {
    let mut loaded = Vec::new();

    while !failed.load(Ordering::Relaxed) {
        let i = next.fetch_add(1, Ordering::Relaxed);
        let Some(path) = files.get(i) else {
            break;
        };

        match load_file(path) {
            Ok(pair) => loaded.push(pair),
            Err(e) => {
                failed.store(true, Ordering::Relaxed);
                return Err(e);
            }
        }
    }

    Ok(loaded)
}

/// Read one data file and return its group name with the parsed document
fn load_file(path: &Path) -> Result<(String, Value), ContentError> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();

    let bytes = fs::read(path).map_err(|e| ContentError::unavailable(path, e))?;
    let text = String::from_utf8(bytes).map_err(|e| ContentError::malformed(&file_name, e))?;
    let value = relaxed::parse(&text).map_err(|e| ContentError::malformed(&file_name, e))?;

    tracing::debug!("Parsed {} as group {:?}", file_name, name);
    Ok((name, value))
}

fn default_workers() -> usize {
    thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(DEFAULT_WORKERS)
}
