use std::collections::HashMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// Derives the stable cache key for one named quantity of one orientation.
///
/// The orientation name already embeds the conformer name and the 1-based
/// orientation index, so re-runs with identical configuration always hit the
/// same keys.
pub fn cache_key(orientation_name: &str, quantity: &str) -> String {
    format!("{orientation_name}_{quantity}")
}

/// A pluggable store for intermediate numeric arrays (grids, ESP values).
///
/// A load must either return the stored values exactly or report a miss;
/// corrupt entries are misses, never errors, so a damaged cache degrades to
/// recomputation. Stores are best-effort: a failed write must not abort the
/// pipeline.
pub trait ArrayCache: Send + Sync {
    fn load(&self, key: &str) -> Option<Vec<f64>>;
    fn store(&self, key: &str, values: &[f64]);
}

/// A cache that never hits; every quantity is recomputed.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullCache;

impl ArrayCache for NullCache {
    fn load(&self, _key: &str) -> Option<Vec<f64>> {
        None
    }

    fn store(&self, _key: &str, _values: &[f64]) {}
}

/// An in-memory cache, mainly useful for tests and single-process reuse.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, Vec<f64>>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ArrayCache for MemoryCache {
    fn load(&self, key: &str) -> Option<Vec<f64>> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    fn store(&self, key: &str, values: &[f64]) {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), values.to_vec());
    }
}

/// A directory-backed cache storing one whitespace-separated text file per
/// key.
///
/// Values are written with shortest-roundtrip formatting, so every f64 is
/// recovered bit-exactly on load.
#[derive(Debug, Clone)]
pub struct DirCache {
    root: PathBuf,
}

impl DirCache {
    /// Opens (creating if needed) a cache rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> std::io::Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.dat"))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ArrayCache for DirCache {
    fn load(&self, key: &str) -> Option<Vec<f64>> {
        let path = self.path_for(key);
        let content = std::fs::read_to_string(&path).ok()?;
        let mut values = Vec::new();
        for token in content.split_whitespace() {
            match token.parse::<f64>() {
                Ok(value) => values.push(value),
                Err(_) => {
                    warn!(
                        key,
                        path = %path.display(),
                        "corrupt cache entry, falling back to recomputation"
                    );
                    return None;
                }
            }
        }
        Some(values)
    }

    fn store(&self, key: &str, values: &[f64]) {
        let mut content = String::with_capacity(values.len() * 24);
        for value in values {
            // {:?} is shortest-roundtrip for f64.
            let _ = writeln!(content, "{value:?}");
        }
        if let Err(e) = std::fs::write(self.path_for(key), content) {
            warn!(key, error = %e, "failed to write cache entry");
        }
    }
}
