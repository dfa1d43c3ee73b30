//! Content-addressed cache for parsed declarations.
//!
//! Keyed by source file path and validated by a blake3 fingerprint of the
//! file's current content: a stale or unreadable file is a miss, never an
//! error, so the cache degrades to "always re-parse" on I/O trouble. The
//! underlying map is concurrent — the parse phase hashes and caches files
//! in parallel.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use serde::Serialize;
use tracing::debug;

use crate::model::ClassInfo;

struct CacheEntry {
    fingerprint: blake3::Hash,
    classes: Vec<ClassInfo>,
}

/// Cache observability counters.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
}

#[derive(Default)]
pub struct FingerprintCache {
    entries: DashMap<PathBuf, CacheEntry>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl FingerprintCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached declarations for a file, if its content fingerprint still
    /// matches. Anything else — no entry, changed content, unreadable
    /// file — counts as a miss.
    pub fn get(&self, path: &Path) -> Option<Vec<ClassInfo>> {
        if let Some(entry) = self.entries.get(path) {
            if let Some(current) = fingerprint(path) {
                if current == entry.fingerprint {
                    self.hits.fetch_add(1, Ordering::Relaxed);
                    debug!(path = %path.display(), "cache hit");
                    return Some(entry.classes.clone());
                }
            }
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    /// Store declarations alongside the file's current fingerprint. A file
    /// that cannot be hashed is simply not cached.
    pub fn put(&self, path: &Path, classes: Vec<ClassInfo>) {
        if let Some(hash) = fingerprint(path) {
            debug!(path = %path.display(), classes = classes.len(), "cached parse result");
            self.entries.insert(
                path.to_path_buf(),
                CacheEntry {
                    fingerprint: hash,
                    classes,
                },
            );
        }
    }

    pub fn invalidate(&self, path: &Path) {
        self.entries.remove(path);
    }

    /// Drop all entries and reset the counters.
    pub fn clear(&self) {
        self.entries.clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }

    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        CacheStats {
            entries: self.entries.len(),
            hits,
            misses,
            hit_rate: if total > 0 {
                hits as f64 / total as f64
            } else {
                0.0
            },
        }
    }
}

fn fingerprint(path: &Path) -> Option<blake3::Hash> {
    fs::read(path).ok().map(|bytes| blake3::hash(&bytes))
}
