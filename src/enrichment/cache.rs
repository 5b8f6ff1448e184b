//! ASIN lookup disk cache.
//!
//! Caches search results to avoid repeated requests to the search page.
//! Uses `"{title}|{author}"` as the cache key and remembers failed searches
//! too (stored as `null`), so a pair is searched at most once for the
//! lifetime of the cache file.
//!
//! The whole map is loaded at startup and rewritten after every change.
//! A missing or corrupt file is treated as an empty cache.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::domain::{Asin, CacheEntry};

/// Separator between title and author in cache keys.
///
/// Titles containing `|` can collide with other pairs.
const KEY_DELIMITER: char = '|';

/// Build the cache key for a title/author pair.
pub fn cache_key(title: &str, author: &str) -> String {
    format!("{title}{KEY_DELIMITER}{author}")
}

/// Entry counts, split by outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub found: usize,
    pub not_found: usize,
}

/// Persistent title/author → ASIN cache.
#[derive(Debug, Default)]
pub struct AsinCache {
    /// Backing file; `None` keeps the cache in memory only
    path: Option<PathBuf>,
    entries: BTreeMap<String, CacheEntry>,
}

impl AsinCache {
    /// Load the cache stored at `path`.
    ///
    /// Never fails: unreadable or unparsable files yield an empty cache, and
    /// the file is recreated on the next write.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();

        let entries = match fs::read_to_string(&path) {
            Ok(contents) => parse_entries(&contents, &path),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("No ASIN cache at {:?}, starting empty", path);
                BTreeMap::new()
            }
            Err(e) => {
                tracing::warn!("Failed to read ASIN cache {:?}: {}", path, e);
                BTreeMap::new()
            }
        };

        tracing::debug!("Loaded {} cached ASIN lookups from {:?}", entries.len(), path);
        Self {
            path: Some(path),
            entries,
        }
    }

    /// Create a cache that is never written to disk.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Default cache file location (user cache directory).
    pub fn default_path() -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from(".cache"))
            .join("series-minder")
            .join("asin_cache.json")
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Look up a previous search for this pair.
    pub fn lookup(&self, title: &str, author: &str) -> Option<CacheEntry> {
        self.entries.get(&cache_key(title, author)).cloned()
    }

    /// Remember a search outcome and write the cache to disk.
    ///
    /// `None` records a failed search. Overwrites any previous entry.
    pub fn record(&mut self, title: &str, author: &str, result: Option<&Asin>) {
        self.entries
            .insert(cache_key(title, author), result.cloned().into());
        self.persist();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        self.entries
            .values()
            .fold(CacheStats::default(), |mut stats, entry| {
                match entry {
                    CacheEntry::Found(_) => stats.found += 1,
                    CacheEntry::NotFound => stats.not_found += 1,
                }
                stats
            })
    }

    /// Forget every entry, including failures, and write the empty cache.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.persist();
    }

    /// Write to disk, logging instead of failing. The in-memory map stays
    /// authoritative for the rest of the process.
    fn persist(&self) {
        let Some(path) = &self.path else {
            return;
        };

        if let Err(e) = self.save(path) {
            tracing::warn!("Failed to save ASIN cache to {:?}: {}", path, e);
        }
    }

    fn save(&self, path: &Path) -> io::Result<()> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }

        let raw: BTreeMap<&str, Option<&str>> = self
            .entries
            .iter()
            .map(|(key, entry)| (key.as_str(), entry.asin().map(Asin::as_str)))
            .collect();
        let contents = serde_json::to_string(&raw).map_err(io::Error::other)?;

        // Write atomically (write to temp, then rename)
        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, contents)?;
        fs::rename(&temp_path, path)
    }
}

/// Decode the on-disk map. Values that are neither `null` nor a valid ASIN
/// are dropped, which makes those pairs eligible for a fresh search.
fn parse_entries(contents: &str, path: &Path) -> BTreeMap<String, CacheEntry> {
    let raw: BTreeMap<String, Option<String>> = match serde_json::from_str(contents) {
        Ok(raw) => raw,
        Err(e) => {
            tracing::warn!("Ignoring corrupt ASIN cache {:?}: {}", path, e);
            return BTreeMap::new();
        }
    };

    raw.into_iter()
        .filter_map(|(key, value)| match value {
            None => Some((key, CacheEntry::NotFound)),
            Some(value) => match Asin::parse(&value) {
                Some(asin) => Some((key, CacheEntry::Found(asin))),
                None => {
                    tracing::warn!("Dropping invalid cached ASIN {:?} for {:?}", value, key);
                    None
                }
            },
        })
        .collect()
}
