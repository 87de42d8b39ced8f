//! Page-level response cache.
//!
//! Stores API responses for server-rendered pages (home showcase, detail
//! pages, magazines) as JSON files. Entries are stamped with their store
//! time and treated as a miss once older than the freshness window.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// On-disk envelope around a cached value
#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry<T> {
    stored_at: DateTime<Utc>,
    data: T,
}

/// Cache for API responses
pub struct ResponseCache {
    /// Root cache directory
    cache_dir: PathBuf,
    /// Whether caching is enabled
    enabled: bool,
    /// Freshness window (None = never expires)
    expiration: Option<Duration>,
}

impl ResponseCache {
    /// Create a new response cache
    pub fn new(
        cache_dir: impl AsRef<Path>,
        enabled: bool,
        expiration_seconds: Option<u64>,
    ) -> Result<Self> {
        let cache_dir = cache_dir.as_ref().to_path_buf();

        if enabled {
            std::fs::create_dir_all(&cache_dir).with_context(|| {
                format!("Failed to create cache directory: {}", cache_dir.display())
            })?;
            info!(
                cache_dir = %cache_dir.display(),
                expiration_seconds = ?expiration_seconds,
                "Cache initialized"
            );
        }

        let expiration = expiration_seconds
            .map(|secs| Duration::seconds(i64::try_from(secs).unwrap_or(i64::MAX).min(i64::MAX / 1000)));

        Ok(Self {
            cache_dir,
            enabled,
            expiration,
        })
    }

    /// Get a cached item if it exists and is still fresh
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        if !self.enabled {
            return Ok(None);
        }

        let path = self.cache_path(key);
        if !path.exists() {
            debug!(key = key, "Cache miss");
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read cache file: {}", path.display()))?;

        let entry: CacheEntry<T> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse cache file: {}", path.display()))?;

        if self.is_expired(entry.stored_at) {
            debug!(key = key, stored_at = %entry.stored_at, "Cache expired");
            return Ok(None);
        }

        debug!(key = key, "Cache hit");
        Ok(Some(entry.data))
    }

    /// Store an item in the cache
    pub fn set<T: Serialize>(&self, key: &str, data: &T) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        let path = self.cache_path(key);
        let entry = CacheEntry {
            stored_at: Utc::now(),
            data,
        };

        let content =
            serde_json::to_string_pretty(&entry).context("Failed to serialize cache data")?;

        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write cache file: {}", path.display()))?;

        debug!(key = key, path = %path.display(), "Cache stored");
        Ok(())
    }

    fn is_expired(&self, stored_at: DateTime<Utc>) -> bool {
        match self.expiration {
            Some(window) => Utc::now() - stored_at >= window,
            None => false,
        }
    }

    /// Get the cache file path for a given key
    fn cache_path(&self, key: &str) -> PathBuf {
        // Sanitize key to create valid filename
        let safe_key = key
            .replace(['/', '\\', ':', '*', '?', '"', '<', '>', '|', '&', '='], "_")
            .replace("__", "_");

        self.cache_dir.join(format!("{}.json", safe_key))
    }

    /// Clear all cache
    pub fn clear(&self) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        if self.cache_dir.exists() {
            std::fs::remove_dir_all(&self.cache_dir).with_context(|| {
                format!("Failed to remove cache directory: {}", self.cache_dir.display())
            })?;
            std::fs::create_dir_all(&self.cache_dir).with_context(|| {
                format!("Failed to recreate cache directory: {}", self.cache_dir.display())
            })?;
            info!("Cache cleared");
        }

        Ok(())
    }

    /// Get cache statistics
    pub fn stats(&self) -> Result<CacheStats> {
        if !self.enabled || !self.cache_dir.exists() {
            return Ok(CacheStats {
                total_files: 0,
                total_size_bytes: 0,
            });
        }

        let mut total_files = 0;
        let mut total_size_bytes = 0;

        for entry in std::fs::read_dir(&self.cache_dir)? {
            let entry = entry?;
            if entry.path().is_file() {
                total_files += 1;
                total_size_bytes += entry.metadata()?.len();
            }
        }

        Ok(CacheStats {
            total_files,
            total_size_bytes,
        })
    }
}

/// Cache statistics
#[derive(Debug, Clone)]
pub struct CacheStats {
    pub total_files: usize,
    pub total_size_bytes: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct TestData {
        id: u32,
        name: String,
    }

    fn data() -> TestData {
        TestData {
            id: 1,
            name: "test".to_string(),
        }
    }

    #[test]
    fn test_cache_enabled() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let cache = ResponseCache::new(temp_dir.path(), true, Some(3600))?;

        cache.set("top_anime", &data())?;

        let retrieved: Option<TestData> = cache.get("top_anime")?;
        assert_eq!(retrieved, Some(data()));

        Ok(())
    }

    #[test]
    fn test_cache_disabled() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let cache = ResponseCache::new(temp_dir.path(), false, None)?;

        // Store should succeed but do nothing
        cache.set("top_anime", &data())?;

        let retrieved: Option<TestData> = cache.get("top_anime")?;
        assert_eq!(retrieved, None);

        Ok(())
    }

    #[test]
    fn test_cache_miss() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let cache = ResponseCache::new(temp_dir.path(), true, None)?;

        let retrieved: Option<TestData> = cache.get("nonexistent")?;
        assert_eq!(retrieved, None);

        Ok(())
    }

    #[test]
    fn test_stale_entry_is_a_miss() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let cache = ResponseCache::new(temp_dir.path(), true, Some(3600))?;

        let stale = CacheEntry {
            stored_at: Utc::now() - Duration::hours(2),
            data: data(),
        };
        std::fs::write(cache.cache_path("anime_1"), serde_json::to_string(&stale)?)?;

        let retrieved: Option<TestData> = cache.get("anime_1")?;
        assert_eq!(retrieved, None);

        // Without a window the same entry is still served
        let permanent = ResponseCache::new(temp_dir.path(), true, None)?;
        let retrieved: Option<TestData> = permanent.get("anime_1")?;
        assert_eq!(retrieved, Some(data()));

        Ok(())
    }

    #[test]
    fn test_zero_window_expires_immediately() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let cache = ResponseCache::new(temp_dir.path(), true, Some(0))?;

        cache.set("magazines", &data())?;
        let retrieved: Option<TestData> = cache.get("magazines")?;
        assert_eq!(retrieved, None);

        Ok(())
    }

    #[test]
    fn test_cache_key_sanitized() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let cache = ResponseCache::new(temp_dir.path(), true, None)?;

        let path = cache.cache_path("/magazines?limit=25");
        assert_eq!(path.file_name().unwrap(), "_magazines_limit_25.json");

        Ok(())
    }

    #[test]
    fn test_cache_clear_and_stats() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let cache = ResponseCache::new(temp_dir.path().join("cache"), true, None)?;

        assert_eq!(cache.stats()?.total_files, 0);

        cache.set("top_anime", &data())?;
        cache.set("top_manga", &data())?;

        let stats = cache.stats()?;
        assert_eq!(stats.total_files, 2);
        assert!(stats.total_size_bytes > 0);

        cache.clear()?;
        assert_eq!(cache.stats()?.total_files, 0);

        Ok(())
    }
}
