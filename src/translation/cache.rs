/*!
 * Translation caching functionality.
 *
 * Caption tracks repeat themselves ("Thank you.", "Okay."). The cache keeps
 * one translation per distinct sentence and language pair for the lifetime
 * of a service so repeats cost no API calls.
 */

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use parking_lot::RwLock;
use log::debug;

/// Cache key combining source text, source language, and target language
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    source_text: String,
    source_language: String,
    target_language: String,
}

impl CacheKey {
    fn new(source_text: &str, source_language: &str, target_language: &str) -> Self {
        Self {
            source_text: source_text.trim().to_string(),
            source_language: source_language.to_lowercase(),
            target_language: target_language.to_lowercase(),
        }
    }
}

/// Shared, cloneable translation cache
#[derive(Debug, Clone)]
pub struct TranslationCache {
    entries: Arc<RwLock<HashMap<CacheKey, String>>>,
    hits: Arc<AtomicUsize>,
    misses: Arc<AtomicUsize>,
    enabled: bool,
}

impl TranslationCache {
    /// Create a new translation cache
    pub fn new(enabled: bool) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            hits: Arc::new(AtomicUsize::new(0)),
            misses: Arc::new(AtomicUsize::new(0)),
            enabled,
        }
    }

    /// Get a translation from the cache
    pub fn get(&self, source_text: &str, source_language: &str, target_language: &str) -> Option<String> {
        if !self.enabled {
            return None;
        }

        let key = CacheKey::new(source_text, source_language, target_language);
        let found = self.entries.read().get(&key).cloned();

        match &found {
            Some(_) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!("Cache hit for '{}' ({} -> {})", truncate_text(source_text, 30), source_language, target_language);
            },
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
            },
        }

        found
    }

    /// Store a translation in the cache
    pub fn store(&self, source_text: &str, source_language: &str, target_language: &str, translation: &str) {
        if !self.enabled {
            return;
        }

        let key = CacheKey::new(source_text, source_language, target_language);
        self.entries.write().insert(key, translation.to_string());
    }

    /// Hits, misses and hit rate
    pub fn stats(&self) -> (usize, usize, f64) {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;

        let hit_rate = if total > 0 {
            hits as f64 / total as f64
        } else {
            0.0
        };

        (hits, misses, hit_rate)
    }

    /// Get the number of entries in the cache
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Check if the cache is enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Default for TranslationCache {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Truncate text to a maximum number of characters with ellipsis
pub(crate) fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        format!("{}...", text.chars().take(max_chars).collect::<String>())
    }
}
