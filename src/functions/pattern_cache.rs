use crate::error::EvalError;
use log::debug;
use lru::LruCache;
use regex::Regex;
use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard, PoisonError};

pub const DEFAULT_PATTERN_CACHE_CAPACITY: usize = 100;

/// Bounded cache of compiled regular expressions keyed by pattern text.
///
/// Eviction is first-in first-out: lookups go through `peek`, which never
/// refreshes an entry, so the least recently *inserted* pattern is the one
/// dropped when the cache is full.
#[derive(Debug)]
pub struct PatternCache {
    patterns: Mutex<LruCache<String, Regex>>,
}

impl PatternCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            patterns: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Returns the compiled pattern, compiling and caching it on a miss.
    pub fn get_or_compile(&self, pattern: &str) -> Result<Regex, EvalError> {
        if let Some(regex) = self.lock().peek(pattern) {
            return Ok(regex.clone());
        }

        debug!("Compiling pattern: {pattern}");
        let regex = Regex::new(pattern).map_err(|source| EvalError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;

        let mut patterns = self.lock();
        if patterns.contains(pattern) {
            return Ok(regex);
        }
        if let Some((evicted, _)) = patterns.push(pattern.to_string(), regex.clone()) {
            debug!("Pattern cache full, evicted: {evicted}");
        }
        Ok(regex)
    }

    /// Whether `pattern` would be served without compiling.
    pub fn contains(&self, pattern: &str) -> bool {
        self.lock().contains(pattern)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.lock().cap().get()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, LruCache<String, Regex>> {
        self.patterns.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for PatternCache {
    fn default() -> Self {
        Self::new(DEFAULT_PATTERN_CACHE_CAPACITY)
    }
}
