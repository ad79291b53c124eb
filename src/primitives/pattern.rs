//! Text field patterns
//!
//! A pattern source is compiled once into a [`CompiledPattern`] that matches
//! the whole candidate string. [`PatternCache`] memoizes compiled patterns by
//! source; validation results never depend on whether a cache is used.

use std::collections::HashMap;
use std::sync::RwLock;

use regex::Regex;

/// A compiled, full-string text pattern
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    source: String,
    anchored: Regex,
}

impl CompiledPattern {
    /// Compile a pattern source.
    ///
    /// The source is checked on its own before anchoring so that an
    /// unbalanced group cannot be repaired by the wrapper.
    pub fn compile(source: &str) -> Result<Self, regex::Error> {
        Regex::new(source)?;
        let anchored = Regex::new(&format!("^(?:{})$", source))?;
        Ok(Self {
            source: source.to_string(),
            anchored,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Whether the entire text matches
    pub fn is_full_match(&self, text: &str) -> bool {
        self.anchored.is_match(text)
    }
}

/// Compiled patterns keyed by source string
#[derive(Debug, Default)]
pub struct PatternCache {
    patterns: RwLock<HashMap<String, CompiledPattern>>,
}

impl PatternCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached pattern, compiling and inserting it on a miss.
    ///
    /// Compile failures are not cached. A poisoned lock degrades to
    /// compiling without the cache.
    pub fn get_or_compile(&self, source: &str) -> Result<CompiledPattern, regex::Error> {
        if let Ok(patterns) = self.patterns.read() {
            if let Some(pattern) = patterns.get(source) {
                return Ok(pattern.clone());
            }
        }

        let pattern = CompiledPattern::compile(source)?;
        if let Ok(mut patterns) = self.patterns.write() {
            patterns.insert(source.to_string(), pattern.clone());
        }
        Ok(pattern)
    }

    /// Number of cached patterns
    pub fn len(&self) -> usize {
        self.patterns.read().map(|p| p.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
