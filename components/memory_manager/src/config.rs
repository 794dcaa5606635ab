//! Heap configuration

use serde::{Deserialize, Serialize};

use crate::object::{ObjRef, OVERHEAD_WORDS};

/// Default capacity of each semispace: 1Mi words (4MB)
pub const DEFAULT_SPACE_WORDS: usize = 1024 * 1024;

/// Largest semispace a handle can address
pub const MAX_SPACE_WORDS: usize = ObjRef::MAX_OFFSET;

/// Heap configuration
///
/// Both semispaces get `space_words` words; the capacity never changes after
/// the heap is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeapConfig {
    /// Capacity of each semispace in words (default: 1Mi)
    pub space_words: usize,
    /// Run a full heap validation before and after every collection (default: false)
    pub verify_collections: bool,
}

impl Default for HeapConfig {
    fn default() -> Self {
        Self {
            space_words: DEFAULT_SPACE_WORDS,
            verify_collections: false,
        }
    }
}

impl HeapConfig {
    /// Set the semispace capacity in words
    pub fn with_space_words(mut self, space_words: usize) -> Self {
        self.space_words = space_words;
        self
    }

    /// Enable or disable validation around collections
    pub fn with_verify_collections(mut self, enabled: bool) -> Self {
        self.verify_collections = enabled;
        self
    }

    /// Checks that the configuration describes a usable heap
    pub fn check(&self) -> Result<(), String> {
        if self.space_words <= OVERHEAD_WORDS {
            return Err(format!(
                "space of {} words cannot hold any object",
                self.space_words
            ));
        }
        if self.space_words > MAX_SPACE_WORDS {
            return Err(format!(
                "space of {} words exceeds the addressable maximum of {}",
                self.space_words, MAX_SPACE_WORDS
            ));
        }
        Ok(())
    }
}
