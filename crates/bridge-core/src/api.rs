//! Host-facing configuration for bridge instances.

use crate::memory::DEFAULT_MIN_MEMORY_WORDS;

/// Default cycle bound for [`DirectControl::find_root`](crate::DirectControl::find_root).
pub const DEFAULT_FIND_TIMEOUT_CYCLES: u32 = 2000;

/// Immutable configuration applied when a bridge instance is created.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct BridgeConfig {
    /// Backing-store capacity floor; shorter images are zero-extended.
    pub min_memory_words: usize,
    /// Cycles a find-root request may run before it is reported as hung.
    pub find_timeout_cycles: u32,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            min_memory_words: DEFAULT_MIN_MEMORY_WORDS,
            find_timeout_cycles: DEFAULT_FIND_TIMEOUT_CYCLES,
        }
    }
}
