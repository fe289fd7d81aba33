//! Backing storage for the latency-emulated memory interface.

/// One-cycle-latency request pipeline.
pub mod latency;

pub use latency::{LatencyMemory, PipelineLatch};

/// Minimum backing-store capacity in words.
pub const DEFAULT_MIN_MEMORY_WORDS: usize = 1024;

/// Fixed-capacity word array served to the model's memory interface.
///
/// Contents are fixed at construction. Host writes travel over the bus
/// interface, which is a separate address space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackingStore {
    words: Box<[u32]>,
}

impl BackingStore {
    /// Copies `init` and zero-extends it to at least `min_words` entries.
    #[must_use]
    pub fn new(init: &[u32], min_words: usize) -> Self {
        let mut words = init.to_vec();
        if words.len() < min_words {
            words.resize(min_words, 0);
        }
        Self {
            words: words.into_boxed_slice(),
        }
    }

    /// Returns the capacity in words.
    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Returns `true` when the store holds no words.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Returns the word at `addr`, or zero when `addr` is outside the store.
    #[must_use]
    pub fn word(&self, addr: u32) -> u32 {
        usize::try_from(addr)
            .ok()
            .and_then(|index| self.words.get(index))
            .copied()
            .unwrap_or(0)
    }

    /// Returns the full contents.
    #[must_use]
    pub fn as_slice(&self) -> &[u32] {
        &self.words
    }
}

impl Default for BackingStore {
    fn default() -> Self {
        Self::new(&[], DEFAULT_MIN_MEMORY_WORDS)
    }
}
