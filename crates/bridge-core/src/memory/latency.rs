//! One-cycle-latency synchronous memory emulation.
//!
//! The model raises `mem_rd_en` with an address during cycle `C`. The request
//! is sampled right after the rising edge of `C` into a single-slot
//! [`PipelineLatch`], and the data is driven with `mem_ready` before the
//! rising edge of `C + 1`. The latch must trail the model's request by exactly
//! one cycle.

use crate::memory::BackingStore;
use crate::SignalPort;

/// Read request sampled on the previous cycle, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct PipelineLatch {
    pending: Option<u32>,
}

impl PipelineLatch {
    /// Returns the latched address when a read was requested last cycle.
    #[must_use]
    pub const fn pending(self) -> Option<u32> {
        self.pending
    }

    /// Returns `true` when a response is due this cycle.
    #[must_use]
    pub const fn is_active(self) -> bool {
        self.pending.is_some()
    }

    /// Replaces the latch with the request seen this cycle.
    pub const fn load(&mut self, rd_en: bool, addr: u32) {
        self.pending = if rd_en { Some(addr) } else { None };
    }

    /// Drops any pending request.
    pub const fn clear(&mut self) {
        self.pending = None;
    }
}

/// Backing store plus the pipeline latch that delays its responses.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LatencyMemory {
    store: BackingStore,
    latch: PipelineLatch,
}

impl LatencyMemory {
    /// Wraps `store` with an inactive pipeline.
    #[must_use]
    pub const fn new(store: BackingStore) -> Self {
        Self {
            store,
            latch: PipelineLatch { pending: None },
        }
    }

    /// Returns the backing store.
    #[must_use]
    pub const fn store(&self) -> &BackingStore {
        &self.store
    }

    /// Returns the current pipeline latch.
    #[must_use]
    pub const fn latch(&self) -> PipelineLatch {
        self.latch
    }

    /// Drives the response for last cycle's request. Call before `clk` rises.
    ///
    /// Addresses outside the backing store answer zero with `mem_ready`
    /// still asserted.
    pub fn drive_response<M: SignalPort + ?Sized>(&self, model: &mut M) {
        match self.latch.pending() {
            Some(addr) => {
                model.set_mem_rdata(self.store.word(addr));
                model.set_mem_ready(true);
            }
            None => model.set_mem_ready(false),
        }
    }

    /// Samples this cycle's request. Call after the rising-edge `eval`.
    pub fn sample_request<M: SignalPort + ?Sized>(&mut self, model: &M) {
        self.latch.load(model.mem_rd_en(), model.mem_addr());
    }

    /// Returns the pipeline to its idle state.
    pub fn reset_pipeline(&mut self) {
        self.latch.clear();
    }
}
