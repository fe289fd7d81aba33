/// Number of evaluated clock edges in one logical cycle.
pub const TICKS_PER_CYCLE: u64 = 2;

/// Monotonic simulation time, counted in evaluated clock edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct SimTime(u64);

impl SimTime {
    /// Time at model creation.
    pub const ZERO: Self = Self(0);

    /// Builds a time value from a raw edge count.
    #[must_use]
    pub const fn from_ticks(ticks: u64) -> Self {
        Self(ticks)
    }

    /// Returns the number of evaluated edges.
    #[must_use]
    pub const fn ticks(self) -> u64 {
        self.0
    }

    /// Returns the number of completed logical cycles.
    #[must_use]
    pub const fn cycles(self) -> u64 {
        self.0 / TICKS_PER_CYCLE
    }

    /// Returns the edges elapsed since `earlier`.
    #[must_use]
    pub const fn ticks_since(self, earlier: Self) -> u64 {
        self.0.wrapping_sub(earlier.0)
    }

    /// Advances by one evaluated edge.
    ///
    /// Wraps at `u64::MAX`. Debug builds treat the wrap as fatal.
    pub fn tick(&mut self) {
        let next = self.0.wrapping_add(1);
        debug_assert!(next != 0, "simulation time overflowed");
        self.0 = next;
    }
}
