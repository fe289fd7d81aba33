//! Owned simulation instance: model, simulation time and latency memory.
//!
//! A [`Bridge`] exists only in the initialized state. Construction loads the
//! backing store and runs the reset protocol, so every later `step`, `read`
//! or `write` starts from defined sequential state.

use crate::memory::{BackingStore, LatencyMemory};
use crate::{BridgeConfig, SignalPort, SimTime};

/// One model instance with its clock bookkeeping and emulated memory.
#[derive(Debug)]
pub struct Bridge<M> {
    model: M,
    time: SimTime,
    memory: LatencyMemory,
    reset_asserted: bool,
}

impl<M: SignalPort> Bridge<M> {
    /// Takes ownership of `model`, loads `init` as backing memory and resets.
    ///
    /// On return reset is deasserted and exactly two cycles have elapsed.
    pub fn new(model: M, init: &[u32], config: &BridgeConfig) -> Self {
        let store = BackingStore::new(init, config.min_memory_words);
        log::debug!(
            "bridge init: {} image words, {} backing words",
            init.len(),
            store.len()
        );

        let mut bridge = Self {
            model,
            time: SimTime::ZERO,
            memory: LatencyMemory::new(store),
            reset_asserted: false,
        };
        bridge.reset();
        bridge
    }

    /// Runs the reset protocol: assert reset, one cycle, deassert, one cycle.
    ///
    /// All host-driven inputs are released and the memory pipeline is idled
    /// before the first reset edge.
    pub fn reset(&mut self) {
        self.memory.reset_pipeline();
        self.model.set_clk(false);
        self.model.set_bus_cs(false);
        self.model.set_bus_we(false);
        self.model.set_start(false);
        self.model.set_mem_ready(false);

        self.set_reset(true);
        self.step();
        self.set_reset(false);
        self.step();
    }

    /// Advances the model by one logical clock cycle.
    ///
    /// Order within the cycle is fixed: memory response driven, clock high,
    /// settle, request sampled into the latch, clock low, settle. Simulation
    /// time advances once per settled edge.
    pub fn step(&mut self) {
        self.memory.drive_response(&mut self.model);

        self.model.set_clk(true);
        self.model.eval();
        self.time.tick();

        self.memory.sample_request(&self.model);

        self.model.set_clk(false);
        self.model.eval();
        self.time.tick();
    }

    /// Steps `cycles` logical cycles back to back.
    pub fn step_cycles(&mut self, cycles: u32) {
        for _ in 0..cycles {
            self.step();
        }
    }

    fn set_reset(&mut self, asserted: bool) {
        self.reset_asserted = asserted;
        self.model.set_rst_n(!asserted);
    }
}

impl<M> Bridge<M> {
    /// Returns the model for sampling outputs.
    pub const fn model(&self) -> &M {
        &self.model
    }

    /// Returns the model for driving inputs between steps.
    pub const fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    /// Returns the simulation time elapsed since the model was created.
    pub const fn time(&self) -> SimTime {
        self.time
    }

    /// Returns the latency-emulated memory.
    pub const fn memory(&self) -> &LatencyMemory {
        &self.memory
    }

    /// Returns `true` while the model's reset input is asserted.
    pub const fn reset_asserted(&self) -> bool {
        self.reset_asserted
    }

    /// Releases the bridge, returning the model.
    pub fn into_model(self) -> M {
        self.model
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::Bridge;
    use crate::signal::probe::ProbePort;
    use crate::{BridgeConfig, SignalPort};

    fn probe_bridge() -> Bridge<ProbePort> {
        Bridge::new(ProbePort::default(), &[5, 7, 0, 0], &BridgeConfig::default())
    }

    #[test]
    fn construction_runs_two_reset_cycles() {
        let bridge = probe_bridge();

        assert!(!bridge.reset_asserted());
        assert_eq!(bridge.time().ticks(), 4);
        assert_eq!(bridge.time().cycles(), 2);

        let edges = &bridge.model().edges;
        assert_eq!(edges.len(), 2);
        assert!(!edges[0].rst_n);
        assert!(edges[1].rst_n);
        assert_eq!(bridge.model().evals, 4);
    }

    #[test]
    fn construction_leaves_pipeline_inactive() {
        let bridge = probe_bridge();
        assert!(!bridge.memory().latch().is_active());
        assert_eq!(bridge.memory().store().len(), 1024);
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(3)]
    #[case(250)]
    fn step_cycles_advances_two_ticks_per_cycle(#[case] cycles: u32) {
        let mut bridge = probe_bridge();
        let before = bridge.time();

        bridge.step_cycles(cycles);

        assert_eq!(bridge.time().ticks_since(before), 2 * u64::from(cycles));
    }

    #[test]
    fn request_is_answered_exactly_one_cycle_later() {
        let mut bridge = probe_bridge();
        bridge.step_cycles(3);

        bridge.model_mut().next_request = Some(1);
        bridge.step();
        bridge.step();
        bridge.step();

        let edges = &bridge.model().edges;
        let issue = edges.len() - 3;
        assert!(!edges[issue].mem_ready, "no response on the issuing edge");
        assert!(edges[issue + 1].mem_ready, "response one cycle later");
        assert_eq!(edges[issue + 1].mem_rdata, 7);
        assert!(!edges[issue + 2].mem_ready, "no response two cycles later");
    }

    #[test]
    fn reset_idles_pipeline_and_holds_time_monotonic() {
        let mut bridge = probe_bridge();
        bridge.model_mut().next_request = Some(2);
        bridge.step();
        assert!(bridge.memory().latch().is_active());
        let before = bridge.time();

        bridge.reset();

        assert!(!bridge.memory().latch().is_active());
        assert!(!bridge.reset_asserted());
        assert_eq!(bridge.time().ticks_since(before), 4);
        let last_two = &bridge.model().edges[bridge.model().edges.len() - 2..];
        assert!(!last_two[0].mem_ready);
        assert!(!last_two[1].mem_ready);
    }

    #[test]
    fn independent_bridges_do_not_share_state() {
        let mut first = probe_bridge();
        let second = probe_bridge();

        first.step_cycles(10);
        first.model_mut().set_bus_cs(true);

        assert_eq!(first.time().cycles(), 12);
        assert_eq!(second.time().cycles(), 2);
        assert_eq!(second.model().edges.len(), 2);
    }
}
