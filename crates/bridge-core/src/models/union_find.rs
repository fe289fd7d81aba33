//! Find-root accelerator reference model.
//!
//! Parent pointers live in the latency-emulated backing memory. A rising edge
//! with `start` high latches `node_in` and issues a read of its parent. Each
//! returned parent either equals the current node, which completes the walk
//! with `root_out` and `done`, or becomes the next node to read. One memory
//! round trip costs one cycle.

use crate::{EdgeDetector, SignalPort};

#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
struct Inputs {
    clk: bool,
    rst_n: bool,
    start: bool,
    node_in: u32,
    mem_rdata: u32,
    mem_ready: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Phase {
    #[default]
    Idle,
    Walk,
}

/// Union-find root walker driven through the control and memory ports.
///
/// The bus interface is not connected: writes are ignored and reads return
/// zero.
#[derive(Debug, Clone, Default)]
pub struct UnionFindAccel {
    inputs: Inputs,
    edge: EdgeDetector,
    phase: Phase,
    current: u32,
    root_out: u32,
    done: bool,
    mem_rd_en: bool,
    mem_addr: u32,
}

impl UnionFindAccel {
    /// Returns `true` while a walk is in progress.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.phase == Phase::Walk
    }

    fn on_rising_edge(&mut self) {
        let inputs = self.inputs;
        if !inputs.rst_n {
            let edge = self.edge;
            *self = Self {
                inputs,
                edge,
                ..Self::default()
            };
            return;
        }

        self.mem_rd_en = false;
        match self.phase {
            Phase::Idle if inputs.start => {
                self.current = inputs.node_in;
                self.done = false;
                self.phase = Phase::Walk;
                self.request(inputs.node_in);
            }
            Phase::Walk if inputs.mem_ready => {
                let parent = inputs.mem_rdata;
                if parent == self.current {
                    self.root_out = parent;
                    self.done = true;
                    self.phase = Phase::Idle;
                } else {
                    self.current = parent;
                    self.request(parent);
                }
            }
            Phase::Idle | Phase::Walk => {}
        }
    }

    const fn request(&mut self, node: u32) {
        self.mem_rd_en = true;
        self.mem_addr = node;
    }
}

impl SignalPort for UnionFindAccel {
    fn set_clk(&mut self, high: bool) {
        self.inputs.clk = high;
    }

    fn set_rst_n(&mut self, high: bool) {
        self.inputs.rst_n = high;
    }

    fn eval(&mut self) {
        if self.edge.rising(self.inputs.clk) {
            self.on_rising_edge();
        }
    }

    fn set_bus_cs(&mut self, _asserted: bool) {}

    fn set_bus_we(&mut self, _asserted: bool) {}

    fn set_bus_addr(&mut self, _addr: u32) {}

    fn set_bus_wdata(&mut self, _data: u32) {}

    fn bus_rdata(&self) -> u32 {
        0
    }

    fn mem_rd_en(&self) -> bool {
        self.mem_rd_en
    }

    fn mem_addr(&self) -> u32 {
        self.mem_addr
    }

    fn set_mem_rdata(&mut self, data: u32) {
        self.inputs.mem_rdata = data;
    }

    fn set_mem_ready(&mut self, ready: bool) {
        self.inputs.mem_ready = ready;
    }

    fn set_start(&mut self, start: bool) {
        self.inputs.start = start;
    }

    fn set_node_in(&mut self, node: u32) {
        self.inputs.node_in = node;
    }

    fn root_out(&self) -> u32 {
        self.root_out
    }

    fn done(&self) -> bool {
        self.done
    }
}

#[cfg(test)]
mod tests {
    use super::UnionFindAccel;
    use crate::{Bridge, BridgeConfig, SignalPort};

    fn accel_bridge(parents: &[u32]) -> Bridge<UnionFindAccel> {
        Bridge::new(UnionFindAccel::default(), parents, &BridgeConfig::default())
    }

    fn pulse_start(bridge: &mut Bridge<UnionFindAccel>, node: u32) {
        bridge.model_mut().set_start(true);
        bridge.model_mut().set_node_in(node);
        bridge.step();
        bridge.model_mut().set_start(false);
    }

    #[test]
    fn start_issues_read_of_the_requested_node() {
        let mut bridge = accel_bridge(&[0, 0, 1, 2]);

        pulse_start(&mut bridge, 3);

        assert!(bridge.model().is_busy());
        assert!(bridge.model().mem_rd_en());
        assert_eq!(bridge.model().mem_addr(), 3);
        assert_eq!(bridge.memory().latch().pending(), Some(3));
    }

    #[test]
    fn walk_takes_one_cycle_per_hop() {
        let mut bridge = accel_bridge(&[0, 0, 1, 2]);
        pulse_start(&mut bridge, 3);

        let mut cycles = 0;
        while !bridge.model().done() {
            bridge.step();
            cycles += 1;
            assert!(cycles < 16, "walk did not terminate");
        }

        assert_eq!(bridge.model().root_out(), 0);
        assert_eq!(cycles, 4);
        assert!(!bridge.model().is_busy());
    }

    #[test]
    fn bus_port_is_disconnected() {
        let mut bridge = accel_bridge(&[]);
        bridge.write(0x10, 0xDEAD_BEEF);
        assert_eq!(bridge.read(0x10), 0);
    }

    #[test]
    fn reset_abandons_walk() {
        let mut bridge = accel_bridge(&[1, 2, 3, 0]);
        pulse_start(&mut bridge, 0);
        bridge.step_cycles(2);
        assert!(bridge.model().is_busy());

        bridge.reset();

        assert!(!bridge.model().is_busy());
        assert!(!bridge.model().done());
        assert!(!bridge.memory().latch().is_active());
    }
}
