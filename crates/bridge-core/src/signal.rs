//! Typed named-signal adapter between the bridge and a clocked RTL model.
//!
//! The stepper, bus layer and latency memory never touch a model's concrete
//! representation. They drive inputs and sample outputs through
//! [`SignalPort`], so a generated simulator, a behavioral Rust model and a test
//! probe are interchangeable.

/// Named-signal access to a cycle-evaluated hardware model.
///
/// Setters drive input ports and take effect at the next
/// [`eval`](Self::eval). Getters return output ports as settled by the most
/// recent `eval`. Sequential logic inside the model updates on the rising
/// edge of `clk`.
pub trait SignalPort {
    /// Drives the `clk` input.
    fn set_clk(&mut self, high: bool);
    /// Drives the active-low `rst_n` input (`false` asserts reset).
    fn set_rst_n(&mut self, high: bool);
    /// Settles all model outputs for the current input values.
    fn eval(&mut self);

    /// Drives the bus chip-select line.
    fn set_bus_cs(&mut self, asserted: bool);
    /// Drives the bus write-enable line.
    fn set_bus_we(&mut self, asserted: bool);
    /// Drives the bus address lines.
    fn set_bus_addr(&mut self, addr: u32);
    /// Drives the bus write-data lines.
    fn set_bus_wdata(&mut self, data: u32);
    /// Samples the bus read-data lines.
    fn bus_rdata(&self) -> u32;

    /// Samples the memory read-enable request line.
    fn mem_rd_en(&self) -> bool;
    /// Samples the memory request address lines.
    fn mem_addr(&self) -> u32;
    /// Drives the memory response data lines.
    fn set_mem_rdata(&mut self, data: u32);
    /// Drives the memory response ready flag.
    fn set_mem_ready(&mut self, ready: bool);

    /// Drives the accelerator `start` control input.
    fn set_start(&mut self, start: bool);
    /// Drives the accelerator `node_in` data input.
    fn set_node_in(&mut self, node: u32);
    /// Samples the accelerator result output.
    fn root_out(&self) -> u32;
    /// Samples the accelerator completion flag.
    fn done(&self) -> bool;
}

/// Rising-edge detector for behavioral models evaluated on both clock phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EdgeDetector {
    last: bool,
}

impl EdgeDetector {
    /// Records `level` and reports whether it is a low-to-high transition.
    pub const fn rising(&mut self, level: bool) -> bool {
        let rose = level && !self.last;
        self.last = level;
        rose
    }
}


#[cfg(test)]
mod tests {
    use super::probe::ProbePort;
    use super::{EdgeDetector, SignalPort};

    #[test]
    fn edge_detector_reports_only_low_to_high_transitions() {
        let mut edge = EdgeDetector::default();
        assert!(!edge.rising(false));
        assert!(edge.rising(true));
        assert!(!edge.rising(true));
        assert!(!edge.rising(false));
        assert!(edge.rising(true));
    }

    #[test]
    fn requesting_port_holds_read_enable_for_one_edge() {
        let mut port = ProbePort::requesting(4);
        assert!(!port.mem_rd_en());

        port.set_clk(true);
        port.eval();
        assert!(port.mem_rd_en());
        assert_eq!(port.mem_addr(), 4);

        port.set_clk(false);
        port.eval();
        port.set_clk(true);
        port.eval();
        assert!(!port.mem_rd_en());
        assert_eq!(port.edges.len(), 2);
    }
}
