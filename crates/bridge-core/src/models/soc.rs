//! Bus-slave reference model with a scratch register window and a fetch unit.
//!
//! Register map, word addressed:
//!
//! | Address | Register | Access |
//! |---|---|---|
//! | `0x000..=0x0FF` | scratch | R/W |
//! | `0x100` | [`FETCH_ADDR`] | R/W, a write issues one memory read |
//! | `0x101` | [`FETCH_DATA`] | R |
//! | `0x102` | [`FETCH_STATUS`] | R |
//!
//! Anything else reads as zero and ignores writes. All registers update on
//! the rising edge from pre-edge values, so a bus read in the same cycle a
//! fetch completes still returns the previous `FETCH_DATA`.

use crate::{EdgeDetector, SignalPort};

/// Number of plain read/write registers starting at address zero.
pub const SCRATCH_WORDS: usize = 256;
/// Writing a word address here issues one memory read request.
pub const FETCH_ADDR: u32 = 0x100;
/// Word captured by the most recent completed fetch.
pub const FETCH_DATA: u32 = 0x101;
/// Fetch unit status bits.
pub const FETCH_STATUS: u32 = 0x102;
/// [`FETCH_STATUS`] bit: `FETCH_DATA` holds a completed fetch.
pub const FETCH_STATUS_VALID: u32 = 1 << 0;
/// [`FETCH_STATUS`] bit: a fetch is waiting for `mem_ready`.
pub const FETCH_STATUS_PENDING: u32 = 1 << 1;

#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
struct Inputs {
    clk: bool,
    rst_n: bool,
    bus_cs: bool,
    bus_we: bool,
    bus_addr: u32,
    bus_wdata: u32,
    mem_rdata: u32,
    mem_ready: bool,
}

/// Register-file system on chip used as the default server model.
#[derive(Debug, Clone)]
pub struct ScratchpadSoc {
    inputs: Inputs,
    edge: EdgeDetector,
    scratch: Box<[u32]>,
    bus_rdata: u32,
    fetch_addr: u32,
    fetch_data: u32,
    fetch_valid: bool,
    fetch_pending: bool,
    mem_rd_en: bool,
    mem_addr: u32,
}

impl Default for ScratchpadSoc {
    fn default() -> Self {
        Self {
            inputs: Inputs::default(),
            edge: EdgeDetector::default(),
            scratch: vec![0; SCRATCH_WORDS].into_boxed_slice(),
            bus_rdata: 0,
            fetch_addr: 0,
            fetch_data: 0,
            fetch_valid: false,
            fetch_pending: false,
            mem_rd_en: false,
            mem_addr: 0,
        }
    }
}

impl ScratchpadSoc {
    /// Returns the word captured by the last completed fetch.
    #[must_use]
    pub const fn fetch_data(&self) -> u32 {
        self.fetch_data
    }

    /// Returns the current [`FETCH_STATUS`] bits.
    #[must_use]
    pub const fn fetch_status(&self) -> u32 {
        let mut status = 0;
        if self.fetch_valid {
            status |= FETCH_STATUS_VALID;
        }
        if self.fetch_pending {
            status |= FETCH_STATUS_PENDING;
        }
        status
    }

    fn register(&self, addr: u32) -> u32 {
        match addr {
            FETCH_ADDR => self.fetch_addr,
            FETCH_DATA => self.fetch_data,
            FETCH_STATUS => self.fetch_status(),
            _ => scratch_index(addr).map_or(0, |index| self.scratch[index]),
        }
    }

    fn clear_state(&mut self) {
        self.scratch.fill(0);
        self.bus_rdata = 0;
        self.fetch_addr = 0;
        self.fetch_data = 0;
        self.fetch_valid = false;
        self.fetch_pending = false;
        self.mem_rd_en = false;
        self.mem_addr = 0;
    }

    fn on_rising_edge(&mut self) {
        let inputs = self.inputs;
        if !inputs.rst_n {
            self.clear_state();
            return;
        }

        let bus_write = inputs.bus_cs && inputs.bus_we;
        let bus_read = inputs.bus_cs && !inputs.bus_we;
        let issue = bus_write && inputs.bus_addr == FETCH_ADDR;
        let captured = (self.fetch_pending && inputs.mem_ready).then_some(inputs.mem_rdata);

        if bus_read {
            self.bus_rdata = self.register(inputs.bus_addr);
        }
        if bus_write {
            if let Some(index) = scratch_index(inputs.bus_addr) {
                self.scratch[index] = inputs.bus_wdata;
            }
        }
        if let Some(word) = captured {
            self.fetch_data = word;
            self.fetch_valid = true;
            self.fetch_pending = false;
        }

        self.mem_rd_en = issue;
        if issue {
            self.fetch_addr = inputs.bus_wdata;
            self.fetch_valid = false;
            self.fetch_pending = true;
            self.mem_addr = inputs.bus_wdata;
        }
    }
}

fn scratch_index(addr: u32) -> Option<usize> {
    usize::try_from(addr)
        .ok()
        .filter(|index| *index < SCRATCH_WORDS)
}

impl SignalPort for ScratchpadSoc {
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

    fn set_bus_cs(&mut self, asserted: bool) {
        self.inputs.bus_cs = asserted;
    }

    fn set_bus_we(&mut self, asserted: bool) {
        self.inputs.bus_we = asserted;
    }

    fn set_bus_addr(&mut self, addr: u32) {
        self.inputs.bus_addr = addr;
    }

    fn set_bus_wdata(&mut self, data: u32) {
        self.inputs.bus_wdata = data;
    }

    fn bus_rdata(&self) -> u32 {
        self.bus_rdata
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

    // No accelerator port on this model.
    fn set_start(&mut self, _start: bool) {}

    fn set_node_in(&mut self, _node: u32) {}

    fn root_out(&self) -> u32 {
        0
    }

    fn done(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::{
        ScratchpadSoc, FETCH_ADDR, FETCH_DATA, FETCH_STATUS, FETCH_STATUS_PENDING,
        FETCH_STATUS_VALID, SCRATCH_WORDS,
    };
    use crate::{Bridge, BridgeConfig, SignalPort};

    fn soc_bridge(image: &[u32]) -> Bridge<ScratchpadSoc> {
        Bridge::new(ScratchpadSoc::default(), image, &BridgeConfig::default())
    }

    #[test]
    fn scratch_registers_echo_writes() {
        let mut bridge = soc_bridge(&[]);
        bridge.write(0x10, 0xDEAD_BEEF);
        bridge.write(0xFF, 42);

        assert_eq!(bridge.read(0x10), 0xDEAD_BEEF);
        assert_eq!(bridge.read(0xFF), 42);
    }

    #[test]
    fn unmapped_addresses_read_zero_and_drop_writes() {
        let mut bridge = soc_bridge(&[]);
        let unmapped = u32::try_from(SCRATCH_WORDS).expect("fits") + 0x1000;

        bridge.write(unmapped, 7);

        assert_eq!(bridge.read(unmapped), 0);
    }

    #[test]
    fn fetch_completes_one_cycle_after_issue() {
        let mut bridge = soc_bridge(&[5, 7, 0, 0]);

        bridge.write(FETCH_ADDR, 1);
        assert!(bridge.model().mem_rd_en());
        assert_eq!(bridge.model().fetch_status(), FETCH_STATUS_PENDING);

        bridge.step();
        assert_eq!(bridge.model().fetch_data(), 7);
        assert_eq!(bridge.model().fetch_status(), FETCH_STATUS_VALID);
        assert!(!bridge.model().mem_rd_en());

        assert_eq!(bridge.read(FETCH_DATA), 7);
        assert_eq!(bridge.read(FETCH_ADDR), 1);
    }

    #[test]
    fn bus_read_in_capture_cycle_sees_previous_value() {
        let mut bridge = soc_bridge(&[5, 7, 0, 0]);

        bridge.write(FETCH_ADDR, 1);
        let stale = bridge.read(FETCH_DATA);
        let fresh = bridge.read(FETCH_DATA);

        assert_eq!(stale, 0);
        assert_eq!(fresh, 7);
    }

    #[test]
    fn reset_clears_registers() {
        let mut bridge = soc_bridge(&[]);
        bridge.write(3, 9);
        bridge.write(FETCH_ADDR, 0);
        bridge.step();

        bridge.reset();

        assert_eq!(bridge.read(3), 0);
        assert_eq!(bridge.read(FETCH_STATUS), 0);
    }
}
