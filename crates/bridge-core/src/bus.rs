//! Single-cycle memory-mapped bus transactions.
//!
//! Each transaction holds chip-select for exactly one stepped cycle and
//! releases it afterwards. Addresses are passed through untouched; what an
//! unmapped address does is up to the model.

use crate::{Bridge, SignalPort};

impl<M: SignalPort> Bridge<M> {
    /// Writes `data` to bus address `addr` in one cycle.
    pub fn write(&mut self, addr: u32, data: u32) {
        log::trace!("bus write {addr:#010x} <- {data:#010x}");
        let model = self.model_mut();
        model.set_bus_cs(true);
        model.set_bus_we(true);
        model.set_bus_addr(addr);
        model.set_bus_wdata(data);

        self.step();

        let model = self.model_mut();
        model.set_bus_cs(false);
        model.set_bus_we(false);
    }

    /// Reads bus address `addr` in one cycle.
    ///
    /// `bus_rdata` is captured right after the stepped cycle settles.
    pub fn read(&mut self, addr: u32) -> u32 {
        let model = self.model_mut();
        model.set_bus_cs(true);
        model.set_bus_we(false);
        model.set_bus_addr(addr);

        self.step();

        let data = self.model().bus_rdata();
        self.model_mut().set_bus_cs(false);
        log::trace!("bus read {addr:#010x} -> {data:#010x}");
        data
    }
}
