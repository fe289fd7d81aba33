//! In-process control surface that bypasses the wire protocol.
//!
//! [`DirectControl`] owns at most one [`Bridge`]. Initializing replaces the
//! whole instance in one assignment, so a partially reset model is never
//! observable. Operations that drive the model fail with
//! [`BridgeError::NotInitialized`] while no instance exists; observers return
//! inert defaults.

use std::fmt;

use crate::{Bridge, BridgeConfig, BridgeError, SignalPort};

/// Owner of an optional bridge instance, created on demand from a factory.
pub struct DirectControl<M> {
    factory: Box<dyn FnMut() -> M>,
    config: BridgeConfig,
    bridge: Option<Bridge<M>>,
}

impl<M> fmt::Debug for DirectControl<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectControl")
            .field("config", &self.config)
            .field("initialized", &self.bridge.is_some())
            .finish_non_exhaustive()
    }
}

impl<M: SignalPort + Default + 'static> Default for DirectControl<M> {
    fn default() -> Self {
        Self::new(M::default, BridgeConfig::default())
    }
}

impl<M: SignalPort> DirectControl<M> {
    /// Creates an uninitialized control surface.
    ///
    /// `factory` builds a fresh model for every [`initialize`](Self::initialize).
    pub fn new(factory: impl FnMut() -> M + 'static, config: BridgeConfig) -> Self {
        Self {
            factory: Box::new(factory),
            config,
            bridge: None,
        }
    }

    /// Builds a fresh model, loads `init` as backing memory and resets it.
    ///
    /// Any previous instance is discarded.
    pub fn initialize(&mut self, init: &[u32]) {
        if self.bridge.is_some() {
            log::debug!("re-initializing bridge instance");
        }
        let model = (self.factory)();
        self.bridge = Some(Bridge::new(model, init, &self.config));
    }

    /// Releases the instance. Does nothing when none exists.
    pub fn shutdown(&mut self) {
        if self.bridge.take().is_some() {
            log::debug!("bridge instance shut down");
        }
    }

    /// Returns `true` while an instance exists.
    #[must_use]
    pub const fn is_initialized(&self) -> bool {
        self.bridge.is_some()
    }

    /// Advances the instance by one clock cycle.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::NotInitialized`] without an instance.
    pub fn step(&mut self) -> Result<(), BridgeError> {
        self.bridge_mut()?.step();
        Ok(())
    }

    /// Drives the accelerator `start` and `node_in` inputs.
    ///
    /// The values are held until changed and take effect on the next step.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::NotInitialized`] without an instance.
    pub fn set_input(&mut self, start: bool, node: u32) -> Result<(), BridgeError> {
        let model = self.bridge_mut()?.model_mut();
        model.set_start(start);
        model.set_node_in(node);
        Ok(())
    }

    /// Returns the accelerator `root_out`, or 0 without an instance.
    #[must_use]
    pub fn result(&self) -> u32 {
        self.bridge.as_ref().map_or(0, |bridge| bridge.model().root_out())
    }

    /// Returns the accelerator `done` flag, or `false` without an instance.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.bridge
            .as_ref()
            .is_some_and(|bridge| bridge.model().done())
    }

    /// Runs one find-root request to completion.
    ///
    /// Pulses `start` with `node` for one cycle, then steps until `done`
    /// rises, at most `find_timeout_cycles` times.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::NotInitialized`] without an instance and
    /// [`BridgeError::FindTimeout`] when `done` never rises.
    pub fn find_root(&mut self, node: u32) -> Result<u32, BridgeError> {
        let limit = self.config.find_timeout_cycles;

        self.set_input(true, node)?;
        self.step()?;
        self.set_input(false, node)?;

        let mut cycles = 0;
        while !self.is_done() {
            if cycles == limit {
                log::warn!("find-root for node {node} timed out after {cycles} cycles");
                return Err(BridgeError::FindTimeout { node, cycles });
            }
            self.step()?;
            cycles += 1;
        }
        Ok(self.result())
    }

    /// Returns the live instance, if any.
    #[must_use]
    pub const fn bridge(&self) -> Option<&Bridge<M>> {
        self.bridge.as_ref()
    }

    fn bridge_mut(&mut self) -> Result<&mut Bridge<M>, BridgeError> {
        self.bridge.as_mut().ok_or(BridgeError::NotInitialized)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::DirectControl;
    use crate::{BridgeConfig, BridgeError, UnionFindAccel};

    fn accel() -> DirectControl<UnionFindAccel> {
        DirectControl::default()
    }

    #[test]
    fn uninitialized_drivers_fail_and_observers_default() {
        let mut control = accel();

        assert!(!control.is_initialized());
        assert_eq!(control.step(), Err(BridgeError::NotInitialized));
        assert_eq!(control.set_input(true, 3), Err(BridgeError::NotInitialized));
        assert_eq!(control.find_root(3), Err(BridgeError::NotInitialized));
        assert_eq!(control.result(), 0);
        assert!(!control.is_done());
        control.shutdown();
        assert!(control.bridge().is_none());
    }

    #[rstest]
    #[case(&[0, 0, 1, 2], 3, 0)]
    #[case(&[0, 1, 1, 1], 3, 1)]
    #[case(&[0, 1, 2, 3], 2, 2)]
    #[case(&[4, 0, 1, 2, 4], 3, 4)]
    fn find_root_walks_parent_pointers(
        #[case] parents: &[u32],
        #[case] node: u32,
        #[case] root: u32,
    ) {
        let mut control = accel();
        control.initialize(parents);

        assert_eq!(control.find_root(node), Ok(root));
        assert!(control.is_done());
        assert_eq!(control.result(), root);
    }

    #[test]
    fn cyclic_parents_time_out() {
        let config = BridgeConfig {
            find_timeout_cycles: 16,
            ..BridgeConfig::default()
        };
        let mut control = DirectControl::new(UnionFindAccel::default, config);
        control.initialize(&[1, 0]);

        assert_eq!(
            control.find_root(0),
            Err(BridgeError::FindTimeout {
                node: 0,
                cycles: 16
            })
        );
    }

    #[test]
    fn reinitialize_replaces_instance() {
        let mut control = accel();
        control.initialize(&[0, 0, 1, 2]);
        assert_eq!(control.find_root(3), Ok(0));
        let elapsed = control.bridge().map(|bridge| bridge.time().cycles());

        control.initialize(&[0, 1, 1, 1]);

        assert!(!control.is_done());
        assert_eq!(control.result(), 0);
        assert!(elapsed > Some(2));
        assert_eq!(control.bridge().map(|bridge| bridge.time().cycles()), Some(2));
    }

    #[test]
    fn manual_stepping_matches_find_root() {
        let mut control = accel();
        control.initialize(&[0, 0, 1, 2]);

        control.set_input(true, 3).expect("initialized");
        control.step().expect("initialized");
        control.set_input(false, 3).expect("initialized");
        while !control.is_done() {
            control.step().expect("initialized");
        }

        assert_eq!(control.result(), 0);

        control.shutdown();
        assert!(!control.is_initialized());
        assert_eq!(control.result(), 0);
    }
}
