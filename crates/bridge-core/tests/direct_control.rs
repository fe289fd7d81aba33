//! Direct control API driving the find-root accelerator.

use bridge_core::{BridgeConfig, BridgeError, DirectControl, UnionFindAccel};
use env_logger as _;
use log as _;
use proptest::prelude::*;
use rstest as _;
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;

fn software_root(parents: &[u32], mut node: u32) -> u32 {
    loop {
        let parent = parents[usize::try_from(node).expect("node index fits")];
        if parent == node {
            return node;
        }
        node = parent;
    }
}

/// Parent arrays where every pointer goes to an equal or lower index.
fn forest(max_nodes: usize) -> impl Strategy<Value = Vec<u32>> {
    proptest::collection::vec(any::<u32>(), 1..max_nodes).prop_map(|seeds| {
        seeds
            .iter()
            .enumerate()
            .map(|(index, seed)| {
                let bound = u32::try_from(index).expect("small forest") + 1;
                seed % bound
            })
            .collect()
    })
}

#[test]
fn lifecycle_initialize_step_shutdown() {
    let mut control: DirectControl<UnionFindAccel> = DirectControl::default();
    assert_eq!(control.step(), Err(BridgeError::NotInitialized));

    control.initialize(&[0, 0, 1, 2]);
    assert!(control.is_initialized());
    control.step().expect("initialized");
    assert_eq!(
        control.bridge().map(|bridge| bridge.time().ticks()),
        Some(6)
    );

    control.shutdown();
    control.shutdown();
    assert!(!control.is_initialized());
    assert!(!control.is_done());
}

#[test]
fn timeout_reports_node_and_cycle_bound() {
    let config = BridgeConfig {
        find_timeout_cycles: 100,
        ..BridgeConfig::default()
    };
    let mut control = DirectControl::new(UnionFindAccel::default, config);
    control.initialize(&[1, 2, 0]);

    let error = control.find_root(2).expect_err("cyclic parents never settle");

    assert_eq!(
        error.to_string(),
        "find-root for node 2 did not complete within 100 cycles"
    );
}

#[test]
fn consecutive_requests_reuse_the_instance() {
    let mut control: DirectControl<UnionFindAccel> = DirectControl::default();
    control.initialize(&[0, 0, 1, 3, 3, 4]);

    assert_eq!(control.find_root(2), Ok(0));
    assert_eq!(control.find_root(5), Ok(3));
    assert_eq!(control.find_root(0), Ok(0));
}

proptest! {
    #[test]
    fn hardware_root_matches_software_walk(
        parents in forest(48),
        pick in any::<prop::sample::Index>(),
    ) {
        let node = u32::try_from(pick.index(parents.len())).expect("small forest");
        let mut control: DirectControl<UnionFindAccel> = DirectControl::default();
        control.initialize(&parents);

        prop_assert_eq!(control.find_root(node), Ok(software_root(&parents, node)));
    }
}
