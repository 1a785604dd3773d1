// Copyright (c) The MAP-IT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The outer fixed-point loop alternating the add and remove steps
//! alternating the add and remove steps, plus its tunables.

use super::add::add_step;
use super::remove::remove_step;
use super::stub::{stub_heuristic, Providers};
use crate::graph::HalfGraph;
use crate::updates::Updates;

/// Tunables for [`run`], defaulting to the paper's published values.
#[derive(Clone, Debug)]
pub struct DriverConfig {
    /// Dominance threshold for majority acceptance, `0 <= factor <= 1`.
    pub factor: f64,
    /// ISP identifiers excluded from the stub heuristic's inferred side.
    /// `None` skips the stub heuristic entirely.
    pub providers: Option<Providers>,
    /// Safety-net cap on outer loop iterations.
    pub iterations: u32,
}

impl Default for DriverConfig {
    fn default() -> Self {
        DriverConfig {
            factor: 0.5,
            providers: None,
            iterations: 100,
        }
    }
}

/// Runs the full MAP-IT inference loop over `graph` and returns the final
/// [`Updates`].
pub fn run(graph: &HalfGraph, config: &DriverConfig) -> Updates {
    let mut updates = Updates::new(graph.len());
    let working_set = graph.working_set();
    if working_set.is_empty() {
        log::warn!(
            "interface graph is too sparse: no half has more than one neighbor in either direction"
        );
    }

    let mut history: Vec<Updates> = Vec::new();
    for iteration in 0..config.iterations {
        log::debug!("iteration {}: {} inferences so far", iteration, updates.len());
        updates = add_step(working_set, &updates, graph, config.factor);
        updates = remove_step(updates, graph, config.factor);
        if history.contains(&updates) {
            break;
        }
        history.push(updates.clone());
    }

    if let Some(providers) = &config.providers {
        stub_heuristic(graph, &mut updates, providers);
        log::debug!(
            "stub heuristic added {} stubs, {} total inferences",
            updates.stubs_iter().count(),
            updates.len()
        );
    }

    updates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::HalfGraphBuilder;
    use crate::ids::{Direction, OrgId};
    use std::net::Ipv4Addr;

    fn ip(n: u8) -> Ipv4Addr {
        Ipv4Addr::new(10, 0, 0, n)
    }

    #[test]
    fn empty_working_set_returns_empty_updates_without_providers() {
        let mut b = HalfGraphBuilder::new();
        b.add_half(ip(1), Direction::Forward, 1, OrgId(1), None);
        b.add_half(ip(2), Direction::Backward, 2, OrgId(2), None);
        b.add_adjacency(ip(1), ip(2));
        let graph = b.finalize().unwrap();

        let config = DriverConfig::default();
        let updates = run(&graph, &config);
        assert!(updates.is_empty());
    }

    #[test]
    fn determinism_same_graph_twice_matches() {
        let mut b = HalfGraphBuilder::new();
        b.add_half(ip(1), Direction::Forward, 1, OrgId(1), None);
        b.add_half(ip(2), Direction::Backward, 2, OrgId(2), None);
        b.add_half(ip(3), Direction::Backward, 2, OrgId(2), None);
        b.add_half(ip(4), Direction::Backward, 2, OrgId(2), None);
        b.add_adjacency(ip(1), ip(2));
        b.add_adjacency(ip(1), ip(3));
        b.add_adjacency(ip(1), ip(4));
        let graph = b.finalize().unwrap();

        let config = DriverConfig::default();
        let first = run(&graph, &config);
        let second = run(&graph, &config);
        assert_eq!(first, second);
    }

    #[test]
    fn stub_heuristic_runs_when_providers_given() {
        let mut b = HalfGraphBuilder::new();
        b.add_half(ip(1), Direction::Forward, 10, OrgId(10), None);
        b.add_half(ip(2), Direction::Backward, 20, OrgId(20), None);
        b.add_adjacency(ip(1), ip(2));
        let graph = b.finalize().unwrap();
        let h = graph.lookup(ip(1), Direction::Forward).unwrap();

        let config = DriverConfig {
            factor: 0.5,
            providers: Some(Providers::new()),
            iterations: 100,
        };
        let updates = run(&graph, &config);
        assert!(updates.is_stub(h));
    }
}

#[cfg(all(test, feature = "proptest1"))]
mod proptests {
    use super::*;
    use crate::graph::HalfGraphBuilder;
    use crate::ids::OrgId;
    use proptest::prelude::*;
    use std::net::Ipv4Addr;

    fn ip(n: u32) -> Ipv4Addr {
        Ipv4Addr::from(0x0a00_0000 + n)
    }

    // A star graph: one forward half with `neighbors.len()` backward
    // neighbors, each drawn from a small (asn, org) pool.
    fn star_graph(base: (i64, u32), neighbors: &[(i64, u32)]) -> crate::graph::HalfGraph {
        let mut b = HalfGraphBuilder::new();
        b.add_half(ip(1), Direction::Forward, base.0, OrgId(base.1), None);
        for (i, &(asn, org)) in neighbors.iter().enumerate() {
            let addr = ip(2 + i as u32);
            b.add_half(addr, Direction::Backward, asn, OrgId(org), None);
            b.add_adjacency(ip(1), addr);
        }
        b.finalize().unwrap()
    }

    proptest! {
        // Determinism: two runs on the same graph and config
        // produce equal Updates, regardless of how votes happen to tie.
        #[test]
        fn driver_is_deterministic(
            base_asn in 1i64..5,
            base_org in 0u32..5,
            neighbors in prop::collection::vec((1i64..5, 0u32..5), 0..8),
            factor in 0.0f64..1.0,
        ) {
            let graph = star_graph((base_asn, base_org), &neighbors);
            let config = DriverConfig { factor, providers: None, iterations: 20 };
            let first = run(&graph, &config);
            let second = run(&graph, &config);
            prop_assert_eq!(first, second);
        }
    }
}
