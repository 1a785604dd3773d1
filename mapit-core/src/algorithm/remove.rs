// Copyright (c) The MAP-IT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The remove step: iterated retraction of direct inferences no longer
//! supported by their neighborhood.

use super::borders::connected_org;
use crate::graph::HalfGraph;
use crate::ids::HalfId;
use crate::updates::Updates;

/// Demotes `half` to indirect if its otherside independently holds a
/// surviving direct inference; otherwise removes `half` and its otherside
/// outright.
fn discard(half: HalfId, updates: &mut Updates, graph: &HalfGraph) {
    let otherside = graph.half(half).otherside();
    if let Some(o) = otherside {
        if updates.is_direct(o) {
            updates.undirect(half);
            return;
        }
    }
    updates.remove(half);
    if let Some(o) = otherside {
        updates.remove(o);
    }
}

/// One pass: for every direct half, recompute the dominant connected org
/// against the (frozen) input `updates` and discard the inference from the
/// (mutating) copy if it no longer holds.
pub(crate) fn remove_borders(updates: &Updates, graph: &HalfGraph, f: f64) -> Updates {
    let mut new_updates = updates.clone();
    let direct: Vec<HalfId> = updates.direct_iter().collect();
    for half in direct {
        match connected_org(half, updates, graph, f) {
            Some((_, org)) if org == updates.org(half) => {}
            _ => discard(half, &mut new_updates, graph),
        }
    }
    new_updates
}

/// Repeats [`remove_borders`] until a pass makes no change.
pub(crate) fn remove_step(updates: Updates, graph: &HalfGraph, f: f64) -> Updates {
    let mut current = updates;
    loop {
        let new_updates = remove_borders(&current, graph, f);
        log::trace!("remove: {} inferences", new_updates.len());
        if current == new_updates {
            return current;
        }
        current = new_updates;
    }
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
    fn unsupported_direct_inference_without_otherside_is_removed() {
        let mut b = HalfGraphBuilder::new();
        b.add_half(ip(1), Direction::Forward, 1, OrgId(1), None);
        b.add_half(ip(2), Direction::Backward, 2, OrgId(2), None);
        b.add_half(ip(3), Direction::Backward, 2, OrgId(2), None);
        b.add_adjacency(ip(1), ip(2));
        b.add_adjacency(ip(1), ip(3));
        let graph = b.finalize().unwrap();
        let a = graph.lookup(ip(1), Direction::Forward).unwrap();

        let mut updates = Updates::new(graph.len());
        // Direct inference that no longer matches the (still) majority org.
        updates.update(a, 99, OrgId(99), true, false);
        let result = remove_step(updates, &graph, 0.5);
        assert!(!result.contains(a));
    }

    #[test]
    fn supported_direct_inference_survives() {
        let mut b = HalfGraphBuilder::new();
        b.add_half(ip(1), Direction::Forward, 1, OrgId(1), None);
        b.add_half(ip(2), Direction::Backward, 2, OrgId(2), None);
        b.add_half(ip(3), Direction::Backward, 2, OrgId(2), None);
        b.add_adjacency(ip(1), ip(2));
        b.add_adjacency(ip(1), ip(3));
        let graph = b.finalize().unwrap();
        let a = graph.lookup(ip(1), Direction::Forward).unwrap();

        let mut updates = Updates::new(graph.len());
        updates.update(a, 2, OrgId(2), true, false);
        let result = remove_step(updates, &graph, 0.5);
        assert!(result.is_direct(a));
    }

    #[test]
    fn discard_demotes_when_otherside_independently_direct() {
        let mut b = HalfGraphBuilder::new();
        b.add_half(ip(1), Direction::Forward, 1, OrgId(1), Some(ip(9)));
        b.add_half(ip(9), Direction::Backward, 9, OrgId(9), Some(ip(1)));
        let graph = b.finalize().unwrap();
        let a = graph.lookup(ip(1), Direction::Forward).unwrap();
        let otherside = graph.lookup(ip(9), Direction::Backward).unwrap();

        let mut updates = Updates::new(graph.len());
        updates.update(a, 2, OrgId(2), true, false);
        updates.update(otherside, 3, OrgId(3), true, false);
        let mut new_updates = updates.clone();
        discard(a, &mut new_updates, &graph);

        assert!(new_updates.contains(a));
        assert!(!new_updates.is_direct(a));
        assert!(new_updates.is_direct(otherside));
    }
}
