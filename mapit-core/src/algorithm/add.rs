// Copyright (c) The MAP-IT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The add step: `add_borders` → `add_othersides` → `dual_inferences` →
//! `inverse_inferences`, iterated to a sub-fixed-point.

use super::borders::connected_org;
use crate::graph::HalfGraph;
use crate::ids::{Asn, Direction, HalfId, OrgId, IXP_ASN};
use crate::updates::Updates;
use std::collections::HashSet;

/// Mirror-image org labels across an adjacency: a sign that `neighbor` was
/// assigned the role that rightfully belongs to the half on the other end.
/// `base_org` is the half's own (immutable) base org; `inferred_org` is its
/// current entry in `updates`.
pub(crate) fn is_inverse(
    base_org: OrgId,
    inferred_org: OrgId,
    neighbor: HalfId,
    graph: &HalfGraph,
    updates: &Updates,
) -> bool {
    updates.org_default(neighbor, None) == Some(base_org) && graph.half(neighbor).org() == inferred_org
}

/// (a) For every half in `working_set` not already direct, vote on the
/// dominant connected org and accept it as a direct inference when it
/// differs from the half's base org.
pub(crate) fn add_borders(working_set: &[HalfId], updates: &Updates, graph: &HalfGraph, f: f64) -> Updates {
    let mut new_updates = updates.clone();
    for &half in working_set {
        if updates.is_direct(half) {
            continue;
        }
        let h = graph.half(half);
        // IXP-only halves are excluded from voting, except in the forward
        // direction — preserved verbatim from the source's guard.
        if h.asn() == IXP_ASN && h.direction() == Direction::Backward {
            continue;
        }
        if let Some((asn, org)) = connected_org(half, updates, graph, f) {
            if org != h.org() && asn != IXP_ASN {
                new_updates.update(half, asn, org, true, false);
            }
        }
    }
    new_updates
}

/// (b) Propagate every direct, non-IXP inference onto its otherside as an
/// indirect inference, unless the otherside is already direct on its own.
pub(crate) fn add_othersides(updates: &mut Updates, graph: &HalfGraph) {
    let direct: Vec<HalfId> = updates.direct_iter().collect();
    for half in direct {
        let h = graph.half(half);
        if h.asn() == IXP_ASN {
            continue;
        }
        if let Some(otherside) = h.otherside() {
            if !updates.is_direct(otherside) {
                updates.update_from(otherside, half, false);
            }
        }
    }
}

/// Both `forward_half` and `backward_half` are direct and disagree: remove
/// whichever has no route (`asn == 0`), defaulting to the backward half, and
/// its otherside unless that otherside independently holds a surviving
/// direct inference.
fn resolve_direct(
    forward_half: HalfId,
    backward_half: HalfId,
    forward_asn: Asn,
    updates: &mut Updates,
    graph: &HalfGraph,
) {
    let remove_half = if forward_asn == 0 { forward_half } else { backward_half };
    let otherside = graph.half(remove_half).otherside();
    let otherside_direct = otherside.map(|o| updates.is_direct(o)).unwrap_or(false);
    if !otherside_direct || updates.asn(remove_half) == 0 {
        updates.remove(remove_half);
        if let Some(o) = otherside {
            updates.remove(o);
        }
    }
}

/// One of `direct_half`/`indirect_half` is direct, the other indirect, and
/// they disagree: remove whichever has no route, else the indirect one, and
/// its otherside unless that otherside is itself direct.
fn resolve_indirect(direct_half: HalfId, indirect_half: HalfId, updates: &mut Updates, graph: &HalfGraph) {
    let remove_half = if updates.asn(direct_half) == 0 { direct_half } else { indirect_half };
    updates.remove(remove_half);
    if let Some(otherside) = graph.half(remove_half).otherside() {
        if !updates.is_direct(otherside) {
            updates.remove(otherside);
        }
    }
}

/// (c) For every forward half with a routed base ASN and an inference whose
/// otherhalf also has one, resolve disagreeing org labels between the two.
pub(crate) fn dual_inferences(updates: &mut Updates, graph: &HalfGraph) {
    let candidates: Vec<HalfId> = updates
        .iter()
        .filter(|&h| graph.half(h).direction() == Direction::Forward)
        .filter(|&h| {
            graph
                .half(h)
                .otherhalf()
                .map(|oh| updates.contains(oh))
                .unwrap_or(false)
        })
        .filter(|&h| graph.half(h).asn() > 0)
        .collect();

    for h in candidates {
        if !updates.contains(h) {
            continue;
        }
        let otherhalf = match graph.half(h).otherhalf() {
            Some(oh) => oh,
            None => continue,
        };
        if !updates.contains(otherhalf) {
            continue;
        }
        let (forward_asn, forward_org) = updates.mapping(h);
        let (_, backward_org) = updates.mapping(otherhalf);
        if forward_org == backward_org {
            continue;
        }
        match (updates.is_direct(h), updates.is_direct(otherhalf)) {
            (true, true) => resolve_direct(h, otherhalf, forward_asn, updates, graph),
            (true, false) => resolve_indirect(h, otherhalf, updates, graph),
            (false, true) => resolve_indirect(otherhalf, h, updates, graph),
            (false, false) => {}
        }
    }
}

/// (d) For every indirect half whose otherside is also not direct, remove it
/// (and its otherside) if any neighbor satisfies the inverse condition.
pub(crate) fn inverse_inferences(updates: &mut Updates, graph: &HalfGraph) {
    let candidates: Vec<HalfId> = updates
        .iter()
        .filter(|&h| !updates.is_direct(h))
        .filter(|&h| {
            graph
                .half(h)
                .otherside()
                .map(|o| !updates.is_direct(o))
                .unwrap_or(true)
        })
        .collect();

    for h in candidates {
        if !updates.contains(h) || updates.is_direct(h) {
            continue;
        }
        if let Some(otherside) = graph.half(h).otherside() {
            if updates.is_direct(otherside) {
                continue;
            }
        }
        let base_org = graph.half(h).org();
        let inferred_org = updates.org(h);
        let hit = graph
            .half(h)
            .neighbors()
            .iter()
            .any(|&n| is_inverse(base_org, inferred_org, n, graph, updates));
        if hit {
            let otherside = graph.half(h).otherside();
            updates.remove(h);
            if let Some(o) = otherside {
                updates.remove(o);
            }
        }
    }
}

/// §4.3.1: the next working set is every neighbor of every half whose org
/// mapping changed, restricted to halves with more than one neighbor.
pub(crate) fn create_rerun(updates: &Updates, new_updates: &Updates, graph: &HalfGraph) -> Vec<HalfId> {
    let mut seen: HashSet<HalfId> = HashSet::new();
    for half in new_updates.difference(updates) {
        for &neighbor in graph.half(half).neighbors() {
            if graph.half(neighbor).num_neighbors() > 1 {
                seen.insert(neighbor);
            }
        }
    }
    seen.into_iter().collect()
}

/// One full add step: runs (a)-(d) to an inner fixed point.
///
/// The history check happens against `current` *before* this iteration's
/// sub-rules run, not against the freshly computed result — preserved
/// verbatim from the source, which can therefore return one step "behind"
/// what the final sub-rule pass computed.
pub(crate) fn add_step(working_set: &[HalfId], updates: &Updates, graph: &HalfGraph, f: f64) -> Updates {
    let mut history: Vec<Updates> = Vec::new();
    let mut current = updates.clone();
    let mut halves: Vec<HalfId> = working_set.to_vec();
    loop {
        let mut new_updates = add_borders(&halves, &current, graph, f);
        log::trace!("direct: {} inferences", new_updates.len());
        add_othersides(&mut new_updates, graph);
        log::trace!("indirect: {} inferences", new_updates.len());
        dual_inferences(&mut new_updates, graph);
        log::trace!("dual: {} inferences", new_updates.len());
        inverse_inferences(&mut new_updates, graph);
        log::trace!("inverse: {} inferences", new_updates.len());
        halves = create_rerun(&current, &new_updates, graph);
        if history.contains(&current) {
            return current;
        }
        history.push(current.clone());
        current = new_updates;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::HalfGraphBuilder;
    use std::net::Ipv4Addr;

    fn ip(n: u8) -> Ipv4Addr {
        Ipv4Addr::new(10, 0, 0, n)
    }

    // S3: after a direct inference on A, A's otherside receives it indirectly.
    #[test]
    fn add_othersides_propagates_to_peer() {
        let mut b = HalfGraphBuilder::new();
        b.add_half(ip(1), Direction::Forward, 1, OrgId(1), Some(ip(9)));
        b.add_half(ip(9), Direction::Backward, 9, OrgId(9), Some(ip(1)));
        let graph = b.finalize().unwrap();
        let a = graph.lookup(ip(1), Direction::Forward).unwrap();
        let a_side = graph.lookup(ip(9), Direction::Backward).unwrap();

        let mut updates = Updates::new(graph.len());
        updates.update(a, 2, OrgId(2), true, false);
        add_othersides(&mut updates, &graph);

        assert!(updates.contains(a_side));
        assert!(!updates.is_direct(a_side));
        assert_eq!(updates.mapping(a_side), (2, OrgId(2)));
    }

    // S4: forward and backward of the same address, both direct, disagree,
    // neither asn is 0 -> remove the backward half.
    #[test]
    fn dual_inferences_removes_backward_on_tie() {
        let mut b = HalfGraphBuilder::new();
        b.add_half(ip(1), Direction::Forward, 1, OrgId(1), None);
        b.add_half(ip(1), Direction::Backward, 1, OrgId(1), None);
        let graph = b.finalize().unwrap();
        let fwd = graph.lookup(ip(1), Direction::Forward).unwrap();
        let bwd = graph.lookup(ip(1), Direction::Backward).unwrap();

        let mut updates = Updates::new(graph.len());
        updates.update(fwd, 5, OrgId(5), true, false);
        updates.update(bwd, 6, OrgId(6), true, false);
        dual_inferences(&mut updates, &graph);

        assert!(updates.contains(fwd));
        assert!(!updates.contains(bwd));
    }

    // S5: indirect half paired with a neighbor whose labels mirror it is
    // removed along with its (non-direct) otherside.
    #[test]
    fn inverse_inferences_cancels_mirror_pair() {
        let mut b = HalfGraphBuilder::new();
        b.add_half(ip(1), Direction::Forward, 1, OrgId(10), Some(ip(2)));
        b.add_half(ip(2), Direction::Backward, 2, OrgId(2), Some(ip(1)));
        b.add_half(ip(3), Direction::Backward, 3, OrgId(20), None);
        b.add_adjacency(ip(1), ip(3));
        let graph = b.finalize().unwrap();
        let h = graph.lookup(ip(1), Direction::Forward).unwrap();
        let otherside = graph.lookup(ip(2), Direction::Backward).unwrap();
        let neighbor = graph.lookup(ip(3), Direction::Backward).unwrap();

        let mut updates = Updates::new(graph.len());
        // h is indirect, labeled with neighbor's base org (20).
        updates.update(h, 20, OrgId(20), false, false);
        updates.update(otherside, 20, OrgId(20), false, false);
        // neighbor's inferred org mirrors h's base org (10).
        updates.update(neighbor, 1, OrgId(10), false, false);

        inverse_inferences(&mut updates, &graph);

        assert!(!updates.contains(h));
        assert!(!updates.contains(otherside));
    }
}
