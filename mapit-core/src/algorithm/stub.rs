// Copyright (c) The MAP-IT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The terminal stub heuristic: infers ISP→stub links for
//! single-homed customer addresses the main loop can't reach because they
//! have only one neighbor.

use crate::graph::HalfGraph;
use crate::ids::{Asn, Direction, OrgId, NO_ROUTE_ASN};
use crate::updates::Updates;
use std::collections::HashSet;

/// The set of ISP identifiers the stub heuristic must not infer a link
/// *to*, since a provider can't simultaneously be the stub customer.
///
/// Modeled as a sum type over ASN and Org membership rather than requiring
/// callers to normalize to one type.
#[derive(Clone, Debug, Default)]
pub struct Providers {
    asns: HashSet<Asn>,
    orgs: HashSet<OrgId>,
}

impl Providers {
    /// An empty provider set.
    pub fn new() -> Self {
        Self::default()
    }

    /// A provider set containing only ASNs.
    pub fn from_asns(asns: impl IntoIterator<Item = Asn>) -> Self {
        Providers {
            asns: asns.into_iter().collect(),
            orgs: HashSet::new(),
        }
    }

    /// A provider set containing only Orgs.
    pub fn from_orgs(orgs: impl IntoIterator<Item = OrgId>) -> Self {
        Providers {
            asns: HashSet::new(),
            orgs: orgs.into_iter().collect(),
        }
    }

    /// Adds an ASN to the provider set.
    pub fn insert_asn(&mut self, asn: Asn) {
        self.asns.insert(asn);
    }

    /// Adds an Org to the provider set.
    pub fn insert_org(&mut self, org: OrgId) {
        self.orgs.insert(org);
    }

    /// Whether `asn` is a provider.
    pub fn contains_asn(&self, asn: Asn) -> bool {
        self.asns.contains(&asn)
    }

    /// Whether `org` is a provider.
    pub fn contains_org(&self, org: OrgId) -> bool {
        self.orgs.contains(&org)
    }
}

/// Applies the stub heuristic in place.
pub(crate) fn stub_heuristic(graph: &HalfGraph, updates: &mut Updates, providers: &Providers) {
    for half in graph.ids() {
        let h = graph.half(half);
        if h.direction() != Direction::Forward || h.num_neighbors() != 1 {
            continue;
        }
        if updates.contains(half) {
            continue;
        }
        if let Some(otherhalf) = h.otherhalf() {
            if updates.contains(otherhalf) {
                continue;
            }
        }
        if h.asn() == NO_ROUTE_ASN {
            continue;
        }
        let neighbor = h.neighbors()[0];
        let n = graph.half(neighbor);
        if n.asn() <= 0 || n.org() == h.org() || updates.contains(neighbor) {
            continue;
        }
        if providers.contains_asn(n.asn()) || providers.contains_org(n.org()) {
            continue;
        }
        updates.update(half, n.asn(), n.org(), true, true);
        if let Some(otherside) = h.otherside() {
            updates.update(otherside, n.asn(), n.org(), false, true);
        }
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

    // S6: single-neighbor forward half picks up the neighbor's label as a
    // stub inference, and propagates it indirectly to its otherside.
    #[test]
    fn stub_heuristic_assigns_single_homed_customer() {
        let mut b = HalfGraphBuilder::new();
        b.add_half(ip(1), Direction::Forward, 10, OrgId(10), Some(ip(8)));
        b.add_half(ip(8), Direction::Backward, 10, OrgId(10), Some(ip(1)));
        b.add_half(ip(2), Direction::Backward, 20, OrgId(20), None);
        b.add_adjacency(ip(1), ip(2));
        let graph = b.finalize().unwrap();
        let h = graph.lookup(ip(1), Direction::Forward).unwrap();
        let otherside = graph.lookup(ip(8), Direction::Backward).unwrap();

        let mut updates = Updates::new(graph.len());
        let providers = Providers::from_asns([30, 40]);
        stub_heuristic(&graph, &mut updates, &providers);

        assert_eq!(updates.mapping(h), (20, OrgId(20)));
        assert!(updates.is_direct(h));
        assert!(updates.is_stub(h));
        assert_eq!(updates.mapping(otherside), (20, OrgId(20)));
        assert!(!updates.is_direct(otherside));
        assert!(updates.is_stub(otherside));
    }

    #[test]
    fn stub_heuristic_skips_providers() {
        let mut b = HalfGraphBuilder::new();
        b.add_half(ip(1), Direction::Forward, 10, OrgId(10), None);
        b.add_half(ip(2), Direction::Backward, 20, OrgId(20), None);
        b.add_adjacency(ip(1), ip(2));
        let graph = b.finalize().unwrap();
        let h = graph.lookup(ip(1), Direction::Forward).unwrap();

        let mut updates = Updates::new(graph.len());
        let providers = Providers::from_orgs([OrgId(20)]);
        stub_heuristic(&graph, &mut updates, &providers);

        assert!(!updates.contains(h));
    }
}
