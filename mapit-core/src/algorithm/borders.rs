// Copyright (c) The MAP-IT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dominant-neighbor-organization voting, shared by `add_borders` and
//! `remove_borders`.

use crate::graph::HalfGraph;
use crate::ids::{Asn, HalfId, OrgId};
use crate::updates::Updates;
use indexmap::IndexMap;

/// Computes the dominant connected organization for `half`, by majority vote
/// of its neighbors' `(asn, org)` pairs (inferred where available, base
/// labels otherwise).
///
/// Ties in both the org vote and the modal-ASN vote resolve to whichever
/// candidate was first encountered, by iterating `half`'s neighbors in their
/// stored (insertion) order — `IndexMap` preserves that order the same way
/// a Python `dict` does, which is what the vote this is ported from relies
/// on for determinism.
pub(crate) fn connected_org(
    half: HalfId,
    updates: &Updates,
    graph: &HalfGraph,
    f: f64,
) -> Option<(Asn, OrgId)> {
    let mut orgs: IndexMap<OrgId, Vec<Asn>> = IndexMap::new();
    for &n in graph.half(half).neighbors() {
        let (asn, org) = if updates.contains(n) {
            updates.mapping(n)
        } else {
            (graph.half(n).asn(), graph.half(n).org())
        };
        orgs.entry(org).or_default().push(asn);
    }

    let (org1, count1, count2) = top_two_by_count(&orgs)?;

    let accepted = orgs.len() == 1
        || (count1 > count2 && count1 as f64 > graph.half(half).num_neighbors() as f64 * f);
    if !accepted {
        return None;
    }

    let asn1 = modal_asn(&orgs[&org1]);
    Some((asn1, org1))
}

/// Returns `(leading_org, leading_count, runner_up_count)`, or `None` if
/// `orgs` is empty. `runner_up_count` is `0` when there is no second
/// distinct org.
fn top_two_by_count(orgs: &IndexMap<OrgId, Vec<Asn>>) -> Option<(OrgId, usize, usize)> {
    let mut first: Option<(OrgId, usize)> = None;
    let mut second_count = 0usize;
    for (&org, asns) in orgs.iter() {
        let count = asns.len();
        match first {
            None => first = Some((org, count)),
            Some((_, first_count)) if count > first_count => {
                second_count = first_count;
                first = Some((org, count));
            }
            Some((_, first_count)) => {
                if count > second_count && count <= first_count {
                    second_count = count;
                }
            }
        }
    }
    first.map(|(org, count)| (org, count, second_count))
}

/// Picks the most frequent ASN in `asns`, ties resolving to first
/// encountered.
fn modal_asn(asns: &[Asn]) -> Asn {
    let mut counts: IndexMap<Asn, usize> = IndexMap::new();
    for &asn in asns {
        *counts.entry(asn).or_insert(0) += 1;
    }
    let mut best: Option<(Asn, usize)> = None;
    for (&asn, &count) in counts.iter() {
        match best {
            None => best = Some((asn, count)),
            Some((_, best_count)) if count > best_count => best = Some((asn, count)),
            _ => {}
        }
    }
    best.expect("asns is non-empty whenever modal_asn is called").0
}
