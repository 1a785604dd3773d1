// Copyright (c) The MAP-IT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! [`Updates`]: the mutable inference store threaded through the add/remove
//! steps.

use crate::graph::HalfGraph;
use crate::ids::{Asn, HalfId, OrgId};
use fixedbitset::FixedBitSet;
use serde::{Deserialize, Serialize};

/// A four-part mutable store of per-half inferences.
///
/// Backed by dense, `HalfId`-indexed storage rather than hash maps: since
/// `HalfId` is an arena index covering `0..graph.len()` with no holes, plain
/// `Vec<Option<_>>` for the labels and `FixedBitSet` for the `direct`/`stubs`
/// flags are both denser and cheaper to compare than a `HashMap`/`HashSet`
/// pair would be — the same tradeoff `ResolveCore::included` and
/// `Links::included` make elsewhere in this style of graph query.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(into = "UpdatesWire", from = "UpdatesWire")]
pub struct Updates {
    asns: Vec<Option<Asn>>,
    orgs: Vec<Option<OrgId>>,
    direct: FixedBitSet,
    stubs: FixedBitSet,
}

/// On-wire representation of [`Updates`]: `direct`/`stubs` as sorted id
/// lists rather than `FixedBitSet`'s internal block storage, so the format
/// doesn't depend on bitset implementation details.
#[derive(Serialize, Deserialize)]
struct UpdatesWire {
    asns: Vec<Option<Asn>>,
    orgs: Vec<Option<OrgId>>,
    direct: Vec<u32>,
    stubs: Vec<u32>,
}

impl From<Updates> for UpdatesWire {
    fn from(updates: Updates) -> Self {
        UpdatesWire {
            direct: updates.direct.ones().map(|i| i as u32).collect(),
            stubs: updates.stubs.ones().map(|i| i as u32).collect(),
            asns: updates.asns,
            orgs: updates.orgs,
        }
    }
}

impl From<UpdatesWire> for Updates {
    fn from(wire: UpdatesWire) -> Self {
        let capacity = wire.asns.len();
        let mut direct = FixedBitSet::with_capacity(capacity);
        for id in wire.direct {
            direct.insert(id as usize);
        }
        let mut stubs = FixedBitSet::with_capacity(capacity);
        for id in wire.stubs {
            stubs.insert(id as usize);
        }
        Updates {
            asns: wire.asns,
            orgs: wire.orgs,
            direct,
            stubs,
        }
    }
}

impl Updates {
    /// Creates an empty store sized for a graph with `capacity` halves.
    pub fn new(capacity: usize) -> Self {
        Updates {
            asns: vec![None; capacity],
            orgs: vec![None; capacity],
            direct: FixedBitSet::with_capacity(capacity),
            stubs: FixedBitSet::with_capacity(capacity),
        }
    }

    /// Is there any inference recorded for `half`.
    pub fn contains(&self, half: HalfId) -> bool {
        self.orgs[half.index()].is_some()
    }

    /// The inferred ASN for `half`.
    ///
    /// # Panics
    ///
    /// Panics if `half` has no inference. Callers must gate on
    /// [`Self::contains`] first, or use [`Self::asn_default`].
    pub fn asn(&self, half: HalfId) -> Asn {
        self.asns[half.index()].expect("asn() called on a half with no inference")
    }

    /// `Self::asn`, returning `default` instead of panicking when absent.
    pub fn asn_default(&self, half: HalfId, default: Option<Asn>) -> Option<Asn> {
        self.asns[half.index()].or(default)
    }

    /// The inferred Org for `half`.
    ///
    /// # Panics
    ///
    /// Panics if `half` has no inference. Callers must gate on
    /// [`Self::contains`] first, or use [`Self::org_default`].
    pub fn org(&self, half: HalfId) -> OrgId {
        self.orgs[half.index()].expect("org() called on a half with no inference")
    }

    /// `Self::org`, returning `default` instead of panicking when absent.
    pub fn org_default(&self, half: HalfId, default: Option<OrgId>) -> Option<OrgId> {
        self.orgs[half.index()].or(default)
    }

    /// The inferred `(asn, org)` pair for `half`.
    ///
    /// # Panics
    ///
    /// Panics if `half` has no inference.
    pub fn mapping(&self, half: HalfId) -> (Asn, OrgId) {
        (self.asn(half), self.org(half))
    }

    /// Whether `half`'s inference was established by a direct rule
    /// (`add_borders` or the stub heuristic).
    pub fn is_direct(&self, half: HalfId) -> bool {
        self.direct.contains(half.index())
    }

    /// Whether `half`'s inference was established by the stub heuristic.
    pub fn is_stub(&self, half: HalfId) -> bool {
        self.stubs.contains(half.index())
    }

    /// Sets/overwrites `half`'s inference. Not idempotent in the flag sets:
    /// `is_direct`/`is_stub` only ever add membership here; use
    /// [`Self::undirect`] or [`Self::remove`] to retract it.
    pub fn update(&mut self, half: HalfId, asn: Asn, org: OrgId, is_direct: bool, is_stub: bool) {
        self.asns[half.index()] = Some(asn);
        self.orgs[half.index()] = Some(org);
        if is_direct {
            self.direct.insert(half.index());
        }
        if is_stub {
            self.stubs.insert(half.index());
        }
    }

    /// Copies `src`'s `(asn, org)` onto `half`.
    ///
    /// # Panics
    ///
    /// Panics if `src` has no inference.
    pub fn update_from(&mut self, half: HalfId, src: HalfId, is_direct: bool) {
        let (asn, org) = self.mapping(src);
        self.update(half, asn, org, is_direct, false);
    }

    /// Demotes `half` from direct to indirect, keeping its label. Used by
    /// the remove step's `discard` when `half`'s otherside independently
    /// holds a direct inference.
    pub fn undirect(&mut self, half: HalfId) {
        self.direct.set(half.index(), false);
    }

    /// Deletes `half` from all four components.
    pub fn remove(&mut self, half: HalfId) {
        self.asns[half.index()] = None;
        self.orgs[half.index()] = None;
        self.direct.set(half.index(), false);
        self.stubs.set(half.index(), false);
    }

    /// Number of halves with a recorded inference.
    pub fn len(&self) -> usize {
        self.orgs.iter().filter(|o| o.is_some()).count()
    }

    /// Whether no halves have a recorded inference.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates over every half with a recorded inference.
    pub fn iter(&self) -> impl Iterator<Item = HalfId> + '_ {
        self.orgs
            .iter()
            .enumerate()
            .filter_map(|(i, o)| o.is_some().then(|| HalfId::new(i)))
    }

    /// Iterates over every half flagged direct.
    pub fn direct_iter(&self) -> impl Iterator<Item = HalfId> + '_ {
        self.direct.ones().map(HalfId::new)
    }

    /// Iterates over every half flagged stub.
    pub fn stubs_iter(&self) -> impl Iterator<Item = HalfId> + '_ {
        self.stubs.ones().map(HalfId::new)
    }

    /// Returns every half whose Org mapping differs between `self` and
    /// `other` (including halves present in only one of the two). This is
    /// the primitive `create_rerun` uses to find what changed between two
    /// `Updates` snapshots of the same graph.
    ///
    /// # Panics
    ///
    /// Panics if `self` and `other` were built for graphs of different
    /// sizes.
    pub fn difference<'a>(&'a self, other: &'a Updates) -> impl Iterator<Item = HalfId> + 'a {
        assert_eq!(
            self.orgs.len(),
            other.orgs.len(),
            "difference() requires both Updates to be sized for the same graph"
        );
        self.orgs
            .iter()
            .zip(other.orgs.iter())
            .enumerate()
            .filter_map(|(i, (a, b))| (a != b).then(|| HalfId::new(i)))
    }

    /// Whether `half` is "certain": some neighbor of `half` in `graph`
    /// satisfies the inverse condition against `half`'s current inference.
    /// Mirrors `original_source/updates.py::iscertain`, reusing the same
    /// `is_inverse` primitive the inverse-inferences sub-rule uses.
    pub fn is_certain(&self, half: HalfId, graph: &HalfGraph) -> bool {
        if !self.contains(half) {
            return false;
        }
        let base_org = graph.half(half).org();
        let inferred_org = self.org(half);
        graph
            .half(half)
            .neighbors()
            .iter()
            .any(|&n| crate::algorithm::is_inverse(base_org, inferred_org, n, graph, self))
    }
}
