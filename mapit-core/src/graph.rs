// Copyright (c) The MAP-IT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The interface-half graph: an immutable, arena-backed collection of
//! [`InterfaceHalf`] nodes with four structural relations: address,
//! direction, otherhalf, otherside, and neighbors.
//!
//! The arena pattern (contiguous storage, cross-references as `HalfId`
//! indices rather than pointers) mirrors `PackageGraph`'s `dep_graph` +
//! `PackageIx` split: it sidesteps the reference-cycle problem a plain
//! object graph keyed on `__hash__`/`__eq__` over `(address, direction)`
//! would otherwise run into.

use crate::errors::Error;
use crate::ids::{Asn, Direction, HalfId, OrgId};
use indexmap::IndexMap;
use std::net::Ipv4Addr;

/// Immutable per-half data, resolved once at [`HalfGraphBuilder::finalize`]
/// time and never mutated afterwards.
#[derive(Clone, Debug)]
pub struct InterfaceHalf {
    address: Ipv4Addr,
    direction: Direction,
    asn: Asn,
    org: OrgId,
    otherside_address: Option<Ipv4Addr>,
    otherhalf: Option<HalfId>,
    otherside: Option<HalfId>,
    neighbors: Vec<HalfId>,
}

impl InterfaceHalf {
    /// The address half of this half's identity.
    pub fn address(&self) -> Ipv4Addr {
        self.address
    }

    /// The direction half of this half's identity.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// The base ASN from the routing lookup. `-2` means the address belongs
    /// to an IXP prefix; `0` means no route was found.
    pub fn asn(&self) -> Asn {
        self.asn
    }

    /// The base Org that owns [`Self::asn`].
    pub fn org(&self) -> OrgId {
        self.org
    }

    /// The point-to-point peer address, if one was supplied at construction,
    /// regardless of whether a half was ever observed there.
    pub fn otherside_address(&self) -> Option<Ipv4Addr> {
        self.otherside_address
    }

    /// The same address in the opposite direction, if observed.
    pub fn otherhalf(&self) -> Option<HalfId> {
        self.otherhalf
    }

    /// The half at the point-to-point peer address, opposite direction, if
    /// observed.
    pub fn otherside(&self) -> Option<HalfId> {
        self.otherside
    }

    /// Ordered list of halves in the opposite direction seen adjacent to
    /// this one in some traceroute hop. May contain duplicates: each
    /// observed hop contributes one entry, and repeated observations are
    /// significant for majority voting in `add_borders`/`remove_borders`.
    pub fn neighbors(&self) -> &[HalfId] {
        &self.neighbors
    }

    /// `self.neighbors().len()`.
    pub fn num_neighbors(&self) -> usize {
        self.neighbors.len()
    }
}

/// Builds a [`HalfGraph`] from raw halves and adjacencies, resolving the
/// structural links in one pass at [`Self::finalize`].
#[derive(Debug, Default)]
pub struct HalfGraphBuilder {
    order: Vec<(Ipv4Addr, Direction)>,
    raw: IndexMap<(Ipv4Addr, Direction), RawHalf>,
    adjacencies: Vec<(Ipv4Addr, Ipv4Addr)>,
    conflict: Option<(Ipv4Addr, Direction)>,
}

#[derive(Debug, Clone, PartialEq)]
struct RawHalf {
    asn: Asn,
    org: OrgId,
    otherside_address: Option<Ipv4Addr>,
}

impl HalfGraphBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an observed interface half. Idempotent: re-adding the same
    /// `(address, direction)` with identical labels is a no-op. Re-adding it
    /// with different labels keeps the first-seen labels and records a
    /// conflict, surfaced as [`Error::DuplicateHalf`] from [`Self::finalize`]
    /// so that `add_half` itself can stay infallible and chainable.
    pub fn add_half(
        &mut self,
        address: Ipv4Addr,
        direction: Direction,
        asn: Asn,
        org: OrgId,
        otherside_address: Option<Ipv4Addr>,
    ) -> &mut Self {
        let key = (address, direction);
        let raw = RawHalf {
            asn,
            org,
            otherside_address,
        };
        match self.raw.get(&key) {
            None => {
                self.order.push(key);
                self.raw.insert(key, raw);
            }
            Some(existing) if *existing != raw => {
                if self.conflict.is_none() {
                    self.conflict = Some(key);
                }
            }
            Some(_) => {}
        }
        self
    }

    /// Registers one directed traceroute hop `(from, to)`: the forward half
    /// at `from` and the backward half at `to` become each other's
    /// neighbors. Both addresses must have been registered via
    /// [`Self::add_half`] (in either direction) before [`Self::finalize`].
    pub fn add_adjacency(&mut self, from: Ipv4Addr, to: Ipv4Addr) -> &mut Self {
        self.adjacencies.push((from, to));
        self
    }

    /// Resolves `otherhalf`, `otherside` and `neighbors` and returns the
    /// immutable graph.
    pub fn finalize(self) -> Result<HalfGraph, Error> {
        if let Some((address, direction)) = self.conflict {
            return Err(Error::DuplicateHalf { address, direction });
        }

        let mut index: IndexMap<(Ipv4Addr, Direction), HalfId> = IndexMap::with_capacity(self.order.len());
        let mut halves: Vec<InterfaceHalf> = Vec::with_capacity(self.order.len());
        for key in &self.order {
            let raw = &self.raw[key];
            let id = HalfId::new(halves.len());
            index.insert(*key, id);
            halves.push(InterfaceHalf {
                address: key.0,
                direction: key.1,
                asn: raw.asn,
                org: raw.org,
                otherside_address: raw.otherside_address,
                otherhalf: None,
                otherside: None,
                neighbors: Vec::new(),
            });
        }

        for id in 0..halves.len() {
            let key = self.order[id];
            let opposite = (key.0, key.1.opposite());
            halves[id].otherhalf = index.get(&opposite).copied();

            if let Some(otherside_address) = halves[id].otherside_address {
                let otherside_key = (otherside_address, key.1.opposite());
                halves[id].otherside = index.get(&otherside_key).copied();
            }
        }

        for &(from, to) in &self.adjacencies {
            let forward_key = (from, Direction::Forward);
            let backward_key = (to, Direction::Backward);
            let forward_id = *index
                .get(&forward_key)
                .ok_or(Error::UnknownHalf {
                    address: from,
                    direction: Direction::Forward,
                })?;
            let backward_id = *index
                .get(&backward_key)
                .ok_or(Error::UnknownHalf {
                    address: to,
                    direction: Direction::Backward,
                })?;
            halves[forward_id.index()].neighbors.push(backward_id);
            halves[backward_id.index()].neighbors.push(forward_id);
        }

        let working_set: Vec<HalfId> = (0..halves.len())
            .map(HalfId::new)
            .filter(|&id| halves[id.index()].num_neighbors() > 1)
            .collect();

        Ok(HalfGraph {
            halves,
            index,
            working_set,
        })
    }
}

/// A read-only graph of [`InterfaceHalf`] nodes.
#[derive(Clone, Debug)]
pub struct HalfGraph {
    halves: Vec<InterfaceHalf>,
    index: IndexMap<(Ipv4Addr, Direction), HalfId>,
    working_set: Vec<HalfId>,
}

impl HalfGraph {
    /// Number of halves in the graph, including those with `num_neighbors <= 1`.
    pub fn len(&self) -> usize {
        self.halves.len()
    }

    /// Whether the graph has no halves at all.
    pub fn is_empty(&self) -> bool {
        self.halves.is_empty()
    }

    /// Borrows a half's data.
    pub fn half(&self, id: HalfId) -> &InterfaceHalf {
        &self.halves[id.index()]
    }

    /// Iterates over every half's id, including those excluded from the
    /// working set.
    pub fn ids(&self) -> impl Iterator<Item = HalfId> + '_ {
        (0..self.halves.len()).map(HalfId::new)
    }

    /// The halves with `num_neighbors > 1`: the only ones the main loop's
    /// rules can act on.
    pub fn working_set(&self) -> &[HalfId] {
        &self.working_set
    }

    /// Looks up a half by its `(address, direction)` identity.
    pub fn lookup(&self, address: Ipv4Addr, direction: Direction) -> Option<HalfId> {
        self.index.get(&(address, direction)).copied()
    }
}
