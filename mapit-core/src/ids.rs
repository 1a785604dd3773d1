// Copyright (c) The MAP-IT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Small identity types used throughout the interface-half graph.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The ASN of an "IXP-only" prefix: a routing lookup that resolved to an
/// Internet Exchange Point's address space rather than a routed network.
pub const IXP_ASN: Asn = -2;

/// The ASN sentinel meaning "no route found" for the address.
pub const NO_ROUTE_ASN: Asn = 0;

/// An Autonomous System Number, widened to `i64` so the sentinels
/// [`IXP_ASN`] and [`NO_ROUTE_ASN`] fit alongside real 32-bit ASNs.
pub type Asn = i64;

/// The direction in which an interface address was observed in a traceroute
/// adjacency.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// The adjacency recorded this address as the hop's source.
    Forward,
    /// The adjacency recorded this address as the hop's destination.
    Backward,
}

impl Direction {
    /// Returns the opposite direction.
    pub fn opposite(self) -> Self {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Forward => write!(f, "forward"),
            Direction::Backward => write!(f, "backward"),
        }
    }
}

/// Opaque identifier for the Org (CAIDA-style operator grouping) that owns an
/// ASN. Interning and string lookup are the loader's responsibility; the core
/// only needs `Eq + Hash + Copy` identity.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct OrgId(pub u32);

impl fmt::Display for OrgId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Index into a [`crate::graph::HalfGraph`]'s arena. Used for newtype
/// wrapping so a `HalfId` can never be confused with an unrelated `u32`.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct HalfId(u32);

impl HalfId {
    pub(crate) fn new(index: usize) -> Self {
        HalfId(index as u32)
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for HalfId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
