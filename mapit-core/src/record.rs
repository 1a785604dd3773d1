// Copyright (c) The MAP-IT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Driver output: the per-half inference record schema, and
//! converting a finished [`Updates`] into a sorted, serializable list of
//! them. Mirrors `original_source/updates.py`'s `UpdateInfo` namedtuple and
//! `iteritems`, minus the pandas/CSV machinery — this crate emits `serde`
//! values instead.

use crate::graph::HalfGraph;
use crate::ids::{Asn, Direction, HalfId, OrgId};
use crate::updates::Updates;
use serde::Serialize;
use std::net::Ipv4Addr;

/// One row of driver output: a half with a recorded inference, and the
/// columns defined for it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Record {
    /// The half's address.
    pub address: Ipv4Addr,
    /// The half's direction.
    pub direction: Direction,
    /// The half's point-to-point peer address, or `None` if `asn` is the IXP
    /// sentinel.
    pub otherside: Option<Ipv4Addr>,
    /// Base ASN from the routing lookup.
    pub asn: Asn,
    /// Inferred connected ASN.
    pub conn_asn: Asn,
    /// Base Org.
    pub org: OrgId,
    /// Inferred connected Org.
    pub conn_org: OrgId,
    /// Whether the inference is direct.
    pub direct: bool,
    /// Whether some neighbor satisfies the inverse condition against this
    /// half's current inference.
    pub certain: bool,
    /// Whether the inference came from the stub heuristic.
    pub stub: bool,
}

impl Record {
    fn for_half(half: HalfId, graph: &HalfGraph, updates: &Updates) -> Record {
        let h = graph.half(half);
        let (conn_asn, conn_org) = updates.mapping(half);
        Record {
            address: h.address(),
            direction: h.direction(),
            otherside: if h.asn() != crate::ids::IXP_ASN {
                h.otherside_address()
            } else {
                None
            },
            asn: h.asn(),
            conn_asn,
            org: h.org(),
            conn_org,
            direct: updates.is_direct(half),
            certain: updates.is_certain(half, graph),
            stub: updates.is_stub(half),
        }
    }
}

/// Builds the full, sorted record set for every half with an inference.
///
/// Sorted by `(address, direction)`.
pub fn records(graph: &HalfGraph, updates: &Updates) -> Vec<Record> {
    let mut records: Vec<Record> = updates
        .iter()
        .map(|half| Record::for_half(half, graph, updates))
        .collect();
    records.sort_by_key(|r| (r.address, r.direction));
    records
}
