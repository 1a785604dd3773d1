// Copyright (c) The MAP-IT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Contains types that describe errors `mapit-core` methods can return.

use crate::ids::Direction;
use std::error;
use std::fmt;
use std::net::Ipv4Addr;

use Error::*;

/// Error type describing the narrow error surface of the inference engine.
///
/// Per the error handling policy, these are all construction-time (graph
/// building) errors. The inference algorithm itself never returns a
/// `Result`: it treats a finalized [`crate::graph::HalfGraph`] as
/// well-formed and panics on violated invariants instead (an ungated
/// `Updates::asn`/`Updates::org` lookup, for instance, is a programmer
/// error, not a recoverable one).
#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
    /// An adjacency or otherside reference named an `(address, direction)`
    /// pair that was never registered with [`crate::graph::HalfGraphBuilder::add_half`].
    UnknownHalf {
        /// The address that was referenced but never added.
        address: Ipv4Addr,
        /// The direction that was referenced but never added.
        direction: Direction,
    },
    /// The same `(address, direction)` was registered twice with different
    /// base labels.
    DuplicateHalf {
        /// The address that was registered twice.
        address: Ipv4Addr,
        /// The direction that was registered twice.
        direction: Direction,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnknownHalf { address, direction } => write!(
                f,
                "reference to half ({}, {}) that was never added to the graph",
                address, direction
            ),
            DuplicateHalf { address, direction } => write!(
                f,
                "half ({}, {}) was added twice with different base labels",
                address, direction
            ),
        }
    }
}

impl error::Error for Error {}
