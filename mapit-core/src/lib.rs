// Copyright (c) The MAP-IT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `mapit-core` implements the MAP-IT interface-level inter-AS link
//! inference engine: given a graph of observed router interface addresses
//! and their traceroute adjacencies, it labels each interface with the
//! Autonomous System and Organization that actually operates it.
//!
//! The crate is a pure, synchronous library: it performs no I/O and makes
//! no assumptions about how the [`graph::HalfGraph`] was built or how the
//! resulting [`updates::Updates`] will be persisted. See `mapit-cli` for a
//! runnable driver.
//!
//! ```
//! use mapit_core::graph::HalfGraphBuilder;
//! use mapit_core::ids::{Direction, OrgId};
//! use mapit_core::algorithm::{run, DriverConfig};
//! use std::net::Ipv4Addr;
//!
//! let mut builder = HalfGraphBuilder::new();
//! builder
//!     .add_half(Ipv4Addr::new(10, 0, 0, 1), Direction::Forward, 1, OrgId(1), None)
//!     .add_half(Ipv4Addr::new(10, 0, 0, 2), Direction::Backward, 2, OrgId(2), None)
//!     .add_half(Ipv4Addr::new(10, 0, 0, 3), Direction::Backward, 2, OrgId(2), None)
//!     .add_adjacency(Ipv4Addr::new(10, 0, 0, 1), Ipv4Addr::new(10, 0, 0, 2))
//!     .add_adjacency(Ipv4Addr::new(10, 0, 0, 1), Ipv4Addr::new(10, 0, 0, 3));
//! let graph = builder.finalize().unwrap();
//!
//! let updates = run(&graph, &DriverConfig::default());
//! assert!(!updates.is_empty());
//! ```

#![warn(missing_docs)]

pub mod algorithm;
pub mod errors;
pub mod graph;
pub mod ids;
pub mod otherside;
pub mod record;
pub mod updates;

pub use errors::Error;
pub use graph::{HalfGraph, HalfGraphBuilder};
pub use updates::Updates;
