// Copyright (c) The MAP-IT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Point-to-point "other side" address derivation.
//!
//! IPv4 point-to-point links use a `/30` (network + two hosts + broadcast) or
//! a `/31` (RFC 3021, two hosts only). Given only the set of addresses
//! actually *seen* on some router interface, we can usually tell which one
//! we're looking at: if the would-be network or broadcast address of the
//! containing `/30` was itself seen on a router, the subnet must really be a
//! `/31` (a `/30`'s network/broadcast addresses are never assigned to a
//! router). Otherwise we assume `/30`.
//!
//! This lives in `mapit-core` because its semantics are load-bearing for the
//! algorithm's `otherside` structural link, even though deriving it is the
//! loader's job, not the inference engine's.

use std::collections::HashSet;
use std::net::Ipv4Addr;

/// Derives the point-to-point peer address of `address`, given the set of
/// all interface addresses observed across every traceroute (as `u32` host
/// order integers).
///
/// `seen` should contain every address the loader extracted,
/// not just `address`'s own adjacency partner.
pub fn derive_otherside(address: Ipv4Addr, seen: &HashSet<u32>) -> Ipv4Addr {
    let ip = u32::from(address);
    let rem = ip % 4;
    let network = ip - rem;
    let broadcast = network + 3;
    let other = if rem == 0 {
        ip + 1
    } else if rem == 3 {
        ip - 1
    } else if seen.contains(&network) || seen.contains(&broadcast) {
        // A /31 is confirmed: the subnet's would-be network/broadcast
        // address was itself observed as a router interface.
        if rem == 1 {
            network
        } else {
            broadcast
        }
    } else if rem == 1 {
        ip + 1
    } else {
        ip - 1
    };
    Ipv4Addr::from(other)
}

/// Derives the point-to-point peer address of `address` when the prefix
/// length (30 or 31) is already known, e.g. from a routing-table lookup.
/// Grounded on `original_source/utils.py::otherside`, which took this path
/// whenever the caller already had the covering prefix in hand.
///
/// # Panics
///
/// Panics if `prefix_len` is not 30 or 31.
pub fn derive_otherside_with_prefix(address: Ipv4Addr, prefix_len: u8) -> Ipv4Addr {
    let ip = u32::from(address);
    let other = match prefix_len {
        30 => {
            let rem = ip % 4;
            if rem == 1 {
                ip + 1
            } else {
                ip - 1
            }
        }
        31 => {
            let rem = ip % 2;
            if rem == 0 {
                ip + 1
            } else {
                ip - 1
            }
        }
        _ => panic!("{} is not 30 or 31", prefix_len),
    };
    Ipv4Addr::from(other)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slash_31_confirmed_by_seen_network() {
        // S7: A = 10.0.0.2, S contains 10.0.0.0 -> /31, other = 10.0.0.3.
        let a: Ipv4Addr = "10.0.0.2".parse().unwrap();
        let mut seen = HashSet::new();
        seen.insert(u32::from(Ipv4Addr::new(10, 0, 0, 0)));
        assert_eq!(derive_otherside(a, &seen), Ipv4Addr::new(10, 0, 0, 3));
    }

    #[test]
    fn slash_30_assumed_without_evidence() {
        // S7: same A, S does not contain 10.0.0.0 nor 10.0.0.3 -> /30, other = 10.0.0.1.
        let a: Ipv4Addr = "10.0.0.2".parse().unwrap();
        let seen = HashSet::new();
        assert_eq!(derive_otherside(a, &seen), Ipv4Addr::new(10, 0, 0, 1));
    }

    #[test]
    fn remainder_zero_is_the_network_address() {
        let a = Ipv4Addr::new(10, 0, 0, 4);
        let seen = HashSet::new();
        assert_eq!(derive_otherside(a, &seen), Ipv4Addr::new(10, 0, 0, 5));
    }

    #[test]
    fn remainder_three_is_the_broadcast_address() {
        let a = Ipv4Addr::new(10, 0, 0, 7);
        let seen = HashSet::new();
        assert_eq!(derive_otherside(a, &seen), Ipv4Addr::new(10, 0, 0, 6));
    }

    #[test]
    fn with_known_prefix_30() {
        assert_eq!(
            derive_otherside_with_prefix(Ipv4Addr::new(10, 0, 0, 1), 30),
            Ipv4Addr::new(10, 0, 0, 2)
        );
        assert_eq!(
            derive_otherside_with_prefix(Ipv4Addr::new(10, 0, 0, 2), 30),
            Ipv4Addr::new(10, 0, 0, 1)
        );
    }

    #[test]
    fn with_known_prefix_31() {
        assert_eq!(
            derive_otherside_with_prefix(Ipv4Addr::new(10, 0, 0, 0), 31),
            Ipv4Addr::new(10, 0, 0, 1)
        );
        assert_eq!(
            derive_otherside_with_prefix(Ipv4Addr::new(10, 0, 0, 1), 31),
            Ipv4Addr::new(10, 0, 0, 0)
        );
    }

    #[test]
    #[should_panic(expected = "is not 30 or 31")]
    fn with_invalid_prefix_panics() {
        derive_otherside_with_prefix(Ipv4Addr::new(10, 0, 0, 1), 29);
    }
}
