// Copyright (c) The MAP-IT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The JSON document `mapit-cli` reads: a pre-joined set of interface
//! halves and adjacencies (the output of a loader this workspace doesn't
//! implement, per the core's Non-goals) plus the driver's tunables.

use color_eyre::eyre::{eyre, Result};
use mapit_core::algorithm::{DriverConfig, Providers};
use mapit_core::graph::{HalfGraph, HalfGraphBuilder};
use mapit_core::ids::{Asn, Direction, OrgId};
use serde::Deserialize;
use std::net::Ipv4Addr;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct HalfSpec {
    address: Ipv4Addr,
    direction: Direction,
    asn: Asn,
    org: u32,
    #[serde(default)]
    otherside: Option<Ipv4Addr>,
}

#[derive(Debug, Deserialize)]
struct AdjacencySpec {
    from: Ipv4Addr,
    to: Ipv4Addr,
}

#[derive(Debug, Default, Deserialize)]
struct ProvidersSpec {
    #[serde(default)]
    asns: Vec<Asn>,
    #[serde(default)]
    orgs: Vec<u32>,
}

fn default_factor() -> f64 {
    0.5
}

fn default_iterations() -> u32 {
    100
}

#[derive(Debug, Deserialize)]
struct DriverConfigSpec {
    #[serde(default = "default_factor")]
    factor: f64,
    #[serde(default)]
    providers: Option<ProvidersSpec>,
    #[serde(default = "default_iterations")]
    iterations: u32,
}

impl Default for DriverConfigSpec {
    fn default() -> Self {
        DriverConfigSpec {
            factor: default_factor(),
            providers: None,
            iterations: default_iterations(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct Scenario {
    halves: Vec<HalfSpec>,
    #[serde(default)]
    adjacencies: Vec<AdjacencySpec>,
    #[serde(default)]
    config: DriverConfigSpec,
}

impl Scenario {
    pub(crate) fn load(path: &Path) -> Result<Scenario> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| eyre!("failed to read scenario file {}: {}", path.display(), e))?;
        let scenario: Scenario = serde_json::from_str(&text)
            .map_err(|e| eyre!("failed to parse scenario file {}: {}", path.display(), e))?;
        Ok(scenario)
    }

    pub(crate) fn build_graph(&self) -> Result<HalfGraph> {
        let mut builder = HalfGraphBuilder::new();
        for half in &self.halves {
            builder.add_half(half.address, half.direction, half.asn, OrgId(half.org), half.otherside);
        }
        for adjacency in &self.adjacencies {
            builder.add_adjacency(adjacency.from, adjacency.to);
        }
        builder
            .finalize()
            .map_err(|e| eyre!("scenario produced an invalid interface graph: {}", e))
    }

    pub(crate) fn driver_config(&self) -> DriverConfig {
        let providers = self.config.providers.as_ref().map(|spec| {
            let mut providers = Providers::new();
            for &asn in &spec.asns {
                providers.insert_asn(asn);
            }
            for &org in &spec.orgs {
                providers.insert_org(OrgId(org));
            }
            providers
        });
        DriverConfig {
            factor: self.config.factor,
            providers,
            iterations: self.config.iterations,
        }
    }
}
