// Copyright (c) The MAP-IT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `mapit`: reads a scenario document (interface halves, adjacencies, and
//! driver tunables), runs the MAP-IT inference engine, and writes the
//! resulting per-half inference records.

mod output;
mod scenario;

use clap::Parser;
use color_eyre::eyre::Result;
use mapit_core::algorithm::run;
use mapit_core::record;
use output::OutputOpts;
use scenario::Scenario;
use std::path::PathBuf;

/// Run the MAP-IT interface-level inter-AS link inference engine over a
/// scenario document.
#[derive(Debug, Parser)]
#[clap(name = "mapit", version)]
struct Args {
    /// Path to a JSON scenario document describing interface halves,
    /// adjacencies, and the driver's tunables.
    scenario: PathBuf,

    /// Write records as indented JSON instead of JSON lines.
    #[clap(long)]
    pretty: bool,

    #[clap(flatten)]
    output: OutputOpts,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    args.output.init();

    let scenario = Scenario::load(&args.scenario)?;
    let graph = scenario.build_graph()?;
    let config = scenario.driver_config();

    let updates = run(&graph, &config);
    let records = record::records(&graph, &updates);

    log::info!("{} interfaces, {} inferences", graph.len(), records.len());

    if args.pretty {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        for record in &records {
            println!("{}", serde_json::to_string(record)?);
        }
    }

    Ok(())
}
