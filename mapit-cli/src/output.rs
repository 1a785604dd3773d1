// Copyright (c) The MAP-IT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Logging setup, in the style of `cargo-hakari`'s `output.rs` (quiet/verbose
//! flags mapped onto an `env_logger` filter level).

use clap::Parser;
use log::LevelFilter;

#[derive(Debug, Parser)]
pub(crate) struct OutputOpts {
    /// Suppress output below warnings.
    #[clap(long, short = 'q', global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Produce extra (debug/trace) output.
    #[clap(long, short = 'v', global = true, conflicts_with = "quiet", parse(from_occurrences))]
    verbose: u8,
}

impl OutputOpts {
    pub(crate) fn init(&self) {
        let level = if self.quiet {
            LevelFilter::Warn
        } else {
            match self.verbose {
                0 => LevelFilter::Info,
                1 => LevelFilter::Debug,
                _ => LevelFilter::Trace,
            }
        };
        env_logger::Builder::from_default_env()
            .filter_level(level)
            .format_timestamp(None)
            .init();
    }
}
