// Copyright (c) The MAP-IT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The inference algorithm proper: add step, remove step, stub heuristic
//! and the outer driver loop that ties them together.

mod add;
mod borders;
mod driver;
mod remove;
mod stub;

pub(crate) use add::is_inverse;
pub use driver::{run, DriverConfig};
pub use stub::Providers;
