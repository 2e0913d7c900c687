/*
 * SPDX-FileCopyrightText: 2025 Tommaso Fontana
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

#![doc = include_str!("../README.md")]
#![deny(unstable_features)]
#![deny(trivial_casts)]
#![deny(unconditional_recursion)]
#![deny(clippy::empty_loop)]
#![deny(unreachable_code)]
#![deny(unreachable_pub)]
#![deny(unreachable_patterns)]
#![deny(unused_macro_rules)]
#![deny(unused_doc_comments)]

pub mod analytics;
pub mod artifact;
pub mod comp;
pub mod knapsack;
pub mod patch;
pub mod retrieve;
pub mod sources;

/// Prelude module to import everything from this crate
pub mod prelude {
    pub use crate::artifact::*;
    pub use crate::comp::*;
    pub use crate::knapsack::{CapacityOverflow, Solver, Strategy};
    pub use crate::patch::*;
    pub use crate::retrieve::*;
    pub use crate::sources::*;
}
