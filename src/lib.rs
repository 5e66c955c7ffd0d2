// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
pub mod config;
pub mod constants;
pub mod error;
pub mod framework;
pub mod kubernetes;
pub mod logging;
pub mod tls;
pub mod types;
pub mod zms;

#[cfg(test)]
mod test_utils;

pub use config::Options;
pub use error::{FrameworkError, Result};
pub use framework::{get_or_setup, global, setup, state, teardown, FixtureState, Framework};
