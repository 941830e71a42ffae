// SPDX-FileCopyrightText: 2026 Puckwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the puckwatch tracker.
//!
//! Layered loading (compiled defaults, TOML hierarchy, environment
//! overrides) lives in [`loader`], the typed model in [`model`], and
//! semantic checks in [`validation`].

pub mod loader;
pub mod model;
pub mod validation;

pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::{BrokerMode, PuckwatchConfig};
pub use validation::{validate_config, ConfigError};
