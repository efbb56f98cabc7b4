// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Engine configuration.
//!
//! The engine never consults ambient global state: everything tunable is
//! collected in [`EngineConfig`] and injected at construction. The CLI loads
//! the configuration from a YAML file; library embedders build the struct
//! directly.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_ZONE_TTL_SECS;

/// Tunable behavior of the reconciliation engine.
///
/// # Example
///
/// ```rust
/// use revzone::config::EngineConfig;
///
/// let config = EngineConfig {
///     default_zone_ttl: 3600,
///     ..EngineConfig::default()
/// };
/// assert!(config.auto_create_ptr_records);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Default TTL, in seconds, seeded into newly created zones.
    ///
    /// Records with no explicit TTL defer to their zone's default at
    /// publication time; the engine itself propagates the "no explicit TTL"
    /// state rather than this resolved number.
    pub default_zone_ttl: u32,

    /// Whether address records automatically receive a paired PTR record.
    ///
    /// When disabled the engine leaves reverse zones entirely alone; derived
    /// records already present are removed on the next touch of their
    /// source.
    pub auto_create_ptr_records: bool,

    /// Whether record types outside the classic RFC1035 set (unknown numeric
    /// types and meta query types) are accepted into the store.
    pub tolerate_non_rfc1035_types: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_zone_ttl: DEFAULT_ZONE_TTL_SECS,
            auto_create_ptr_records: true,
            tolerate_non_rfc1035_types: false,
        }
    }
}

impl EngineConfig {
    /// Load the configuration from a YAML file.
    ///
    /// Missing keys fall back to their defaults; unknown keys are rejected
    /// so typos surface instead of being silently ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not parse as a
    /// configuration document.
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_yaml::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }
}
