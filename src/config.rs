// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Command configuration

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "metalweight.toml";

/// Smallest density accepted, inclusive. Not configurable.
pub const DENSITY_LOWER_BOUND: f64 = 0.0;

/// Weight command configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightConfig {
    /// Density offered as the prompt default, grams per cubic model unit
    pub default_density: f64,
    /// Worker threads for the classification pass; `None` uses all cores
    pub parallelism: Option<usize>,
    /// Vertex weld tolerance used by the reference kernel's closedness check
    pub weld_tolerance: f64,
    /// Answer the problem-geometry question without asking
    pub auto_confirm: Option<bool>,
    /// Verbose output
    pub verbose: bool,
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            default_density: 17.0,
            parallelism: None,
            weld_tolerance: 1e-6,
            auto_confirm: None,
            verbose: false,
        }
    }
}

impl WeightConfig {
    /// Load configuration from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config: WeightConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;
        Ok(config)
    }

    /// Load `metalweight.toml` from the working directory when present, then
    /// apply environment variable overrides
    pub fn load() -> Result<Self> {
        let mut config = if PathBuf::from(CONFIG_FILE).exists() {
            Self::from_file(CONFIG_FILE)?
        } else {
            Self::default()
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Apply overrides from a variable lookup. Unparseable values are ignored.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(density) = lookup("METALWEIGHT_DENSITY").and_then(|v| v.parse().ok()) {
            self.default_density = density;
        }

        if let Some(parallelism) = lookup("METALWEIGHT_PARALLELISM") {
            self.parallelism = parallelism.parse().ok();
        }

        if let Some(tolerance) = lookup("METALWEIGHT_WELD_TOLERANCE").and_then(|v| v.parse().ok()) {
            self.weld_tolerance = tolerance;
        }

        if let Some(verbose) = lookup("METALWEIGHT_VERBOSE") {
            self.verbose = verbose.parse().unwrap_or(false);
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path.as_ref(), content)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))?;
        Ok(())
    }
}
