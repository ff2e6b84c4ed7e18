// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Weight results and the text shown to the user

use crate::accumulate::{AggregateResult, ProblemCategory};
use crate::units::UnitSystem;
use anyhow::{Context, Result};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const WARNING_TITLE: &str = "Warning: Problem Detected";

/// Round to `digits` decimals, ties to even
pub fn round_to(value: f64, digits: i32) -> f64 {
    let scale = 10f64.powi(digits);
    (value * scale).round_ties_even() / scale
}

/// Object counts by classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCounts {
    pub valid_solids: usize,
    pub valid_meshes: usize,
    pub invalid: usize,
    pub open_surfaces: usize,
    pub open_meshes: usize,
    pub computation_failed: usize,
}

impl From<&AggregateResult> for CategoryCounts {
    fn from(result: &AggregateResult) -> Self {
        Self {
            valid_solids: result.valid_solids,
            valid_meshes: result.valid_meshes,
            invalid: result.count(ProblemCategory::Invalid),
            open_surfaces: result.count(ProblemCategory::OpenSurface),
            open_meshes: result.count(ProblemCategory::OpenMesh),
            computation_failed: result.count(ProblemCategory::ComputationFailed),
        }
    }
}

/// Final result of a successful weight command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightReport {
    pub timestamp: String,
    pub object_count: usize,
    pub counts: CategoryCounts,
    pub units: UnitSystem,
    /// Cubic model units
    pub total_volume: f64,
    /// Grams per cubic model unit
    pub density: f64,
    /// Grams, unrounded
    pub weight: f64,
}

impl WeightReport {
    pub fn new(result: &AggregateResult, density: f64, units: UnitSystem) -> Self {
        Self {
            timestamp: chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            object_count: result.input_count,
            counts: CategoryCounts::from(result),
            units,
            total_volume: result.total_volume,
            density,
            weight: result.total_volume * density,
        }
    }

    /// Weight as displayed, two decimals
    pub fn rounded_weight(&self) -> f64 {
        round_to(self.weight, 2)
    }

    pub fn valid_count(&self) -> usize {
        self.counts.valid_solids + self.counts.valid_meshes
    }

    /// Plain-text result block written to the host command line
    pub fn summary_lines(&self) -> Vec<String> {
        vec![
            "--- Weight Calculation Results ---".to_string(),
            format!(
                "Weighed {} of {} objects ({} solids, {} meshes)",
                self.valid_count(),
                self.object_count,
                self.counts.valid_solids,
                self.counts.valid_meshes
            ),
            format!("Total Volume = {:.3} cubic {}", self.total_volume, self.units),
            format!("Estimated Weight = {:.2} grams", self.rounded_weight()),
        ]
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize report")?;
        std::fs::write(path.as_ref(), json)
            .with_context(|| format!("Failed to write report: {:?}", path.as_ref()))?;
        Ok(())
    }

    /// Colored terminal rendering
    pub fn print(&self) {
        println!("\n{}", "━".repeat(60).bright_black());
        println!("{}", "Weight Calculation Results".bold());
        println!("{}", "━".repeat(60).bright_black());
        println!(
            "  {} {} ({} solids, {} meshes)",
            "Weighed:".bright_black(),
            format!("{}/{}", self.valid_count(), self.object_count).cyan(),
            self.counts.valid_solids,
            self.counts.valid_meshes
        );
        let skipped = self.object_count - self.valid_count();
        if skipped > 0 {
            println!(
                "  {} {}",
                "Skipped:".bright_black(),
                skipped.to_string().yellow()
            );
        }
        println!(
            "  {} {:.3} {}³",
            "Volume:".bright_black(),
            self.total_volume,
            self.units.abbreviation()
        );
        println!(
            "  {} {} g/{}³",
            "Density:".bright_black(),
            self.density,
            self.units.abbreviation()
        );
        println!(
            "  {} {}",
            "Weight:".bright_black(),
            format!("{:.2} g", self.rounded_weight()).green().bold()
        );
        println!("{}", "━".repeat(60).bright_black());
    }
}

/// Consolidated warning listing every problem category with a nonzero count
pub fn problem_message(result: &AggregateResult) -> String {
    let mut msg = String::from("Some selected objects may cause issues:\n\n");
    for category in ProblemCategory::ALL {
        let count = result.count(category);
        if count == 0 {
            continue;
        }
        let line = match category {
            ProblemCategory::Invalid => format!("❌ {} bad object(s)", count),
            ProblemCategory::OpenSurface => format!("📄 {} open surface(s)", count),
            ProblemCategory::OpenMesh => format!("🕳️ {} open mesh(es)", count),
            ProblemCategory::ComputationFailed => {
                format!("⚠️ {} object(s) whose volume could not be computed", count)
            }
        };
        msg.push_str(&line);
        msg.push('\n');
    }
    msg.push_str("\nDo you want to continue with the calculation?");
    msg
}
