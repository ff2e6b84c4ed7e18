// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! MetalWeight
//!
//! Estimates the weight of CAD solids and meshes: every selected object is
//! classified in parallel as valid, invalid, open surface, open mesh or
//! failed volume computation; the volumes of the valid ones are summed and
//! multiplied by a material density. Problem geometry is reported to the user,
//! who decides whether to continue with the valid subset.
//!
//! The host application is reached only through traits:
//! [`document::GeometryHandle`] and [`document::Document`] for geometry,
//! [`command::Prompter`] and [`command::HostUi`] for interaction. The
//! [`host`] module provides a mesh-backed implementation used by the CLI.

pub mod accumulate;
pub mod classify;
pub mod command;
pub mod config;
pub mod document;
pub mod error;
pub mod geometry;
pub mod host;
pub mod report;
pub mod units;

pub use accumulate::{accumulate, AggregateResult, ProblemCategory, ProgressSink, VolumeAccumulator};
pub use classify::{classify, Classification};
pub use command::{CancelReason, CommandHost, CommandOutcome, CommandStatus, HostUi, Prompter, WeightCommand};
pub use config::WeightConfig;
pub use document::{Document, GeometryHandle, GeometryKind, ObjectId};
pub use error::WeightError;
pub use report::WeightReport;
pub use units::UnitSystem;

/// Classify `handles` and weigh the valid ones at `density` without any
/// interaction. Returns the aggregate and the unrounded weight in grams.
pub fn estimate_weight<H: GeometryHandle>(handles: &[H], density: f64) -> error::Result<(AggregateResult, f64)> {
    let density = error::check_density(density)?;
    let result = accumulate(handles);
    let weight = result.total_volume * density;
    Ok((result, weight))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::tests::FakeObject;

    #[test]
    fn test_estimate_weight() {
        let input = vec![
            FakeObject::solid(1, 10.0),
            FakeObject::solid(2, 20.0),
            FakeObject::solid(3, 30.0),
        ];
        let (result, weight) = estimate_weight(&input, 17.0).unwrap();
        assert_eq!(result.valid_count(), 3);
        assert_eq!(weight, 1020.0);
    }

    #[test]
    fn test_non_finite_volume_is_left_out_of_the_weight() {
        let input = vec![FakeObject::solid(1, 10.0), FakeObject::solid(2, f64::NAN)];
        let (result, weight) = estimate_weight(&input, 17.0).unwrap();

        assert_eq!(result.valid_count(), 1);
        assert_eq!(result.computation_failed, vec![ObjectId(2)]);
        assert_eq!(weight, 170.0);
    }

    #[test]
    fn test_estimate_weight_rejects_negative_density() {
        let input = vec![FakeObject::solid(1, 10.0)];
        assert!(estimate_weight(&input, -1.0).is_err());
    }
}
