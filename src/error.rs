// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Error types

use crate::config::DENSITY_LOWER_BOUND;
use crate::document::ObjectId;
use thiserror::Error;

/// Faults raised while running a weight command.
///
/// Problem geometry is never an error; it is reported through the
/// classification counts. User cancellation is a normal outcome as well.
#[derive(Debug, Error)]
pub enum WeightError {
    #[error("density {value} is not allowed (must be a finite number >= {lower_bound})")]
    InvalidDensity { value: f64, lower_bound: f64 },

    #[error("object {0} is not in the document")]
    UnknownObject(ObjectId),

    #[error("scene error: {0}")]
    Scene(String),

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, WeightError>;

/// Accept a density when it is finite and not below [`DENSITY_LOWER_BOUND`]
pub fn check_density(value: f64) -> Result<f64> {
    if value.is_finite() && value >= DENSITY_LOWER_BOUND {
        Ok(value)
    } else {
        Err(WeightError::InvalidDensity {
            value,
            lower_bound: DENSITY_LOWER_BOUND,
        })
    }
}
