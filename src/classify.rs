// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Per-object classification

use crate::document::{GeometryHandle, GeometryKind};
use serde::{Deserialize, Serialize};

/// Outcome of inspecting one object
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Classification {
    /// Closed geometry with a computed volume
    Valid { kind: GeometryKind, volume: f64 },
    /// Failed the host validity check
    Invalid,
    /// Solid that does not enclose a volume
    OpenSurface,
    /// Mesh with naked edges
    OpenMesh,
    /// Closed geometry whose volume computation returned nothing or a
    /// non-finite value
    ComputationFailed { kind: GeometryKind },
}

impl Classification {
    pub fn is_valid(&self) -> bool {
        matches!(self, Classification::Valid { .. })
    }

    pub fn volume(&self) -> Option<f64> {
        match self {
            Classification::Valid { volume, .. } => Some(*volume),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Classification::Valid { .. } => "valid",
            Classification::Invalid => "invalid",
            Classification::OpenSurface => "open surface",
            Classification::OpenMesh => "open mesh",
            Classification::ComputationFailed { .. } => "computation failed",
        }
    }
}

/// Classify one object. Validity is checked first; closedness is asked with
/// the predicate that matches the object's kind.
pub fn classify<H: GeometryHandle + ?Sized>(handle: &H) -> Classification {
    if !handle.is_valid() {
        return Classification::Invalid;
    }

    let kind = handle.kind();
    let closed = match kind {
        GeometryKind::Solid => handle.is_solid(),
        GeometryKind::Mesh => handle.is_closed(),
    };

    if !closed {
        return match kind {
            GeometryKind::Solid => Classification::OpenSurface,
            GeometryKind::Mesh => Classification::OpenMesh,
        };
    }

    match handle.compute_volume() {
        Some(volume) if volume.is_finite() => Classification::Valid { kind, volume },
        _ => Classification::ComputationFailed { kind },
    }
}
