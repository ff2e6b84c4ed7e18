// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Host document model: object identity and the geometry oracle
//!
//! The command never owns geometry. It reads objects through
//! [`GeometryHandle`] for the duration of one invocation and hands object
//! ids back to the host for highlighting.

use crate::units::UnitSystem;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier of an object in the host document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(pub u64);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What kind of geometry an object carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeometryKind {
    /// Boundary representation; closed when it encloses a volume
    Solid,
    /// Polygon mesh; closed when it has no naked edges
    Mesh,
}

impl GeometryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GeometryKind::Solid => "solid",
            GeometryKind::Mesh => "mesh",
        }
    }
}

/// Read-only view of one object's geometry, answered by the host kernel.
///
/// `is_solid` is only asked of [`GeometryKind::Solid`] objects and
/// `is_closed` only of [`GeometryKind::Mesh`] objects. Implementations are
/// queried from worker threads and must not mutate shared state.
pub trait GeometryHandle: Sync {
    fn id(&self) -> ObjectId;

    fn kind(&self) -> GeometryKind;

    /// Host-defined structural validity
    fn is_valid(&self) -> bool;

    /// Solid objects: topologically closed
    fn is_solid(&self) -> bool;

    /// Mesh objects: no naked edges
    fn is_closed(&self) -> bool;

    /// Volume from the host's mass-properties computation, `None` on failure
    fn compute_volume(&self) -> Option<f64>;
}

impl<T: GeometryHandle + ?Sized> GeometryHandle for &T {
    fn id(&self) -> ObjectId {
        (**self).id()
    }

    fn kind(&self) -> GeometryKind {
        (**self).kind()
    }

    fn is_valid(&self) -> bool {
        (**self).is_valid()
    }

    fn is_solid(&self) -> bool {
        (**self).is_solid()
    }

    fn is_closed(&self) -> bool {
        (**self).is_closed()
    }

    fn compute_volume(&self) -> Option<f64> {
        (**self).compute_volume()
    }
}

/// The document a command runs against
pub trait Document {
    type Object: GeometryHandle;

    /// Objects selected before the command started, in selection order
    fn selected_ids(&self) -> Vec<ObjectId>;

    fn object(&self, id: ObjectId) -> Option<&Self::Object>;

    /// Unit system of model coordinates
    fn unit_system(&self) -> UnitSystem;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_id_display() {
        assert_eq!(ObjectId(42).to_string(), "#42");
    }

    #[test]
    fn test_object_id_serializes_as_number() {
        assert_eq!(serde_json::to_string(&ObjectId(7)).unwrap(), "7");
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(GeometryKind::Solid.as_str(), "solid");
        let kind: GeometryKind = serde_json::from_str("\"mesh\"").unwrap();
        assert_eq!(kind, GeometryKind::Mesh);
    }
}
