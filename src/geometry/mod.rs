// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Reference geometry kernel - triangle meshes, primitives and the
//! analytics used to answer validity, closedness and volume queries

mod analytics;
mod bbox;
mod mesh;
mod primitives;

pub use analytics::{analyze, enclosed_volume, is_closed, is_well_formed, surface_area, GeometryStats};
pub use bbox::BoundingBox;
pub use mesh::{Mesh, Triangle, Vertex};
pub use primitives::Primitive;
