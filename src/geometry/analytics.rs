// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometry analytics: well-formedness, closedness and enclosed volume
//!
//! These are the mesh-level checks behind the reference geometry oracle.
//! Closedness is evaluated on a welded copy so that triangle soups (one vertex
//! per corner, as produced by STL and the cube primitive) are judged by shape
//! rather than by how their vertices happen to be shared.

use super::Mesh;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// Geometry statistics for one mesh
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeometryStats {
    /// Enclosed volume in cubic units, when it could be computed
    pub volume: Option<f64>,
    /// Total surface area in square units
    pub surface_area: f64,
    /// Bounding box [min_x, min_y, min_z, max_x, max_y, max_z]
    pub bbox: [f64; 6],
    pub vertex_count: usize,
    pub triangle_count: usize,
    pub is_well_formed: bool,
    /// Every edge shared by exactly two triangles after welding
    pub is_closed: bool,
}

/// Analyze mesh geometry and compute statistics
pub fn analyze(mesh: &Mesh, weld_tolerance: f64) -> GeometryStats {
    let bbox = mesh.bounding_box();
    let is_well_formed = is_well_formed(mesh);

    GeometryStats {
        volume: if is_well_formed { enclosed_volume(mesh) } else { None },
        surface_area: if is_well_formed { surface_area(mesh) } else { 0.0 },
        bbox: [
            bbox.min.x, bbox.min.y, bbox.min.z, bbox.max.x, bbox.max.y, bbox.max.z,
        ],
        vertex_count: mesh.vertex_count(),
        triangle_count: mesh.triangle_count(),
        is_well_formed,
        is_closed: is_well_formed && is_closed(mesh, weld_tolerance),
    }
}

/// Structural sanity: at least one triangle, finite coordinates, indices in
/// range, no triangle repeating a vertex index, and non-zero total area.
pub fn is_well_formed(mesh: &Mesh) -> bool {
    if mesh.triangles.is_empty() {
        return false;
    }

    let finite = mesh.vertices.iter().all(|v| {
        let p = v.position;
        p.x.is_finite() && p.y.is_finite() && p.z.is_finite()
    });
    if !finite {
        return false;
    }

    let vertex_count = mesh.vertices.len();
    let indices_ok = mesh
        .triangles
        .iter()
        .all(|t| t.indices.iter().all(|&i| i < vertex_count) && !t.is_collapsed());

    indices_ok && surface_area(mesh) > 0.0
}

/// True when the welded mesh has no boundary or non-manifold edges.
/// Expects a well-formed mesh.
pub fn is_closed(mesh: &Mesh, weld_tolerance: f64) -> bool {
    let mut welded = mesh.clone();
    welded.weld_vertices(weld_tolerance);

    let mut edge_count: AHashMap<(usize, usize), usize> = AHashMap::new();
    let mut faces = 0usize;

    for triangle in welded.triangles.iter().filter(|t| !t.is_collapsed()) {
        faces += 1;
        for edge in triangle.edges() {
            *edge_count.entry(edge).or_insert(0) += 1;
        }
    }

    faces > 0 && edge_count.values().all(|&count| count == 2)
}

/// Enclosed volume from the divergence theorem: the sum of signed tetrahedra
/// between each triangle and a reference point. Returns `None` for empty
/// meshes or when the sum is not finite.
pub fn enclosed_volume(mesh: &Mesh) -> Option<f64> {
    let reference = mesh.vertices.first()?.position;
    if mesh.triangles.is_empty() {
        return None;
    }

    let mut signed = 0.0;
    for triangle in &mesh.triangles {
        let [i0, i1, i2] = triangle.indices;
        let a = mesh.vertices.get(i0)?.position - reference;
        let b = mesh.vertices.get(i1)?.position - reference;
        let c = mesh.vertices.get(i2)?.position - reference;
        signed += a.dot(&b.cross(&c)) / 6.0;
    }

    signed.is_finite().then(|| signed.abs())
}

/// Calculate total surface area
pub fn surface_area(mesh: &Mesh) -> f64 {
    mesh.triangles
        .iter()
        .filter_map(|t| {
            let v0 = mesh.vertices.get(t.indices[0])?.position;
            let v1 = mesh.vertices.get(t.indices[1])?.position;
            let v2 = mesh.vertices.get(t.indices[2])?.position;
            Some((v1 - v0).cross(&(v2 - v0)).norm() / 2.0)
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Primitive, Triangle};
    use approx::assert_relative_eq;
    use nalgebra::{Point3, Vector3};

    const TOL: f64 = 1e-6;

    #[test]
    fn test_cube_volume_and_closedness() {
        let mesh = Primitive::cube(Vector3::new(10.0, 10.0, 10.0), true).to_mesh();
        let stats = analyze(&mesh, TOL);

        assert!(stats.is_well_formed);
        assert!(stats.is_closed);
        assert_relative_eq!(stats.volume.unwrap(), 1000.0, epsilon = 1e-9);
        assert_relative_eq!(stats.surface_area, 600.0, epsilon = 1e-9);
        assert_eq!(stats.triangle_count, 12);
    }

    #[test]
    fn test_jittered_soup_welds_across_cells() {
        // Corners at 0 and 10 sit on 1e-6 cell boundaries; nudging every
        // other copy by 1e-9 puts the copies of one corner in different cells
        let mut mesh = Primitive::cube(Vector3::new(10.0, 10.0, 10.0), false).to_mesh();
        for (i, vertex) in mesh.vertices.iter_mut().enumerate() {
            if i % 2 == 0 {
                vertex.position.x -= 1e-9;
            }
        }

        assert!(is_closed(&mesh, TOL));
        assert_relative_eq!(enclosed_volume(&mesh).unwrap(), 1000.0, max_relative = 1e-6);
    }

    #[test]
    fn test_sphere_volume_close_to_analytic() {
        let mesh = Primitive::sphere(5.0, 32).to_mesh();
        let expected = 4.0 / 3.0 * std::f64::consts::PI * 125.0;

        assert!(is_well_formed(&mesh));
        assert!(is_closed(&mesh, TOL));
        let volume = enclosed_volume(&mesh).unwrap();
        assert!(
            (volume - expected).abs() < expected * 0.05,
            "Volume {} not close to expected {}",
            volume,
            expected
        );
    }

    #[test]
    fn test_cylinder_volume_close_to_analytic() {
        let mesh = Primitive::cylinder(10.0, 2.0, 64).to_mesh();
        let expected = std::f64::consts::PI * 4.0 * 10.0;

        assert!(is_closed(&mesh, TOL));
        let volume = enclosed_volume(&mesh).unwrap();
        assert!((volume - expected).abs() < expected * 0.01);
    }

    #[test]
    fn test_plane_is_open() {
        let mesh = Primitive::plane(3.0, 4.0).to_mesh();
        assert!(is_well_formed(&mesh));
        assert!(!is_closed(&mesh, TOL));
        assert_relative_eq!(surface_area(&mesh), 12.0, epsilon = 1e-12);
    }

    #[test]
    fn test_cube_missing_face_is_open() {
        let mut mesh = Primitive::cube(Vector3::new(1.0, 1.0, 1.0), false).to_mesh();
        mesh.triangles.truncate(10);
        assert!(!is_closed(&mesh, TOL));
    }

    #[test]
    fn test_empty_mesh_is_not_well_formed() {
        let mesh = Mesh::new();
        assert!(!is_well_formed(&mesh));
        assert_eq!(enclosed_volume(&mesh), None);
    }

    #[test]
    fn test_out_of_range_index_is_not_well_formed() {
        let positions = [Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0)];
        let mut mesh = Mesh::from_indexed(&positions, &[]);
        mesh.add_triangle(Triangle::new([0, 1, 7]));
        assert!(!is_well_formed(&mesh));
    }

    #[test]
    fn test_non_finite_vertex_is_not_well_formed() {
        let mut mesh = Primitive::cube(Vector3::new(1.0, 1.0, 1.0), false).to_mesh();
        mesh.vertices[0].position.x = f64::NAN;
        assert!(!is_well_formed(&mesh));
    }
}
