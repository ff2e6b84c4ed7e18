// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometric primitives generator

use super::{Mesh, Triangle, Vertex};
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Geometric primitives available to scene files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Primitive {
    Cube {
        size: [f64; 3],
        #[serde(default)]
        center: bool,
    },
    Sphere {
        radius: f64,
        #[serde(default)]
        segments: u32,
    },
    Cylinder {
        height: f64,
        radius: f64,
        #[serde(default)]
        segments: u32,
    },
    Cone {
        height: f64,
        r1: f64,
        r2: f64,
        #[serde(default)]
        segments: u32,
    },
    /// Single rectangular face in the XY plane; never closed
    Plane { size: [f64; 2] },
}

const DEFAULT_SEGMENTS: u32 = 32;

fn segments_or_default(segments: u32) -> u32 {
    if segments > 2 {
        segments
    } else {
        DEFAULT_SEGMENTS
    }
}

impl Primitive {
    pub fn cube(size: Vector3<f64>, center: bool) -> Self {
        Self::Cube {
            size: [size.x, size.y, size.z],
            center,
        }
    }

    pub fn sphere(radius: f64, segments: u32) -> Self {
        Self::Sphere { radius, segments }
    }

    pub fn cylinder(height: f64, radius: f64, segments: u32) -> Self {
        Self::Cylinder {
            height,
            radius,
            segments,
        }
    }

    pub fn cone(height: f64, r1: f64, r2: f64, segments: u32) -> Self {
        Self::Cone {
            height,
            r1,
            r2,
            segments,
        }
    }

    pub fn plane(width: f64, depth: f64) -> Self {
        Self::Plane {
            size: [width, depth],
        }
    }

    pub fn to_mesh(&self) -> Mesh {
        match self {
            Self::Cube { size, center } => {
                generate_cube_mesh(Vector3::new(size[0], size[1], size[2]), *center)
            }
            Self::Sphere { radius, segments } => {
                generate_sphere_mesh(*radius, segments_or_default(*segments))
            }
            Self::Cylinder {
                height,
                radius,
                segments,
            } => generate_cone_mesh(*height, *radius, *radius, segments_or_default(*segments)),
            Self::Cone {
                height,
                r1,
                r2,
                segments,
            } => generate_cone_mesh(*height, *r1, *r2, segments_or_default(*segments)),
            Self::Plane { size } => generate_plane_mesh(size[0], size[1]),
        }
    }
}

fn generate_cube_mesh(size: Vector3<f64>, center: bool) -> Mesh {
    let mut mesh = Mesh::with_capacity(36, 12);

    let offset = if center { size / 2.0 } else { Vector3::zeros() };
    let (min_x, max_x) = (-offset.x, size.x - offset.x);
    let (min_y, max_y) = (-offset.y, size.y - offset.y);
    let (min_z, max_z) = (-offset.z, size.z - offset.z);

    let positions = [
        Point3::new(min_x, min_y, min_z),
        Point3::new(max_x, min_y, min_z),
        Point3::new(max_x, max_y, min_z),
        Point3::new(min_x, max_y, min_z),
        Point3::new(min_x, min_y, max_z),
        Point3::new(max_x, min_y, max_z),
        Point3::new(max_x, max_y, max_z),
        Point3::new(min_x, max_y, max_z),
    ];

    // Outward winding, two triangles per face
    let faces: [[usize; 3]; 12] = [
        [4, 5, 6],
        [4, 6, 7],
        [1, 0, 3],
        [1, 3, 2],
        [5, 1, 2],
        [5, 2, 6],
        [0, 4, 7],
        [0, 7, 3],
        [7, 6, 2],
        [7, 2, 3],
        [0, 1, 5],
        [0, 5, 4],
    ];

    // Unshared corners, like a triangle soup read from STL
    for indices in faces {
        let v0 = mesh.add_vertex(Vertex::new(positions[indices[0]]));
        let v1 = mesh.add_vertex(Vertex::new(positions[indices[1]]));
        let v2 = mesh.add_vertex(Vertex::new(positions[indices[2]]));
        mesh.add_triangle(Triangle::new([v0, v1, v2]));
    }

    mesh
}

fn generate_sphere_mesh(radius: f64, segments: u32) -> Mesh {
    let stacks = segments as usize;
    let slices = segments as usize;
    let mut mesh = Mesh::with_capacity((stacks + 1) * (slices + 1), stacks * slices * 2);

    for i in 0..=stacks {
        let phi = PI * i as f64 / stacks as f64;
        let y = radius * phi.cos();
        let r = radius * phi.sin();

        for j in 0..=slices {
            let theta = 2.0 * PI * j as f64 / slices as f64;
            let x = r * theta.cos();
            let z = r * theta.sin();

            mesh.add_vertex(Vertex::new(Point3::new(x, y, z)));
        }
    }

    // Pole rows and the seam column duplicate positions; welding closes them
    for i in 0..stacks {
        for j in 0..slices {
            let first = i * (slices + 1) + j;
            let second = first + slices + 1;

            mesh.add_triangle(Triangle::new([first, second, first + 1]));
            mesh.add_triangle(Triangle::new([second, second + 1, first + 1]));
        }
    }

    mesh
}

fn generate_cone_mesh(height: f64, r1: f64, r2: f64, segments: u32) -> Mesh {
    let segments = segments as usize;
    let mut mesh = Mesh::with_capacity(2 + segments * 2, segments * 4);

    let bottom_center = mesh.add_vertex(Vertex::new(Point3::new(0.0, 0.0, 0.0)));
    let top_center = mesh.add_vertex(Vertex::new(Point3::new(0.0, 0.0, height)));

    let mut bottom = Vec::with_capacity(segments);
    let mut top = Vec::with_capacity(segments);

    for i in 0..segments {
        let angle = 2.0 * PI * i as f64 / segments as f64;
        let (sin, cos) = angle.sin_cos();

        bottom.push(mesh.add_vertex(Vertex::new(Point3::new(r1 * cos, r1 * sin, 0.0))));
        top.push(mesh.add_vertex(Vertex::new(Point3::new(r2 * cos, r2 * sin, height))));
    }

    for i in 0..segments {
        let next = (i + 1) % segments;
        let (bi, bn, ti, tn) = (bottom[i], bottom[next], top[i], top[next]);

        mesh.add_triangle(Triangle::new([bottom_center, bn, bi]));
        mesh.add_triangle(Triangle::new([top_center, ti, tn]));
        mesh.add_triangle(Triangle::new([bi, bn, ti]));
        mesh.add_triangle(Triangle::new([ti, bn, tn]));
    }

    mesh
}

fn generate_plane_mesh(width: f64, depth: f64) -> Mesh {
    let positions = [
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(width, 0.0, 0.0),
        Point3::new(width, depth, 0.0),
        Point3::new(0.0, depth, 0.0),
    ];
    Mesh::from_indexed(&positions, &[[0, 1, 2], [0, 2, 3]])
}
