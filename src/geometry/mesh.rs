// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Mesh representation and utilities

use super::BoundingBox;
use ahash::AHashMap;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

type Cell = (i64, i64, i64);

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Vertex {
    pub position: Point3<f64>,
}

impl Vertex {
    pub fn new(position: Point3<f64>) -> Self {
        Self { position }
    }
}

/// Triangle defined by three vertex indices
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Triangle {
    pub indices: [usize; 3],
}

impl Triangle {
    pub fn new(indices: [usize; 3]) -> Self {
        Self { indices }
    }

    /// True when two corners reference the same vertex
    pub fn is_collapsed(&self) -> bool {
        let [a, b, c] = self.indices;
        a == b || b == c || a == c
    }

    /// The three undirected edges, smaller index first
    pub fn edges(&self) -> [(usize, usize); 3] {
        let [a, b, c] = self.indices;
        [ordered(a, b), ordered(b, c), ordered(c, a)]
    }
}

fn ordered(a: usize, b: usize) -> (usize, usize) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Triangular mesh
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            triangles: Vec::new(),
        }
    }

    pub fn with_capacity(vertex_count: usize, triangle_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            triangles: Vec::with_capacity(triangle_count),
        }
    }

    /// Build a mesh from raw positions and index triples
    pub fn from_indexed(positions: &[Point3<f64>], faces: &[[usize; 3]]) -> Self {
        let mut mesh = Self::with_capacity(positions.len(), faces.len());
        for position in positions {
            mesh.add_vertex(Vertex::new(*position));
        }
        for face in faces {
            mesh.add_triangle(Triangle::new(*face));
        }
        mesh
    }

    /// Add a vertex and return its index
    pub fn add_vertex(&mut self, vertex: Vertex) -> usize {
        let index = self.vertices.len();
        self.vertices.push(vertex);
        index
    }

    /// Add a triangle
    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    /// Compute bounding box
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_vertices(&self.vertices)
    }

    /// Get vertex count
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get triangle count
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Weld every vertex lying within `epsilon` of an earlier kept vertex and
    /// rewrite triangle indices to the survivor. Returns the number of
    /// vertices removed.
    ///
    /// Points are bucketed into `epsilon`-sized cells and compared against
    /// the kept vertices of the 27 surrounding cells, so a pair straddling a
    /// cell boundary still welds. Clusters are resolved greedily: the first
    /// vertex seen survives and later ones weld only if within `epsilon` of it.
    pub fn weld_vertices(&mut self, epsilon: f64) -> usize {
        if self.vertices.is_empty() {
            return 0;
        }

        let epsilon = if epsilon > 0.0 { epsilon } else { 1e-9 };
        let original_count = self.vertices.len();
        let mut cells: AHashMap<Cell, Vec<usize>> = AHashMap::with_capacity(original_count);
        let mut kept: Vec<Vertex> = Vec::with_capacity(original_count);
        let mut remap: Vec<usize> = Vec::with_capacity(original_count);

        for vertex in &self.vertices {
            let p = vertex.position;
            let cell = cell_of(&p, epsilon);

            let existing = neighbour_cells(cell).find_map(|key| {
                cells.get(&key).and_then(|members| {
                    members
                        .iter()
                        .copied()
                        .find(|&i| (kept[i].position - p).norm() <= epsilon)
                })
            });

            let index = match existing {
                Some(index) => index,
                None => {
                    kept.push(*vertex);
                    let index = kept.len() - 1;
                    cells.entry(cell).or_default().push(index);
                    index
                }
            };
            remap.push(index);
        }

        for triangle in &mut self.triangles {
            for index in &mut triangle.indices {
                *index = remap[*index];
            }
        }

        self.vertices = kept;
        original_count - self.vertices.len()
    }
}

fn cell_of(p: &Point3<f64>, size: f64) -> Cell {
    (
        (p.x / size).floor() as i64,
        (p.y / size).floor() as i64,
        (p.z / size).floor() as i64,
    )
}

fn neighbour_cells((x, y, z): Cell) -> impl Iterator<Item = Cell> {
    (-1..=1).flat_map(move |dx| {
        (-1..=1).flat_map(move |dy| (-1..=1).map(move |dz| (x + dx, y + dy, z + dz)))
    })
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}
