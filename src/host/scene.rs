// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! In-memory document of named mesh objects
//!
//! Objects come from STL files (one mesh object per file) or from JSON scene
//! files that list primitives and STL references:
//!
//! ```json
//! {
//!   "units": "millimeters",
//!   "objects": [
//!     { "name": "block", "kind": "solid", "shape": { "cube": { "size": [10, 10, 10] } } },
//!     { "name": "lid", "kind": "solid", "shape": { "plane": { "size": [10, 10] } } },
//!     { "name": "casting", "kind": "mesh", "shape": { "stl": "casting.stl" }, "selected": true }
//!   ]
//! }
//! ```

use crate::document::{Document, GeometryHandle, GeometryKind, ObjectId};
use crate::error::WeightError;
use crate::geometry::{self, BoundingBox, Mesh, Primitive};
use crate::units::UnitSystem;
use anyhow::{Context, Result};
use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::{Path, PathBuf};

/// One object in a [`Scene`]; answers oracle queries from its mesh
#[derive(Debug, Clone)]
pub struct SceneObject {
    pub id: ObjectId,
    pub name: String,
    pub kind: GeometryKind,
    pub mesh: Mesh,
    weld_tolerance: f64,
}

impl SceneObject {
    pub fn bounding_box(&self) -> BoundingBox {
        self.mesh.bounding_box()
    }
}

impl GeometryHandle for SceneObject {
    fn id(&self) -> ObjectId {
        self.id
    }

    fn kind(&self) -> GeometryKind {
        self.kind
    }

    fn is_valid(&self) -> bool {
        geometry::is_well_formed(&self.mesh)
    }

    fn is_solid(&self) -> bool {
        geometry::is_closed(&self.mesh, self.weld_tolerance)
    }

    fn is_closed(&self) -> bool {
        geometry::is_closed(&self.mesh, self.weld_tolerance)
    }

    fn compute_volume(&self) -> Option<f64> {
        geometry::enclosed_volume(&self.mesh)
    }
}

/// Document backed by a list of mesh objects
#[derive(Debug, Clone)]
pub struct Scene {
    units: UnitSystem,
    objects: Vec<SceneObject>,
    selected: Vec<ObjectId>,
    weld_tolerance: f64,
    next_id: u64,
}

impl Scene {
    pub fn new(units: UnitSystem, weld_tolerance: f64) -> Self {
        Self {
            units,
            objects: Vec::new(),
            selected: Vec::new(),
            weld_tolerance,
            next_id: 1,
        }
    }

    /// Load every file into one scene. `.stl` files become mesh objects and
    /// `.json` files are read as scene descriptions.
    pub fn load_files(paths: &[PathBuf], weld_tolerance: f64) -> Result<Self> {
        let mut scene = Self::new(UnitSystem::default(), weld_tolerance);
        let mut units_seen = false;

        for path in paths {
            let extension = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e.to_lowercase())
                .unwrap_or_default();

            match extension.as_str() {
                "stl" => {
                    let mesh = load_stl(path)?;
                    scene.add(file_stem(path), GeometryKind::Mesh, mesh, false);
                }
                "json" => {
                    let file = SceneFile::read(path)?;
                    if let Some(units) = file.units {
                        if units_seen && units != scene.units {
                            log::warn!(
                                "{} uses {}, keeping {}",
                                path.display(),
                                units,
                                scene.units
                            );
                        } else {
                            scene.units = units;
                            units_seen = true;
                        }
                    }
                    let base = path.parent().unwrap_or_else(|| Path::new("."));
                    scene.add_entries(file.objects, base)?;
                }
                _ => {
                    return Err(WeightError::Scene(format!(
                        "unsupported file type: {}",
                        path.display()
                    ))
                    .into())
                }
            }
        }

        log::debug!("Loaded {} objects from {} files", scene.objects.len(), paths.len());
        Ok(scene)
    }

    /// Add an object and return its id
    pub fn add(&mut self, name: impl Into<String>, kind: GeometryKind, mesh: Mesh, selected: bool) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        self.objects.push(SceneObject {
            id,
            name: name.into(),
            kind,
            mesh,
            weld_tolerance: self.weld_tolerance,
        });
        if selected {
            self.selected.push(id);
        }
        id
    }

    fn add_entries(&mut self, entries: Vec<SceneEntry>, base: &Path) -> Result<()> {
        for (index, entry) in entries.into_iter().enumerate() {
            let (mesh, default_name) = match &entry.shape {
                ShapeSpec::Stl { stl } => {
                    let path = base.join(stl);
                    (load_stl(&path)?, file_stem(&path))
                }
                ShapeSpec::Primitive(primitive) => {
                    (primitive.to_mesh(), format!("object-{}", index + 1))
                }
            };
            let name = entry.name.unwrap_or(default_name);
            self.add(name, entry.kind, mesh, entry.selected);
        }
        Ok(())
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn set_units(&mut self, units: UnitSystem) {
        self.units = units;
    }

    pub fn find_by_name(&self, name: &str) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.name == name)
    }

    /// Replace the pre-selection with the named objects
    pub fn select_names(&mut self, names: &[String]) -> Result<()> {
        let mut ids = Vec::with_capacity(names.len());
        for name in names {
            let object = self
                .find_by_name(name)
                .ok_or_else(|| WeightError::Scene(format!("no object named '{}'", name)))?;
            ids.push(object.id);
        }
        self.selected = ids;
        Ok(())
    }

    /// Combined bounds of the given objects; unknown ids are skipped
    pub fn extents(&self, ids: &[ObjectId]) -> BoundingBox {
        ids.iter()
            .filter_map(|id| self.object(*id))
            .fold(BoundingBox::empty(), |acc, o| acc.union(&o.bounding_box()))
    }
}

impl Document for Scene {
    type Object = SceneObject;

    fn selected_ids(&self) -> Vec<ObjectId> {
        self.selected.clone()
    }

    fn object(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    fn unit_system(&self) -> UnitSystem {
        self.units
    }
}

/// Scene description file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneFile {
    #[serde(default)]
    pub units: Option<UnitSystem>,
    pub objects: Vec<SceneEntry>,
}

impl SceneFile {
    pub fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scene file: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse scene file: {}", path.display()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneEntry {
    #[serde(default)]
    pub name: Option<String>,
    pub kind: GeometryKind,
    pub shape: ShapeSpec,
    #[serde(default)]
    pub selected: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ShapeSpec {
    /// Path relative to the scene file
    Stl { stl: PathBuf },
    Primitive(Primitive),
}

/// Load an STL file (binary or ASCII) with shared vertices
pub fn load_stl(path: &Path) -> Result<Mesh> {
    let mut file =
        File::open(path).with_context(|| format!("Failed to open STL file: {}", path.display()))?;
    let stl = stl_io::read_stl(&mut file)
        .with_context(|| format!("Failed to read STL file: {}", path.display()))?;

    let positions: Vec<Point3<f64>> = stl
        .vertices
        .iter()
        .map(|v| Point3::new(v[0] as f64, v[1] as f64, v[2] as f64))
        .collect();
    let faces: Vec<[usize; 3]> = stl.faces.iter().map(|f| f.vertices).collect();

    Ok(Mesh::from_indexed(&positions, &faces))
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
