// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Reference host: a mesh-backed document and a terminal front end

pub mod scene;
pub mod terminal;

pub use scene::{load_stl, Scene, SceneEntry, SceneFile, SceneObject, ShapeSpec};
pub use terminal::{Answers, TerminalHost};
