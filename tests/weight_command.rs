// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! End-to-end weight command runs against the reference host

use anyhow::Result;
use metalweight::host::{Answers, Scene, TerminalHost};
use metalweight::{
    CancelReason, CommandOutcome, CommandStatus, Document, GeometryKind, ObjectId, UnitSystem,
    WeightCommand, WeightConfig,
};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

const SCENE: &str = r#"{
    "units": "centimeters",
    "objects": [
        { "name": "block", "kind": "solid", "shape": { "cube": { "size": [2, 5, 1] } } },
        { "name": "bar", "kind": "solid", "shape": { "cube": { "size": [1, 1, 10] } } },
        { "name": "sheet", "kind": "solid", "shape": { "plane": { "size": [4, 4] } } }
    ]
}"#;

fn write_scene(dir: &Path, content: &str) -> Result<PathBuf> {
    let path = dir.join("scene.json");
    std::fs::write(&path, content)?;
    Ok(path)
}

fn terminal(scene: &Scene, density: f64, confirm: Option<bool>) -> TerminalHost<'_, Cursor<Vec<u8>>> {
    TerminalHost::new(
        scene,
        Answers {
            density: Some(density),
            confirm,
        },
        false,
        Cursor::new(Vec::new()),
    )
}

#[test]
fn test_accepting_open_surface_weighs_solids() -> Result<()> {
    let dir = tempdir()?;
    let scene = Scene::load_files(&[write_scene(dir.path(), SCENE)?], 1e-6)?;
    let mut host = terminal(&scene, 7.85, Some(true));

    let outcome = WeightCommand::new(WeightConfig::default())?.run(&scene, &mut host)?;
    let report = outcome.report().expect("accepted run produces a report");

    assert_eq!(outcome.status(), CommandStatus::Success);
    assert_eq!(report.units, UnitSystem::Centimeters);
    assert!((report.total_volume - 20.0).abs() < 1e-9);
    assert_eq!(report.rounded_weight(), 157.0);
    assert_eq!(report.counts.valid_solids, 2);
    assert_eq!(report.counts.open_surfaces, 1);
    assert_eq!(host.highlighted(), &[ObjectId(3)]);

    Ok(())
}

#[test]
fn test_declining_open_surface_cancels() -> Result<()> {
    let dir = tempdir()?;
    let scene = Scene::load_files(&[write_scene(dir.path(), SCENE)?], 1e-6)?;
    let mut host = terminal(&scene, 7.85, Some(false));

    let outcome = WeightCommand::new(WeightConfig::default())?.run(&scene, &mut host)?;

    assert!(matches!(
        outcome,
        CommandOutcome::Cancelled(CancelReason::ProblemsDeclined)
    ));
    Ok(())
}

#[test]
fn test_preselection_limits_the_input() -> Result<()> {
    let dir = tempdir()?;
    let mut scene = Scene::load_files(&[write_scene(dir.path(), SCENE)?], 1e-6)?;
    scene.select_names(&["bar".to_string()])?;
    let mut host = terminal(&scene, 1.0, None);

    let outcome = WeightCommand::new(WeightConfig::default())?.run(&scene, &mut host)?;
    let report = outcome.report().expect("no problems, no question");

    assert_eq!(report.object_count, 1);
    assert!((report.weight - 10.0).abs() < 1e-9);
    assert!(host.highlighted().is_empty());
    Ok(())
}

#[test]
fn test_only_open_geometry_is_nothing_to_do() -> Result<()> {
    let mut scene = Scene::new(UnitSystem::Millimeters, 1e-6);
    scene.add(
        "sheet",
        GeometryKind::Mesh,
        metalweight::geometry::Primitive::plane(1.0, 1.0).to_mesh(),
        true,
    );
    let mut host = terminal(&scene, 17.0, Some(true));

    let outcome = WeightCommand::new(WeightConfig::default())?.run(&scene, &mut host)?;

    assert_eq!(outcome.status(), CommandStatus::NothingToDo);
    assert!(outcome.report().is_none());
    Ok(())
}

#[test]
fn test_empty_scene_is_no_input() -> Result<()> {
    let scene = Scene::new(UnitSystem::Millimeters, 1e-6);
    let mut host = terminal(&scene, 17.0, None);

    let outcome = WeightCommand::new(WeightConfig::default())?.run(&scene, &mut host)?;

    assert!(matches!(outcome, CommandOutcome::Cancelled(CancelReason::NoInput)));
    assert!(scene.selected_ids().is_empty());
    Ok(())
}

#[test]
fn test_dedicated_thread_pool() -> Result<()> {
    let dir = tempdir()?;
    let scene = Scene::load_files(&[write_scene(dir.path(), SCENE)?], 1e-6)?;
    let config = WeightConfig {
        parallelism: Some(3),
        auto_confirm: Some(true),
        ..WeightConfig::default()
    };
    let mut host = terminal(&scene, 1.0, None);

    let outcome = WeightCommand::new(config)?.run(&scene, &mut host)?;
    let report = outcome.report().expect("auto-confirmed run produces a report");
    assert!((report.total_volume - 20.0).abs() < 1e-9);

    Ok(())
}

#[test]
fn test_scene_with_missing_stl_fails_with_context() -> Result<()> {
    let dir = tempdir()?;
    let path = write_scene(
        dir.path(),
        r#"{ "objects": [ { "kind": "mesh", "shape": { "stl": "nowhere.stl" } } ] }"#,
    )?;

    let err = Scene::load_files(&[path], 1e-6).unwrap_err();
    assert!(format!("{:#}", err).contains("Failed to open STL file"));
    Ok(())
}
