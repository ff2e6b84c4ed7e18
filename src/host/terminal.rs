// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Terminal host: prompts on stdin, colored status output and an
//! indicatif progress bar

use super::scene::Scene;
use crate::accumulate::ProgressSink;
use crate::command::{HostUi, Prompter};
use crate::document::{Document, GeometryKind, ObjectId};
use anyhow::{Context, Result};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{BufRead, Write};

impl ProgressSink for ProgressBar {
    fn tick(&self) {
        self.inc(1);
    }
}

/// Answers supplied up front, for scripted runs
#[derive(Debug, Clone, Default)]
pub struct Answers {
    pub density: Option<f64>,
    pub confirm: Option<bool>,
}

/// Host implementation for the command line
pub struct TerminalHost<'a, R: BufRead> {
    scene: &'a Scene,
    answers: Answers,
    interactive: bool,
    input: R,
    bar: Option<ProgressBar>,
    highlighted: Vec<ObjectId>,
}

impl<'a, R: BufRead> TerminalHost<'a, R> {
    /// `interactive` enables prompting on `input` for answers not given up
    /// front; otherwise defaults are taken and problem geometry is declined.
    pub fn new(scene: &'a Scene, answers: Answers, interactive: bool, input: R) -> Self {
        Self {
            scene,
            answers,
            interactive,
            input,
            bar: None,
            highlighted: Vec::new(),
        }
    }

    /// Ids most recently passed to `highlight`
    pub fn highlighted(&self) -> &[ObjectId] {
        &self.highlighted
    }

    fn name_of(&self, id: ObjectId) -> String {
        self.scene
            .object(id)
            .map(|o| format!("{} ({})", o.name, id))
            .unwrap_or_else(|| id.to_string())
    }

    /// Read one trimmed line; `None` at end of input
    fn read_answer(&mut self, prompt: &str) -> Result<Option<String>> {
        print!("{} ", prompt);
        std::io::stdout().flush().context("Failed to flush stdout")?;

        let mut line = String::new();
        let read = self.input.read_line(&mut line).context("Failed to read input")?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

impl<R: BufRead> Prompter for TerminalHost<'_, R> {
    /// Picks every candidate whose kind passes the filter
    fn pick_objects(&mut self, prompt: &str, filter: &[GeometryKind]) -> Result<Option<Vec<ObjectId>>> {
        let picked: Vec<ObjectId> = self
            .scene
            .objects()
            .iter()
            .filter(|o| filter.contains(&o.kind))
            .map(|o| o.id)
            .collect();
        log::debug!("{}: picked {} objects", prompt, picked.len());
        Ok(Some(picked))
    }

    fn get_density(&mut self, prompt: &str, default: f64, lower_bound: f64) -> Result<Option<f64>> {
        if let Some(density) = self.answers.density {
            return Ok(Some(density));
        }
        if !self.interactive {
            return Ok(Some(default));
        }

        loop {
            let answer = match self.read_answer(&format!("{} <{}>:", prompt, default))? {
                Some(answer) => answer,
                None => return Ok(None),
            };
            if answer.is_empty() {
                return Ok(Some(default));
            }
            if answer.eq_ignore_ascii_case("q") || answer.eq_ignore_ascii_case("cancel") {
                return Ok(None);
            }
            match answer.parse::<f64>() {
                Ok(value) if value.is_finite() && value >= lower_bound => return Ok(Some(value)),
                Ok(_) => println!("{} Density must be at least {}", "⚠️".yellow(), lower_bound),
                Err(_) => println!("{} Not a number: {}", "⚠️".yellow(), answer),
            }
        }
    }

    fn confirm(&mut self, title: &str, message: &str) -> Result<bool> {
        println!("\n{}", title.yellow().bold());
        println!("{}", message);

        if let Some(answer) = self.answers.confirm {
            println!("{}", if answer { "yes" } else { "no" }.bright_black());
            return Ok(answer);
        }
        if !self.interactive {
            return Ok(false);
        }

        let answer = self.read_answer("[y/N]")?.unwrap_or_default();
        Ok(matches!(answer.to_lowercase().as_str(), "y" | "yes"))
    }
}

impl<R: BufRead> HostUi for TerminalHost<'_, R> {
    fn highlight(&mut self, ids: &[ObjectId]) {
        self.highlighted = ids.to_vec();
        let names: Vec<String> = ids.iter().map(|id| self.name_of(*id)).collect();
        println!("{} {}", "Selected:".bright_black(), names.join(", ").yellow());
    }

    fn zoom_to(&mut self, ids: &[ObjectId]) {
        let bbox = self.scene.extents(ids);
        if bbox.is_empty() {
            return;
        }
        let (center, size) = (bbox.center(), bbox.size());
        println!(
            "{} center ({:.2}, {:.2}, {:.2}), size {:.2} x {:.2} x {:.2}",
            "Zoom:".bright_black(),
            center.x,
            center.y,
            center.z,
            size.x,
            size.y,
            size.z
        );
    }

    fn show_progress(&mut self, message: &str, total: usize) {
        let bar = ProgressBar::new(total as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} {msg} [{bar:40.cyan/blue}] {pos}/{len}")
        {
            bar.set_style(style.progress_chars("#>-"));
        }
        bar.set_message(message.to_string());
        self.bar = Some(bar);
    }

    fn progress(&self) -> &dyn ProgressSink {
        match &self.bar {
            Some(bar) => bar as &dyn ProgressSink,
            None => &(),
        }
    }

    fn hide_progress(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }

    fn write_line(&mut self, line: &str) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Primitive;
    use crate::units::UnitSystem;
    use nalgebra::Vector3;
    use std::io::Cursor;

    fn scene() -> Scene {
        let mut scene = Scene::new(UnitSystem::Millimeters, 1e-6);
        scene.add(
            "a",
            GeometryKind::Solid,
            Primitive::cube(Vector3::new(1.0, 1.0, 1.0), false).to_mesh(),
            false,
        );
        scene.add("b", GeometryKind::Mesh, Primitive::plane(1.0, 1.0).to_mesh(), false);
        scene
    }

    fn host<'a>(scene: &'a Scene, input: &str, interactive: bool) -> TerminalHost<'a, Cursor<Vec<u8>>> {
        TerminalHost::new(
            scene,
            Answers::default(),
            interactive,
            Cursor::new(input.as_bytes().to_vec()),
        )
    }

    #[test]
    fn test_pick_respects_filter() {
        let scene = scene();
        let mut host = host(&scene, "", false);
        let solids = host.pick_objects("pick", &[GeometryKind::Solid]).unwrap();
        assert_eq!(solids, Some(vec![ObjectId(1)]));
        let all = host
            .pick_objects("pick", &[GeometryKind::Solid, GeometryKind::Mesh])
            .unwrap();
        assert_eq!(all, Some(vec![ObjectId(1), ObjectId(2)]));
    }

    #[test]
    fn test_density_default_on_empty_line() {
        let scene = scene();
        let mut host = host(&scene, "\n", true);
        assert_eq!(host.get_density("density", 17.0, 0.0).unwrap(), Some(17.0));
    }

    #[test]
    fn test_density_retries_until_valid() {
        let scene = scene();
        let mut host = host(&scene, "heavy\n-3\n7.85\n", true);
        assert_eq!(host.get_density("density", 17.0, 0.0).unwrap(), Some(7.85));
    }

    #[test]
    fn test_density_cancel_and_eof() {
        let scene = scene();
        assert_eq!(host(&scene, "q\n", true).get_density("d", 1.0, 0.0).unwrap(), None);
        assert_eq!(host(&scene, "", true).get_density("d", 1.0, 0.0).unwrap(), None);
    }

    #[test]
    fn test_non_interactive_defaults() {
        let scene = scene();
        let mut host = host(&scene, "", false);
        assert_eq!(host.get_density("d", 17.0, 0.0).unwrap(), Some(17.0));
        assert!(!host.confirm("t", "m").unwrap());
    }

    #[test]
    fn test_preset_answers_win() {
        let scene = scene();
        let mut host = TerminalHost::new(
            &scene,
            Answers {
                density: Some(2.5),
                confirm: Some(true),
            },
            true,
            Cursor::new(Vec::new()),
        );
        assert_eq!(host.get_density("d", 17.0, 0.0).unwrap(), Some(2.5));
        assert!(host.confirm("t", "m").unwrap());
    }

    #[test]
    fn test_confirm_reads_yes() {
        let scene = scene();
        assert!(host(&scene, "yes\n", true).confirm("t", "m").unwrap());
        assert!(!host(&scene, "n\n", true).confirm("t", "m").unwrap());
    }

    #[test]
    fn test_zoom_to_unknown_ids_is_quiet() {
        let scene = scene();
        let mut host = host(&scene, "", false);
        host.zoom_to(&[ObjectId(1), ObjectId(2)]);
        host.zoom_to(&[ObjectId(42)]);
        assert!(host.highlighted().is_empty());
    }

    #[test]
    fn test_highlight_records_ids() {
        let scene = scene();
        let mut host = host(&scene, "", false);
        host.highlight(&[ObjectId(2)]);
        assert_eq!(host.highlighted(), &[ObjectId(2)]);
        assert_eq!(host.name_of(ObjectId(2)), "b (#2)");
    }
}
