// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! The weight command: selection, density prompt, classification pass,
//! problem gate and result report.
//!
//! Everything interactive goes through the [`Prompter`] and [`HostUi`]
//! collaborators so that the flow can run against any host.

use crate::accumulate::{AggregateResult, ProgressSink, VolumeAccumulator};
use crate::config::{WeightConfig, DENSITY_LOWER_BOUND};
use crate::document::{Document, GeometryKind, ObjectId};
use crate::error::{check_density, WeightError};
use crate::report::{problem_message, WeightReport, WARNING_TITLE};
use ahash::AHashSet;
use anyhow::Result;

pub const SELECT_PROMPT: &str = "Select solids or meshes";

/// Interactive input owned by the host. `Ok(None)` means the user cancelled.
pub trait Prompter {
    /// Ask the user to pick objects of the given kinds
    fn pick_objects(&mut self, prompt: &str, filter: &[GeometryKind]) -> Result<Option<Vec<ObjectId>>>;

    fn get_density(&mut self, prompt: &str, default: f64, lower_bound: f64) -> Result<Option<f64>>;

    /// Yes/no question; `false` declines
    fn confirm(&mut self, title: &str, message: &str) -> Result<bool>;
}

/// Host display state the command drives but never owns
pub trait HostUi {
    /// Replace the host selection with `ids`
    fn highlight(&mut self, ids: &[ObjectId]);

    fn zoom_to(&mut self, ids: &[ObjectId]);

    fn show_progress(&mut self, message: &str, total: usize);

    /// Tick target for the classification pass, live between
    /// `show_progress` and `hide_progress`
    fn progress(&self) -> &dyn ProgressSink;

    fn hide_progress(&mut self);

    /// Command-line style status output
    fn write_line(&mut self, line: &str);
}

/// A host able to run the command
pub trait CommandHost: Prompter + HostUi {}

impl<T: Prompter + HostUi> CommandHost for T {}

/// Completion status reported to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    Success,
    Cancelled,
    NothingToDo,
}

/// Why a command stopped without a result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    SelectionCancelled,
    NoInput,
    DensityCancelled,
    ProblemsDeclined,
}

#[derive(Debug, Clone)]
pub enum CommandOutcome {
    Success(WeightReport),
    Cancelled(CancelReason),
    NothingToDo,
}

impl CommandOutcome {
    pub fn status(&self) -> CommandStatus {
        match self {
            CommandOutcome::Success(_) => CommandStatus::Success,
            CommandOutcome::Cancelled(_) => CommandStatus::Cancelled,
            CommandOutcome::NothingToDo => CommandStatus::NothingToDo,
        }
    }

    pub fn report(&self) -> Option<&WeightReport> {
        match self {
            CommandOutcome::Success(report) => Some(report),
            _ => None,
        }
    }
}

/// Weight estimation command
pub struct WeightCommand {
    config: WeightConfig,
    accumulator: VolumeAccumulator,
}

impl WeightCommand {
    pub fn new(config: WeightConfig) -> Result<Self, WeightError> {
        let accumulator = VolumeAccumulator::from_parallelism(config.parallelism)?;
        Ok(Self { config, accumulator })
    }

    pub fn run<D: Document, H: CommandHost>(&self, doc: &D, host: &mut H) -> Result<CommandOutcome> {
        let ids = match self.select(doc, host)? {
            Some(ids) => ids,
            None => return Ok(CommandOutcome::Cancelled(CancelReason::SelectionCancelled)),
        };

        if ids.is_empty() {
            host.write_line("❌ No objects selected.");
            return Ok(CommandOutcome::Cancelled(CancelReason::NoInput));
        }

        let objects = ids
            .iter()
            .map(|id| doc.object(*id).ok_or(WeightError::UnknownObject(*id)))
            .collect::<Result<Vec<_>, _>>()?;

        let prompt = format!("Enter density in grams per cubic {}", doc.unit_system());
        let density = match host.get_density(
            &prompt,
            self.config.default_density,
            DENSITY_LOWER_BOUND,
        )? {
            Some(value) => check_density(value)?,
            None => return Ok(CommandOutcome::Cancelled(CancelReason::DensityCancelled)),
        };

        host.write_line(&format!("Analyzing {} selected objects...", objects.len()));
        log::info!("Weighing {} objects at density {}", objects.len(), density);

        host.show_progress("Calculating...", objects.len());
        let result = self.accumulator.run(&objects, host.progress());
        host.hide_progress();

        if result.has_problems() && !self.gate(&result, host)? {
            host.write_line("Operation cancelled by user.");
            log::info!("Problem geometry declined; {} problem objects", result.problem_count());
            return Ok(CommandOutcome::Cancelled(CancelReason::ProblemsDeclined));
        }

        if result.valid_count() == 0 {
            host.write_line("No valid solid or closed objects were found to calculate.");
            return Ok(CommandOutcome::NothingToDo);
        }

        let report = WeightReport::new(&result, density, doc.unit_system());
        for line in report.summary_lines() {
            host.write_line(&line);
        }
        log::info!(
            "Total volume {} ({} valid objects), weight {} g",
            report.total_volume,
            report.valid_count(),
            report.weight
        );

        Ok(CommandOutcome::Success(report))
    }

    /// Pre-selection first, interactive pick otherwise. Duplicate ids are
    /// dropped, keeping first occurrence.
    fn select<D: Document, H: CommandHost>(&self, doc: &D, host: &mut H) -> Result<Option<Vec<ObjectId>>> {
        let mut ids = doc.selected_ids();
        if ids.is_empty() {
            match host.pick_objects(SELECT_PROMPT, &[GeometryKind::Solid, GeometryKind::Mesh])? {
                Some(picked) => ids = picked,
                None => return Ok(None),
            }
        }

        let mut seen = AHashSet::with_capacity(ids.len());
        ids.retain(|id| seen.insert(*id));
        Ok(Some(ids))
    }

    /// Show the problem objects and ask whether to continue
    fn gate<H: CommandHost>(&self, result: &AggregateResult, host: &mut H) -> Result<bool> {
        let problem_ids = result.problem_ids();
        host.highlight(&problem_ids);
        host.zoom_to(&problem_ids);

        if let Some(answer) = self.config.auto_confirm {
            log::debug!("Problem gate answered by configuration: {}", answer);
            return Ok(answer);
        }
        host.confirm(WARNING_TITLE, &problem_message(result))
    }
}
