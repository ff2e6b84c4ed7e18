// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Parallel classification and volume accumulation
//!
//! Every worker folds its share of the input into a private
//! [`AggregateResult`]; the partials are merged by addition and
//! concatenation. No state is shared between workers, so the result does not
//! depend on scheduling except for the order in which floating-point partial
//! sums are added (relative differences around 1e-9 across runs).

use crate::classify::{classify, Classification};
use crate::document::{GeometryHandle, GeometryKind, ObjectId};
use crate::error::WeightError;
use ahash::AHashSet;
use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Kinds of geometry that need the user's attention before weighing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProblemCategory {
    Invalid,
    OpenSurface,
    OpenMesh,
    ComputationFailed,
}

impl ProblemCategory {
    pub const ALL: [ProblemCategory; 4] = [
        ProblemCategory::Invalid,
        ProblemCategory::OpenSurface,
        ProblemCategory::OpenMesh,
        ProblemCategory::ComputationFailed,
    ];
}

/// Receives one tick per classified object, from any worker thread
pub trait ProgressSink: Sync {
    fn tick(&self);
}

impl ProgressSink for () {
    fn tick(&self) {}
}

impl ProgressSink for AtomicUsize {
    fn tick(&self) {
        self.fetch_add(1, Ordering::Relaxed);
    }
}

/// Partition of one command's input plus the summed valid volume
#[derive(Debug, Clone, Default)]
pub struct AggregateResult {
    pub input_count: usize,
    pub total_volume: f64,
    pub valid_solids: usize,
    pub valid_meshes: usize,
    pub invalid: Vec<ObjectId>,
    pub open_surfaces: Vec<ObjectId>,
    pub open_meshes: Vec<ObjectId>,
    pub computation_failed: Vec<ObjectId>,
}

impl AggregateResult {
    /// Fold one classified object into the aggregate
    pub fn record(&mut self, id: ObjectId, classification: Classification) {
        self.input_count += 1;
        match classification {
            Classification::Valid { kind, volume } => {
                self.total_volume += volume;
                match kind {
                    GeometryKind::Solid => self.valid_solids += 1,
                    GeometryKind::Mesh => self.valid_meshes += 1,
                }
            }
            Classification::Invalid => self.invalid.push(id),
            Classification::OpenSurface => self.open_surfaces.push(id),
            Classification::OpenMesh => self.open_meshes.push(id),
            Classification::ComputationFailed { .. } => self.computation_failed.push(id),
        }
    }

    /// Combine two partial results
    pub fn merge(mut self, other: AggregateResult) -> AggregateResult {
        self.input_count += other.input_count;
        self.total_volume += other.total_volume;
        self.valid_solids += other.valid_solids;
        self.valid_meshes += other.valid_meshes;
        self.invalid.extend(other.invalid);
        self.open_surfaces.extend(other.open_surfaces);
        self.open_meshes.extend(other.open_meshes);
        self.computation_failed.extend(other.computation_failed);
        self
    }

    pub fn valid_count(&self) -> usize {
        self.valid_solids + self.valid_meshes
    }

    pub fn ids(&self, category: ProblemCategory) -> &[ObjectId] {
        match category {
            ProblemCategory::Invalid => &self.invalid,
            ProblemCategory::OpenSurface => &self.open_surfaces,
            ProblemCategory::OpenMesh => &self.open_meshes,
            ProblemCategory::ComputationFailed => &self.computation_failed,
        }
    }

    pub fn count(&self, category: ProblemCategory) -> usize {
        self.ids(category).len()
    }

    pub fn problem_count(&self) -> usize {
        ProblemCategory::ALL.iter().map(|c| self.count(*c)).sum()
    }

    pub fn has_problems(&self) -> bool {
        self.problem_count() > 0
    }

    /// Distinct problem object ids across all categories, sorted
    pub fn problem_ids(&self) -> Vec<ObjectId> {
        let unique: AHashSet<ObjectId> = ProblemCategory::ALL
            .iter()
            .flat_map(|c| self.ids(*c).iter().copied())
            .collect();
        let mut ids: Vec<ObjectId> = unique.into_iter().collect();
        ids.sort_unstable();
        ids
    }
}

/// Runs the classification pass, on the global rayon pool or a dedicated one
pub struct VolumeAccumulator {
    pool: Option<rayon::ThreadPool>,
}

impl VolumeAccumulator {
    /// Use rayon's global pool
    pub fn new() -> Self {
        Self { pool: None }
    }

    /// Use a dedicated pool with `threads` workers
    pub fn with_threads(threads: usize) -> Result<Self, WeightError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("metalweight-{}", i))
            .build()?;
        Ok(Self { pool: Some(pool) })
    }

    /// Build from an optional thread count; `None` or zero means the global pool
    pub fn from_parallelism(parallelism: Option<usize>) -> Result<Self, WeightError> {
        match parallelism {
            Some(threads) if threads > 0 => Self::with_threads(threads),
            _ => Ok(Self::new()),
        }
    }

    pub fn run<H: GeometryHandle>(&self, handles: &[H], progress: &dyn ProgressSink) -> AggregateResult {
        log::debug!("Classifying {} objects", handles.len());

        let result = match &self.pool {
            Some(pool) => pool.install(|| classify_all(handles, progress)),
            None => classify_all(handles, progress),
        };

        log::debug!(
            "Classified {} objects: {} valid, {} problems, volume {}",
            result.input_count,
            result.valid_count(),
            result.problem_count(),
            result.total_volume
        );
        result
    }
}

impl Default for VolumeAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

fn classify_all<H: GeometryHandle>(handles: &[H], progress: &dyn ProgressSink) -> AggregateResult {
    handles
        .par_iter()
        .fold(AggregateResult::default, |mut acc, handle| {
            acc.record(handle.id(), classify(handle));
            progress.tick();
            acc
        })
        .reduce(AggregateResult::default, AggregateResult::merge)
}

/// Classify and accumulate on the global pool without progress reporting
pub fn accumulate<H: GeometryHandle>(handles: &[H]) -> AggregateResult {
    VolumeAccumulator::new().run(handles, &())
}
