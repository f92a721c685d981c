//! Test utilities and mock solvers for sonus development.
//!
//! Provides a recording [`MockSolver`], a [`FailingSolver`] that returns a
//! fixed error, and the fixtures in [`fixtures`] for building setup files
//! and seeded random fields.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::sync::Mutex;

use sonus_geometry::SensorQuantity;
use sonus_solver::{ReferenceSolver, SensorData, SensorRecord, SolverError, SolverInput};

/// What a [`MockSolver`] saw on one call to `solve`.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedCall {
    pub shape: [usize; 3],
    pub steps: usize,
    pub dt: f64,
    pub pml_size: [usize; 3],
    pub smooth_p0: bool,
    pub plot_sim: bool,
    pub lossy: bool,
    pub has_sources: bool,
    pub record: Vec<SensorQuantity>,
}

/// Solver that records every call and echoes the source back.
///
/// Every requested quantity is answered with the sensor's samples of the
/// initial pressure: snapshots for the scalar quantities and a history of
/// `steps` identical frames for `Pressure`.
#[derive(Default)]
pub struct MockSolver {
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockSolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call seen so far, oldest first.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or(0)
    }
}

impl ReferenceSolver for MockSolver {
    fn name(&self) -> &str {
        "MockSolver"
    }

    fn solve(&self, input: &SolverInput<'_>) -> Result<SensorData, SolverError> {
        let shape = input.kgrid.grid.shape();
        let steps = input.kgrid.time.steps;
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RecordedCall {
                shape,
                steps,
                dt: input.kgrid.time.dt,
                pml_size: input.options.pml_size(),
                smooth_p0: input.options.smooth_p0(),
                plot_sim: input.options.plot_sim(),
                lossy: input.medium.is_lossy(),
                has_sources: input.sources.is_some(),
                record: input.sensor.record.to_vec(),
            });
        }
        let samples = input.sensor.sample(input.source);
        let mut data = SensorData::new(shape, input.sensor, steps);
        for &q in &input.sensor.record {
            let rec = if q.is_time_history() {
                SensorRecord::History(vec![samples.clone(); steps])
            } else {
                SensorRecord::Snapshot(samples.clone())
            };
            data.records.insert(q, rec);
        }
        Ok(data)
    }
}

/// Solver that always fails with the given error.
pub struct FailingSolver {
    pub error: SolverError,
}

impl FailingSolver {
    pub fn new(error: SolverError) -> Self {
        Self { error }
    }
}

impl ReferenceSolver for FailingSolver {
    fn name(&self) -> &str {
        "FailingSolver"
    }

    fn solve(&self, _input: &SolverInput<'_>) -> Result<SensorData, SolverError> {
        Err(self.error.clone())
    }
}
