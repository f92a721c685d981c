//! Benchmark profiles for the sonus solvers.
//!
//! - [`impulse_profile`]: homogeneous water, single-voxel source
//! - [`heterogeneous_profile`]: seeded random density and sound speed

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use sonus_core::{Field3, GridSpec, Medium, TimeSpec};
use sonus_geometry::Sensor;
use sonus_solver::{KGridSpec, SimulationOptions, SolverInput};

/// Owned inputs for one solver run.
pub struct BenchCase {
    pub kgrid: KGridSpec,
    pub medium: Medium,
    pub source: Field3,
    pub sensor: Sensor,
    pub options: SimulationOptions,
}

impl BenchCase {
    pub fn input(&self) -> SolverInput<'_> {
        SolverInput {
            kgrid: &self.kgrid,
            medium: &self.medium,
            source: &self.source,
            sources: None,
            sensor: &self.sensor,
            options: &self.options,
        }
    }
}

const DX: f64 = 1e-4;
const DT: f64 = 2e-8;

fn grid(shape: [usize; 3]) -> GridSpec {
    match GridSpec::new(shape, [DX; 3]) {
        Ok(g) => g,
        Err(e) => panic!("invalid benchmark grid {shape:?}: {e}"),
    }
}

/// PML of 10% of the smallest active axis, at least one point.
fn pml_for(shape: [usize; 3]) -> SimulationOptions {
    let smallest = shape.iter().copied().filter(|&n| n > 1).min().unwrap_or(1);
    SimulationOptions::builder()
        .pml_size((smallest / 10).max(1))
        .build()
        .unwrap_or_default()
}

/// Homogeneous water with a unit impulse at the centre.
pub fn impulse_profile(shape: [usize; 3], steps: usize) -> BenchCase {
    let grid = grid(shape);
    let mut source = Field3::zeros(shape);
    let [i, j, k] = grid.center();
    source.set(i, j, k, 1.0);
    BenchCase {
        kgrid: KGridSpec {
            grid,
            time: TimeSpec::new(steps, DT),
        },
        medium: Medium::new(1500.0, 1000.0),
        source,
        sensor: Sensor::final_pressure(),
        options: pml_for(shape),
    }
}

/// Soft-tissue-like random medium: sound speed in [1450, 1600) m/s and
/// density in [950, 1100) kg/m³.
pub fn heterogeneous_profile(shape: [usize; 3], steps: usize, seed: u64) -> BenchCase {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut c = Field3::zeros(shape);
    let mut rho = Field3::zeros(shape);
    for v in c.as_mut_slice() {
        *v = 1450.0 + 150.0 * rng.random::<f64>();
    }
    for v in rho.as_mut_slice() {
        *v = 950.0 + 150.0 * rng.random::<f64>();
    }
    let mut case = impulse_profile(shape, steps);
    case.medium = Medium::new(c, rho);
    case
}
