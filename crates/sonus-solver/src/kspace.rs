//! First-order k-space pseudospectral solver for the acoustic initial value
//! problem in a heterogeneous fluid.
//!
//! Coupled first-order equations on a staggered grid, with the density
//! split into one component per active axis so the PML can damp each
//! direction separately:
//!
//! ```text
//! u_a   ← pml'_a (pml'_a u_a − dt/ρ0'_a · ∂_a⁺ p)
//! ρ_a   ← pml_a  (pml_a  ρ_a − dt ρ0 · ∂_a⁻ u_a)
//! p     = c² Σ_a ρ_a
//! ```
//!
//! `∂⁺`/`∂⁻` are the k-space corrected staggered derivatives from
//! [`StaggeredDerivative`] and primes mark staggered-grid quantities. An
//! absorbing medium replaces the last line with the power-law relation in
//! [`crate::absorption`].
//!
//! # Initial condition timing
//!
//! The initial pressure is enforced *at* the first time step rather than
//! before it: step 1 sets `p = p0`, splits the density equally across axes,
//! and sets the velocity to its value at `t = −dt/2` so that `u(0) = 0`.
//! The first recorded pressure is therefore `p0` itself, and `Nt` steps
//! cover `Nt − 1` propagation intervals.
//!
//! # Sources
//!
//! Step `s` is time index `s − 1`. Source samples for that index are added
//! to the density after its update as a mass source,
//! `ρ_a += 2 dt s / (D c dx_a)` over the `D` active axes.

use rustfft::num_complex::Complex;
use sonus_core::conversion::pressure_from_density;
use sonus_core::{Field3, GridSpec};
use sonus_geometry::{Sensor, SensorQuantity, TimeVaryingSource};
use tracing::{debug, trace};

use crate::absorption::PowerLawAbsorption;
use crate::error::SolverError;
use crate::pml::{validate_pml, Pml};
use crate::smooth::smooth;
use crate::solver::{ReferenceSolver, SensorData, SensorRecord, SolverInput};
use crate::spectral::{Shift, Spectral3, StaggeredDerivative};

/// The k-space first-order reference solver.
#[derive(Clone, Copy, Debug, Default)]
pub struct KspaceFirstOrder;

impl KspaceFirstOrder {
    /// Create the solver.
    pub fn new() -> Self {
        Self
    }

    fn validate(input: &SolverInput<'_>) -> Result<(), SolverError> {
        let grid = &input.kgrid.grid;
        let time = &input.kgrid.time;
        if time.steps == 0 || !time.has_valid_dt() {
            return Err(SolverError::InvalidTime {
                steps: time.steps,
                dt: time.dt,
            });
        }
        input.medium.validate(grid)?;
        input
            .source
            .check_shape(grid.shape())
            .map_err(|source| SolverError::ShapeMismatch { input: "p0", source })?;
        if input.sensor.record.is_empty() {
            return Err(SolverError::EmptySensor);
        }
        input.sensor.validate(grid.shape())?;
        if let Some(sources) = input.sources {
            sources.validate(grid.shape())?;
            let source_dt = sources.dt();
            if !(source_dt.is_finite() && (source_dt - time.dt).abs() <= 1e-9 * time.dt) {
                return Err(SolverError::SourceTiming {
                    source_dt,
                    dt: time.dt,
                });
            }
        }
        validate_pml(grid.shape(), input.options.pml_size())?;
        if !(input.options.pml_alpha().is_finite() && input.options.pml_alpha() >= 0.0) {
            return Err(SolverError::InvalidBoundary {
                reason: format!("pml_alpha must be >= 0, got {}", input.options.pml_alpha()),
            });
        }
        Ok(())
    }
}

/// Density interpolated half a cell forward along `axis`.
///
/// Linear interpolation between neighbours; the last cell on the axis has
/// no right neighbour and keeps its own value.
fn staggered_density(grid: &GridSpec, rho0: &[f64], axis: usize) -> Vec<f64> {
    let n = grid.shape()[axis];
    (0..grid.cell_count())
        .map(|idx| {
            let mut c = grid.coords(idx);
            if c[axis] + 1 < n {
                c[axis] += 1;
                0.5 * (rho0[idx] + rho0[grid.index(c[0], c[1], c[2])])
            } else {
                rho0[idx]
            }
        })
        .collect()
}

/// A time-varying source applied as a mass source on the split density.
struct MassSource<'a> {
    source: &'a dyn TimeVaryingSource,
    shape: [usize; 3],
    axes: Vec<usize>,
    /// `2 dt / (D c dx_a)` per active axis and cell.
    scale: [Vec<f64>; 3],
    buf: Vec<f64>,
}

impl<'a> MassSource<'a> {
    fn new(
        source: &'a dyn TimeVaryingSource,
        grid: &GridSpec,
        axes: &[usize],
        c2: &[f64],
        dt: f64,
    ) -> Self {
        let dims = axes.len().max(1) as f64;
        let spacing = grid.spacing();
        let scale = std::array::from_fn(|a| {
            if axes.contains(&a) {
                c2.iter()
                    .map(|c2| 2.0 * dt / (dims * c2.sqrt() * spacing[a]))
                    .collect()
            } else {
                Vec::new()
            }
        });
        Self {
            source,
            shape: grid.shape(),
            axes: axes.to_vec(),
            scale,
            buf: vec![0.0; c2.len()],
        }
    }

    /// Inject the samples for `time_index`; `false` if there were none.
    fn inject(&mut self, time_index: usize, rho: &mut [Vec<f64>; 3]) -> bool {
        self.buf.fill(0.0);
        if !self.source.add_on_grid(time_index, self.shape, &mut self.buf) {
            return false;
        }
        for &a in &self.axes {
            for (i, s) in self.buf.iter().enumerate() {
                rho[a][i] += self.scale[a][i] * s;
            }
        }
        true
    }
}

/// Streaming accumulator for the quantities a sensor records.
struct Recorder<'a> {
    sensor: &'a Sensor,
    history: Vec<Vec<f64>>,
    last: Vec<f64>,
    max: Vec<f64>,
    min: Vec<f64>,
    sum_sq: Vec<f64>,
    steps: usize,
}

impl<'a> Recorder<'a> {
    fn new(sensor: &'a Sensor, samples: usize, steps: usize) -> Self {
        let wants = |q| sensor.records(q);
        let sized = |on: bool, fill: f64| if on { vec![fill; samples] } else { Vec::new() };
        Self {
            sensor,
            history: if wants(SensorQuantity::Pressure) {
                Vec::with_capacity(steps)
            } else {
                Vec::new()
            },
            last: Vec::new(),
            max: sized(wants(SensorQuantity::PressureMax), f64::NEG_INFINITY),
            min: sized(wants(SensorQuantity::PressureMin), f64::INFINITY),
            sum_sq: sized(wants(SensorQuantity::PressureRms), 0.0),
            steps: 0,
        }
    }

    fn record(&mut self, p: &Field3) {
        let samples = self.sensor.sample(p);
        for (m, v) in self.max.iter_mut().zip(&samples) {
            *m = m.max(*v);
        }
        for (m, v) in self.min.iter_mut().zip(&samples) {
            *m = m.min(*v);
        }
        for (s, v) in self.sum_sq.iter_mut().zip(&samples) {
            *s += v * v;
        }
        if self.sensor.records(SensorQuantity::Pressure) {
            self.history.push(samples.clone());
        }
        self.last = samples;
        self.steps += 1;
    }

    fn finish(self, data: &mut SensorData) {
        let steps = self.steps.max(1) as f64;
        let mut history = Some(self.history);
        let mut last = Some(self.last);
        let mut max = Some(self.max);
        let mut min = Some(self.min);
        let mut sum_sq = Some(self.sum_sq);
        for &q in &self.sensor.record {
            let rec = match q {
                SensorQuantity::Pressure => history.take().map(SensorRecord::History),
                SensorQuantity::PressureFinal => last.take().map(SensorRecord::Snapshot),
                SensorQuantity::PressureMax => max.take().map(SensorRecord::Snapshot),
                SensorQuantity::PressureMin => min.take().map(SensorRecord::Snapshot),
                SensorQuantity::PressureRms => sum_sq.take().map(|s| {
                    SensorRecord::Snapshot(s.into_iter().map(|v| (v / steps).sqrt()).collect())
                }),
            };
            if let Some(rec) = rec {
                data.records.insert(q, rec);
            }
        }
    }
}

impl ReferenceSolver for KspaceFirstOrder {
    fn name(&self) -> &str {
        "KspaceFirstOrder"
    }

    fn solve(&self, input: &SolverInput<'_>) -> Result<SensorData, SolverError> {
        Self::validate(input)?;

        let grid = input.kgrid.grid;
        let steps = input.kgrid.time.steps;
        let dt = input.kgrid.time.dt;
        let shape = grid.shape();
        let n = grid.cell_count();
        let axes: Vec<usize> = (0..3).filter(|&a| grid.is_active(a)).collect();
        let dims = axes.len().max(1) as f64;

        let c_ref = input.medium.reference_sound_speed();
        let c2: Vec<f64> = (0..n)
            .map(|i| input.medium.sound_speed.value_at(i).powi(2))
            .collect();
        let rho0: Vec<f64> = (0..n).map(|i| input.medium.density.value_at(i)).collect();
        let rho0_sg: [Vec<f64>; 3] = std::array::from_fn(|a| {
            if grid.is_active(a) {
                staggered_density(&grid, &rho0, a)
            } else {
                Vec::new()
            }
        });

        let fft = Spectral3::new(&grid);
        let ops = StaggeredDerivative::new(&grid, c_ref, dt);
        let pml = Pml::new(
            shape,
            grid.spacing(),
            dt,
            c_ref,
            input.options.pml_size(),
            input.options.pml_alpha(),
        );

        let p0 = if input.options.smooth_p0() {
            smooth(input.source, &fft, true)
                .map_err(|source| SolverError::ShapeMismatch { input: "p0", source })?
        } else {
            input.source.clone()
        };
        let absorption = PowerLawAbsorption::new(&grid, input.medium);
        let mut mass_source = input
            .sources
            .map(|src| MassSource::new(src, &grid, &axes, &c2, dt));

        debug!(
            solver = self.name(),
            ?shape,
            steps,
            dt,
            c_ref,
            pml = ?input.options.pml_size(),
            smooth_p0 = input.options.smooth_p0(),
            lossy = absorption.is_some(),
            sources = mass_source.is_some(),
            "starting k-space simulation"
        );

        let lossless_pressure = |rho: &[Vec<f64>; 3]| {
            let components: Vec<&[f64]> = axes.iter().map(|&a| rho[a].as_slice()).collect();
            pressure_from_density(&components, |i| c2[i])
        };

        let mut u: [Vec<f64>; 3] = std::array::from_fn(|_| vec![0.0; n]);
        let mut rho: [Vec<f64>; 3] = std::array::from_fn(|_| vec![0.0; n]);
        let mut div_u = vec![0.0; if absorption.is_some() { n } else { 0 }];
        let mut p = Field3::zeros(shape);

        let mut recorder = Recorder::new(input.sensor, input.sensor.sample_count(shape), steps);
        let mut data = SensorData::new(shape, input.sensor, steps);
        let mut diagnostics = input.options.plot_sim().then(|| Vec::with_capacity(steps));

        for step in 1..=steps {
            let time_index = step - 1;
            if step == 1 {
                p = p0.clone();
                let p_k = fft.forward(p.as_slice());
                for &a in &axes {
                    for i in 0..n {
                        rho[a][i] = p0.as_slice()[i] / (dims * c2[i]);
                    }
                    let grad = ops.apply(&fft, &p_k, a, Shift::Positive);
                    for i in 0..n {
                        u[a][i] = dt / (2.0 * rho0_sg[a][i]) * grad[i];
                    }
                }
                let injected = !axes.is_empty()
                    && mass_source
                        .as_mut()
                        .is_some_and(|m| m.inject(time_index, &mut rho));
                if injected {
                    p.as_mut_slice().copy_from_slice(&lossless_pressure(&rho));
                }
            } else if !axes.is_empty() {
                let p_k: Vec<Complex<f64>> = fft.forward(p.as_slice());
                for &a in &axes {
                    let grad = ops.apply(&fft, &p_k, a, Shift::Positive);
                    for i in 0..n {
                        let m = grid.coords(i)[a];
                        let w = pml.staggered(a, m);
                        u[a][i] = w * (w * u[a][i] - dt / rho0_sg[a][i] * grad[i]);
                    }
                }
                div_u.fill(0.0);
                for &a in &axes {
                    let u_k = fft.forward(&u[a]);
                    let div = ops.apply(&fft, &u_k, a, Shift::Negative);
                    for i in 0..n {
                        let m = grid.coords(i)[a];
                        let w = pml.regular(a, m);
                        rho[a][i] = w * (w * rho[a][i] - dt * rho0[i] * div[i]);
                    }
                    for (d, v) in div_u.iter_mut().zip(&div) {
                        *d += v;
                    }
                }
                if let Some(m) = mass_source.as_mut() {
                    m.inject(time_index, &mut rho);
                }
                let next = match &absorption {
                    Some(absorption) => {
                        let rho_sum: Vec<f64> = (0..n)
                            .map(|i| axes.iter().map(|&a| rho[a][i]).sum())
                            .collect();
                        let rho0_div_u: Vec<f64> =
                            div_u.iter().zip(&rho0).map(|(d, r)| r * d).collect();
                        absorption.pressure(&fft, &c2, &rho_sum, &rho0_div_u)
                    }
                    None => lossless_pressure(&rho),
                };
                p.as_mut_slice().copy_from_slice(&next);
            }

            if let Some(index) = p.first_non_finite() {
                return Err(SolverError::Diverged { step, index });
            }
            if let Some(d) = diagnostics.as_mut() {
                d.push(p.max_abs());
            }
            trace!(step, max_abs = p.max_abs(), "step complete");
            recorder.record(&p);
        }

        recorder.finish(&mut data);
        data.diagnostics = diagnostics;
        debug!(solver = self.name(), steps, "simulation complete");
        Ok(data)
    }
}
