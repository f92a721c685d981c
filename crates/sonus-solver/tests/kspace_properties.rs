//! Whole-run properties of the k-space solver.

use proptest::prelude::*;
use sonus_core::{Field3, GridSpec, Medium, TimeSpec};
use sonus_geometry::{Sensor, SensorQuantity};
use sonus_solver::{
    KGridSpec, KspaceFirstOrder, ReferenceSolver, SensorData, SimulationOptions, SolverInput,
};
use sonus_test_utils::fixtures::{centre_impulse, random_field, FIXTURE_DT, FIXTURE_DX};

fn solve(
    shape: [usize; 3],
    steps: usize,
    medium: &Medium,
    p0: &Field3,
    smooth: bool,
) -> SensorData {
    let kgrid = KGridSpec {
        grid: GridSpec::new(shape, [FIXTURE_DX; 3]).unwrap(),
        time: TimeSpec::new(steps, FIXTURE_DT),
    };
    let options = SimulationOptions::builder()
        .pml_size(2)
        .smooth_p0(smooth)
        .build()
        .unwrap();
    KspaceFirstOrder::new()
        .solve(&SolverInput {
            kgrid: &kgrid,
            medium,
            source: p0,
            sources: None,
            sensor: &Sensor::final_pressure(),
            options: &options,
        })
        .unwrap()
}

#[test]
fn one_dimensional_pulse_travels_both_ways() {
    let shape = [64, 1, 1];
    let p0 = centre_impulse(shape);
    let data = solve(shape, 41, &Medium::new(1500.0, 1000.0), &p0, true);
    let p = data.p_final_field().unwrap();
    // 40 intervals at CFL 0.3 is 12 cells of travel.
    let peak_left = (0..32).max_by(|&a, &b| p.get(a, 0, 0).total_cmp(&p.get(b, 0, 0))).unwrap();
    let peak_right = (33..64).max_by(|&a, &b| p.get(a, 0, 0).total_cmp(&p.get(b, 0, 0))).unwrap();
    assert!((19..=21).contains(&peak_left), "left peak at {peak_left}");
    assert!((43..=45).contains(&peak_right), "right peak at {peak_right}");
}

#[test]
fn reruns_are_bit_identical() {
    let shape = [10, 10, 6];
    let p0 = random_field(shape, 11);
    let medium = Medium::new(offset_field(random_field(shape, 12), 1500.0, 100.0), 1000.0);
    let a = solve(shape, 5, &medium, &p0, true);
    let b = solve(shape, 5, &medium, &p0, true);
    assert_eq!(a, b);
}

#[test]
fn point_sensor_matches_full_grid() {
    let shape = [12, 12, 1];
    let p0 = random_field(shape, 3);
    let medium = Medium::new(1500.0, 1000.0);
    let full = solve(shape, 6, &medium, &p0, false).p_final_field().unwrap();

    let kgrid = KGridSpec {
        grid: GridSpec::new(shape, [FIXTURE_DX; 3]).unwrap(),
        time: TimeSpec::new(6, FIXTURE_DT),
    };
    let options = SimulationOptions::builder()
        .pml_size(2)
        .smooth_p0(false)
        .build()
        .unwrap();
    let sensor = Sensor::at_points(vec![[1, 2, 0], [6, 6, 0]], [SensorQuantity::PressureFinal]);
    let points = KspaceFirstOrder::new()
        .solve(&SolverInput {
            kgrid: &kgrid,
            medium: &medium,
            source: &p0,
            sources: None,
            sensor: &sensor,
            options: &options,
        })
        .unwrap();
    assert_eq!(
        points.p_final().unwrap(),
        &[full.get(1, 2, 0), full.get(6, 6, 0)]
    );
}

fn offset_field(mut f: Field3, offset: f64, amplitude: f64) -> Field3 {
    for v in f.as_mut_slice() {
        *v = offset + amplitude * *v;
    }
    f
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))]

    #[test]
    fn response_is_linear_in_source(seed in 0u64..1000, scale in -4.0f64..4.0) {
        let shape = [10, 10, 1];
        let medium = Medium::new(1500.0, 1000.0);
        let p0 = random_field(shape, seed);
        let mut scaled = p0.clone();
        for v in scaled.as_mut_slice() {
            *v *= scale;
        }
        let a = solve(shape, 6, &medium, &p0, false).p_final_field().unwrap();
        let b = solve(shape, 6, &medium, &scaled, false).p_final_field().unwrap();
        let tol = 1e-9 * (1.0 + a.max_abs() * scale.abs());
        for (x, y) in a.as_slice().iter().zip(b.as_slice()) {
            prop_assert!((x * scale - y).abs() <= tol, "{} vs {}", x * scale, y);
        }
    }
}
