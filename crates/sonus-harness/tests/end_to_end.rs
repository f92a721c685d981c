//! End-to-end validation runs through setup files on disk.

use std::fs;
use std::path::PathBuf;

use sonus_core::Field3;
use sonus_geometry::SensorQuantity;
use sonus_harness::{
    compare_outputs, load_output, run_validation, save_output, HarnessError, LoadError,
    WriteError,
};
use sonus_solver::{KspaceFirstOrder, SolverError};
use sonus_test_utils::fixtures::{
    centre_impulse, impulse_setup, random_field, write_json, TestDir,
};
use sonus_test_utils::{FailingSolver, MockSolver};

fn write_impulse_setup(dir: &TestDir, name: &str, n: usize, nt: usize, pml: usize) -> PathBuf {
    let path = dir.join(name);
    write_json(&path, &impulse_setup([n; 3], nt, pml)).unwrap();
    path
}

// ── planning, observed through a mock ───────────────────────────

#[test]
fn solver_sees_nt_plus_one_steps_and_final_pressure_sensor() {
    let dir = TestDir::new("plan");
    let setup = write_impulse_setup(&dir, "setup_impulse.json", 4, 10, 1);
    let solver = MockSolver::new();

    let report = run_validation(&setup, false, &solver).unwrap();

    let calls = solver.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].steps, 11);
    assert_eq!(calls[0].shape, [4, 4, 4]);
    assert_eq!(calls[0].record, vec![SensorQuantity::PressureFinal]);
    assert_eq!(calls[0].pml_size, [1, 1, 1]);
    assert!(!calls[0].smooth_p0);
    assert!(!calls[0].plot_sim);
    assert_eq!(report.output_path, dir.join("impulse.json"));
    assert!(report.plot_paths.is_empty());
}

#[test]
fn output_holds_exactly_p_final() {
    let dir = TestDir::new("format");
    let setup = write_impulse_setup(&dir, "setup_echo.json", 4, 2, 1);
    run_validation(&setup, false, &MockSolver::new()).unwrap();

    let out = dir.join("echo.json");
    let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    let keys: Vec<&String> = raw.as_object().unwrap().keys().collect();
    assert_eq!(keys, vec!["p_final"]);
    assert_eq!(load_output(&out).unwrap(), centre_impulse([4; 3]));
}

#[test]
fn unprefixed_setup_is_never_overwritten() {
    let dir = TestDir::new("unprefixed");
    let setup = write_impulse_setup(&dir, "impulse.json", 4, 1, 1);
    let before = fs::read(&setup).unwrap();
    let solver = MockSolver::new();

    for _ in 0..2 {
        match run_validation(&setup, false, &solver).unwrap_err() {
            HarnessError::Write {
                path,
                source: WriteError::OverwritesSetup { setup: named },
            } => {
                assert_eq!(path, setup);
                assert_eq!(named, setup);
            }
            other => panic!("expected a write collision, got {other}"),
        }
    }
    assert_eq!(fs::read(&setup).unwrap(), before);
    assert_eq!(solver.call_count(), 0);
}

#[test]
fn saved_values_keep_every_bit() {
    let dir = TestDir::new("bits");
    let path = dir.join("random.json");
    let field = random_field([16, 16, 16], 0x5eed);
    save_output(&path, &field).unwrap();

    let back = load_output(&path).unwrap();
    assert_eq!(back.shape(), field.shape());
    let changed = field
        .as_slice()
        .iter()
        .zip(back.as_slice())
        .filter(|(a, b)| a.to_bits() != b.to_bits())
        .count();
    assert_eq!(changed, 0, "{changed} of {} values changed", field.len());
}

#[test]
fn setup_p0_reaches_the_solver_bit_exact() {
    let dir = TestDir::new("p0-bits");
    let p0 = random_field([6, 6, 6], 17);
    let mut doc = impulse_setup([6; 3], 2, 1);
    doc["p0"] = serde_json::to_value(&p0).unwrap();
    let setup = dir.join("setup_noise.json");
    write_json(&setup, &doc).unwrap();

    let report = run_validation(&setup, false, &MockSolver::new()).unwrap();
    let echoed = load_output(&report.output_path).unwrap();
    assert!(p0
        .as_slice()
        .iter()
        .zip(echoed.as_slice())
        .all(|(a, b)| a.to_bits() == b.to_bits()));
}

#[test]
fn attenuation_reaches_the_solver() {
    let dir = TestDir::new("lossy-plan");
    let mut doc = impulse_setup([4; 3], 3, 1);
    doc["attenuation"] = serde_json::json!(0.5);
    doc["alpha_power"] = serde_json::json!(1.5);
    let setup = dir.join("setup_lossy.json");
    write_json(&setup, &doc).unwrap();

    let solver = MockSolver::new();
    run_validation(&setup, false, &solver).unwrap();
    let calls = solver.calls();
    assert!(calls[0].lossy);
    assert!(!calls[0].has_sources);
}

// ── reference solver ────────────────────────────────────────────

#[test]
fn absorbing_setup_ends_with_less_energy() {
    let dir = TestDir::new("lossy-run");
    let plain = write_impulse_setup(&dir, "setup_plain.json", 8, 12, 2);
    let mut doc = impulse_setup([8; 3], 12, 2);
    doc["attenuation"] = serde_json::json!(5.0);
    doc["alpha_power"] = serde_json::json!(1.5);
    let lossy = dir.join("setup_lossy.json");
    write_json(&lossy, &doc).unwrap();

    let a = run_validation(&plain, false, &KspaceFirstOrder::new()).unwrap();
    let b = run_validation(&lossy, false, &KspaceFirstOrder::new()).unwrap();
    assert!(b.energy.is_finite());
    assert!(b.energy < a.energy, "{} vs {}", b.energy, a.energy);
}

#[test]
fn impulse_spreads_from_centre() {
    let dir = TestDir::new("impulse");
    let setup = write_impulse_setup(&dir, "setup_impulse.json", 8, 10, 2);

    let report = run_validation(&setup, false, &KspaceFirstOrder::new()).unwrap();
    assert_eq!(report.steps, 11);
    assert_eq!(report.shape, [8, 8, 8]);

    let p = load_output(&report.output_path).unwrap();
    let p0 = centre_impulse([8; 3]);
    assert_eq!(p.shape(), [8, 8, 8]);
    assert!(p.is_finite());
    assert!(p.get(4, 4, 4).abs() < 1.0);
    assert!(p.get(4, 4, 5).abs() > 0.0);
    assert!(p.get(5, 4, 4).abs() > 0.0);
    assert!(p.energy() <= p0.energy());
}

#[test]
fn plotting_does_not_change_output() {
    let plain = TestDir::new("noplot");
    let plotted = TestDir::new("plot");
    let a = write_impulse_setup(&plain, "setup_case.json", 8, 6, 2);
    let b = write_impulse_setup(&plotted, "setup_case.json", 8, 6, 2);

    let ra = run_validation(&a, false, &KspaceFirstOrder::new()).unwrap();
    let rb = run_validation(&b, true, &KspaceFirstOrder::new()).unwrap();

    assert_eq!(
        fs::read(&ra.output_path).unwrap(),
        fs::read(&rb.output_path).unwrap()
    );
    assert_eq!(
        rb.plot_paths,
        vec![
            plotted.join("case_p_final.png"),
            plotted.join("case_max_pressure.png")
        ]
    );
    for path in &rb.plot_paths {
        assert!(path.exists());
    }
}

#[test]
fn repeated_runs_are_bit_identical() {
    let first = TestDir::new("repro-a");
    let second = TestDir::new("repro-b");
    let a = write_impulse_setup(&first, "setup_r.json", 8, 8, 2);
    let b = write_impulse_setup(&second, "setup_r.json", 8, 8, 2);

    let ra = run_validation(&a, false, &KspaceFirstOrder::new()).unwrap();
    let rb = run_validation(&b, false, &KspaceFirstOrder::new()).unwrap();

    assert_eq!(
        fs::read(&ra.output_path).unwrap(),
        fs::read(&rb.output_path).unwrap()
    );
    let cmp = compare_outputs(&ra.output_path, &rb.output_path, 0.0).unwrap();
    assert!(cmp.bit_identical);
}

// ── error classes ───────────────────────────────────────────────

#[test]
fn missing_setup_is_a_load_error() {
    let dir = TestDir::new("missing");
    let err = run_validation(&dir.join("setup_none.json"), false, &MockSolver::new()).unwrap_err();
    assert!(matches!(
        err,
        HarnessError::Load {
            source: LoadError::Io(_),
            ..
        }
    ));
}

#[test]
fn malformed_setup_is_a_load_error_and_solver_never_runs() {
    let dir = TestDir::new("malformed");
    let path = dir.join("setup_bad.json");
    fs::write(&path, "{\"Nx\": [4, 4, 4]}").unwrap();
    let solver = MockSolver::new();
    let err = run_validation(&path, false, &solver).unwrap_err();
    assert!(matches!(
        err,
        HarnessError::Load {
            source: LoadError::Parse(_),
            ..
        }
    ));
    assert_eq!(solver.call_count(), 0);
}

#[test]
fn oversize_pml_is_a_solver_error() {
    let dir = TestDir::new("pml");
    let setup = write_impulse_setup(&dir, "setup_pml.json", 8, 4, 4);
    let err = run_validation(&setup, false, &KspaceFirstOrder::new()).unwrap_err();
    assert!(matches!(
        err,
        HarnessError::Solver(SolverError::InvalidBoundary { .. })
    ));
    assert!(!dir.join("pml.json").exists());
}

#[test]
fn solver_errors_pass_through_unchanged() {
    let dir = TestDir::new("diverged");
    let setup = write_impulse_setup(&dir, "setup_d.json", 4, 4, 1);
    let diverged = SolverError::Diverged { step: 7, index: 3 };
    let err = run_validation(&setup, false, &FailingSolver::new(diverged.clone())).unwrap_err();
    match err {
        HarnessError::Solver(e) => assert_eq!(e, diverged),
        other => panic!("unexpected error: {other}"),
    }
}

// ── comparison ──────────────────────────────────────────────────

#[test]
fn compare_flags_tolerance_and_shape() {
    let dir = TestDir::new("compare");
    let reference = dir.join("ref.json");
    let close = dir.join("close.json");
    let far = dir.join("far.json");
    let other_shape = dir.join("shape.json");

    let base = centre_impulse([4; 3]);
    let mut nudged = base.clone();
    nudged.set(2, 2, 2, 1.001);
    save_output(&reference, &base).unwrap();
    save_output(&close, &nudged).unwrap();
    save_output(&far, &Field3::zeros([4; 3])).unwrap();
    save_output(&other_shape, &Field3::zeros([2, 2, 2])).unwrap();

    let ok = compare_outputs(&reference, &close, 1e-2).unwrap();
    assert!(!ok.bit_identical);
    assert!((ok.relative_l2 - 1e-3).abs() < 1e-12);

    assert!(matches!(
        compare_outputs(&reference, &far, 1e-2),
        Err(HarnessError::ToleranceExceeded { .. })
    ));
    assert!(matches!(
        compare_outputs(&reference, &other_shape, 1e-2),
        Err(HarnessError::Compare(_))
    ));
}
