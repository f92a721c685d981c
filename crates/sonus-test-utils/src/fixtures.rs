//! Reusable fixtures for solver and harness tests.
//!
//! - [`centre_impulse`] and [`random_field`] build initial pressures.
//! - [`impulse_setup`] builds a complete setup document for the harness.
//! - [`TestDir`] is a scratch directory removed on drop.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde_json::{json, Value};
use sonus_core::Field3;

/// Grid spacing used by the fixture setups, in metres.
pub const FIXTURE_DX: f64 = 1e-4;
/// Sound speed used by the fixture setups, in m/s.
pub const FIXTURE_SOUND_SPEED: f64 = 1500.0;
/// Density used by the fixture setups, in kg/m³.
pub const FIXTURE_DENSITY: f64 = 1000.0;
/// A stable step for the fixture grid (CFL 0.3).
pub const FIXTURE_DT: f64 = 2e-8;

/// A unit impulse at the centre voxel (`n / 2` on every axis).
pub fn centre_impulse(shape: [usize; 3]) -> Field3 {
    let mut f = Field3::zeros(shape);
    f.set(shape[0] / 2, shape[1] / 2, shape[2] / 2, 1.0);
    f
}

/// Uniform values in `[-1, 1)` from a seeded generator.
pub fn random_field(shape: [usize; 3], seed: u64) -> Field3 {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut f = Field3::zeros(shape);
    for v in f.as_mut_slice() {
        *v = rng.random::<f64>() * 2.0 - 1.0;
    }
    f
}

/// A setup document for a homogeneous medium with a centre impulse.
///
/// Uses the harness's key names; smoothing is off so the impulse reaches
/// the solver unchanged.
pub fn impulse_setup(shape: [usize; 3], nt: usize, pml: usize) -> Value {
    let dx = [FIXTURE_DX; 3];
    json!({
        "Nx": shape,
        "dx": dx,
        "Nt": nt,
        "dt": FIXTURE_DT,
        "sound_speed": FIXTURE_SOUND_SPEED,
        "density": FIXTURE_DENSITY,
        "p0": centre_impulse(shape),
        "PMLSize": pml,
        "smooth_initial": false,
    })
}

/// Write `value` as pretty JSON at `path`.
pub fn write_json(path: &Path, value: &Value) -> std::io::Result<()> {
    let text = serde_json::to_string_pretty(value).map_err(std::io::Error::other)?;
    fs::write(path, text)
}

static NEXT_DIR: AtomicUsize = AtomicUsize::new(0);

/// A fresh directory under the system temp dir, removed on drop.
pub struct TestDir {
    path: PathBuf,
}

impl TestDir {
    /// Create a unique directory whose name contains `label`.
    pub fn new(label: &str) -> Self {
        let n = NEXT_DIR.fetch_add(1, Ordering::Relaxed);
        let path = std::env::temp_dir().join(format!(
            "sonus-test-{label}-{}-{n}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&path);
        if let Err(e) = fs::create_dir_all(&path) {
            panic!("cannot create test dir {}: {e}", path.display());
        }
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn join(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }
}

impl Drop for TestDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}
