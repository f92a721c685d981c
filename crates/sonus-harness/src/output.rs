//! Output naming and the output file format.
//!
//! The output file sits next to its setup file. Its name is the setup
//! file's name with one leading `setup_` removed, and its content is a JSON
//! object with a single key, `p_final`, holding the final pressure field.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use sonus_core::Field3;
use tracing::debug;

use crate::error::{HarnessError, LoadError, WriteError};

/// Key of the final pressure in the output file.
pub const P_FINAL_KEY: &str = "p_final";

const SETUP_PREFIX: &str = "setup_";

/// The output file name for a setup file name.
///
/// Strips one leading `setup_`; any other name is returned unchanged.
///
/// ```
/// use sonus_harness::derive_output_name;
/// assert_eq!(derive_output_name("setup_case1.mat"), "case1.mat");
/// assert_eq!(derive_output_name("other.mat"), "other.mat");
/// ```
pub fn derive_output_name(file_name: &str) -> String {
    file_name
        .strip_prefix(SETUP_PREFIX)
        .unwrap_or(file_name)
        .to_string()
}

/// The output path for a setup path: same directory, derived name.
pub fn output_path(setup_path: &Path) -> PathBuf {
    match setup_path.file_name() {
        Some(name) => setup_path.with_file_name(derive_output_name(&name.to_string_lossy())),
        None => setup_path.to_path_buf(),
    }
}

/// Write `p_final` to `path` as the single entry of the output map.
///
/// # Errors
///
/// Returns [`HarnessError::Write`] if the file cannot be created or written.
pub fn save_output(path: &Path, p_final: &Field3) -> Result<(), HarnessError> {
    let mut out: IndexMap<&str, &Field3> = IndexMap::with_capacity(1);
    out.insert(P_FINAL_KEY, p_final);
    write_json(path, &out).map_err(|e| HarnessError::write(path, e))?;
    debug!(path = %path.display(), shape = ?p_final.shape(), "wrote output");
    Ok(())
}

fn write_json(path: &Path, value: &impl serde::Serialize) -> Result<(), WriteError> {
    let mut w = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut w, value)?;
    w.flush()?;
    Ok(())
}

/// Read the final pressure back from an output file.
///
/// # Errors
///
/// Returns [`HarnessError::Load`] if the file is unreadable, malformed, or
/// has no `p_final` entry.
pub fn load_output(path: &Path) -> Result<Field3, HarnessError> {
    let text = fs::read_to_string(path).map_err(|e| HarnessError::load(path, e))?;
    let mut map: IndexMap<String, Field3> =
        serde_json::from_str(&text).map_err(|e| HarnessError::load(path, e))?;
    map.shift_remove(P_FINAL_KEY).ok_or_else(|| {
        HarnessError::load(path, LoadError::MissingKey { key: P_FINAL_KEY })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn strips_setup_prefix_once() {
        assert_eq!(derive_output_name("setup_case1.mat"), "case1.mat");
        assert_eq!(derive_output_name("setup_setup_x.json"), "setup_x.json");
    }

    #[test]
    fn other_names_pass_through() {
        assert_eq!(derive_output_name("other.mat"), "other.mat");
        assert_eq!(derive_output_name("my_setup_case.json"), "my_setup_case.json");
        assert_eq!(derive_output_name("setup"), "setup");
    }

    #[test]
    fn output_path_keeps_directory() {
        let p = output_path(Path::new("/data/runs/setup_impulse.json"));
        assert_eq!(p, PathBuf::from("/data/runs/impulse.json"));
        let p = output_path(Path::new("relative.json"));
        assert_eq!(p, PathBuf::from("relative.json"));
    }

    #[test]
    fn write_to_missing_directory_is_write_error() {
        let err = save_output(
            Path::new("/nonexistent-dir/sonus/out.json"),
            &Field3::zeros([1, 1, 1]),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            HarnessError::Write {
                source: WriteError::Io(_),
                ..
            }
        ));
    }

    proptest! {
        #[test]
        fn prefixed_names_lose_exactly_the_prefix(stem in "[a-z0-9_]{1,12}\\.json") {
            let name = format!("setup_{stem}");
            prop_assert_eq!(derive_output_name(&name), stem);
        }

        #[test]
        fn unprefixed_names_are_unchanged(name in "[a-rt-z0-9][a-z0-9_]{0,12}\\.json") {
            prop_assert_eq!(derive_output_name(&name), name);
        }
    }
}
