//! Field comparison between a reference output and a candidate.
//!
//! Bit-exact check first, then pointwise and L2 error measures. The same
//! report answers both "did this run reproduce?" and "does this solver
//! agree with the reference to within tolerance?".

use std::path::Path;

use sonus_core::{Field3, FieldError};
use tracing::info;

use crate::error::HarnessError;
use crate::output::load_output;

/// Differences between two fields of the same shape.
#[derive(Clone, Debug, PartialEq)]
pub struct ComparisonReport {
    /// Number of cells compared.
    pub cells: usize,
    /// Every value has the same bit pattern in both fields.
    pub bit_identical: bool,
    /// Largest absolute pointwise difference. Infinite if any difference is
    /// not finite.
    pub max_abs_error: f64,
    /// Flat index of the largest difference.
    pub max_error_index: usize,
    /// `‖candidate − reference‖₂ / ‖reference‖₂`. Zero when both fields are
    /// zero; infinite when only the reference is.
    pub relative_l2: f64,
}

impl ComparisonReport {
    /// Whether the relative L2 error is at most `tolerance`.
    pub fn within(&self, tolerance: f64) -> bool {
        self.relative_l2 <= tolerance
    }
}

/// Compare `candidate` against `reference`.
///
/// # Errors
///
/// Returns [`FieldError::ShapeMismatch`] if the shapes differ.
pub fn compare_fields(reference: &Field3, candidate: &Field3) -> Result<ComparisonReport, FieldError> {
    candidate.check_shape(reference.shape())?;

    let mut bit_identical = true;
    let mut max_abs_error = 0.0_f64;
    let mut max_error_index = 0;
    let mut diff_sq = 0.0;
    let mut ref_sq = 0.0;
    for (i, (&r, &c)) in reference.as_slice().iter().zip(candidate.as_slice()).enumerate() {
        if r.to_bits() != c.to_bits() {
            bit_identical = false;
        }
        let d = c - r;
        let ad = if d.is_finite() { d.abs() } else { f64::INFINITY };
        if ad > max_abs_error {
            max_abs_error = ad;
            max_error_index = i;
        }
        diff_sq += d * d;
        ref_sq += r * r;
    }

    let relative_l2 = if bit_identical || diff_sq == 0.0 {
        0.0
    } else if ref_sq == 0.0 || !diff_sq.is_finite() {
        f64::INFINITY
    } else {
        (diff_sq / ref_sq).sqrt()
    };

    Ok(ComparisonReport {
        cells: reference.len(),
        bit_identical,
        max_abs_error,
        max_error_index,
        relative_l2,
    })
}

/// Load two output files and check the candidate against the reference.
///
/// # Errors
///
/// [`HarnessError::Load`] if either file cannot be read,
/// [`HarnessError::Compare`] on a shape mismatch, and
/// [`HarnessError::ToleranceExceeded`] if the relative L2 error is above
/// `tolerance`.
pub fn compare_outputs(
    reference: &Path,
    candidate: &Path,
    tolerance: f64,
) -> Result<ComparisonReport, HarnessError> {
    let r = load_output(reference)?;
    let c = load_output(candidate)?;
    let report = compare_fields(&r, &c).map_err(HarnessError::Compare)?;
    info!(
        reference = %reference.display(),
        candidate = %candidate.display(),
        bit_identical = report.bit_identical,
        max_abs_error = report.max_abs_error,
        relative_l2 = report.relative_l2,
        "compared outputs"
    );
    if !report.within(tolerance) {
        return Err(HarnessError::ToleranceExceeded {
            relative_l2: report.relative_l2,
            tolerance,
            max_abs_error: report.max_abs_error,
        });
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(data: &[f64]) -> Field3 {
        Field3::from_vec([data.len(), 1, 1], data.to_vec()).unwrap()
    }

    #[test]
    fn identical_fields() {
        let a = field(&[1.0, -2.0, 3.0]);
        let r = compare_fields(&a, &a.clone()).unwrap();
        assert!(r.bit_identical);
        assert_eq!(r.max_abs_error, 0.0);
        assert_eq!(r.relative_l2, 0.0);
        assert!(r.within(0.0));
    }

    #[test]
    fn locates_largest_difference() {
        let a = field(&[3.0, 0.0, 4.0]);
        let b = field(&[3.0, 0.5, 4.0 - 1.0]);
        let r = compare_fields(&a, &b).unwrap();
        assert!(!r.bit_identical);
        assert_eq!(r.max_error_index, 2);
        assert_eq!(r.max_abs_error, 1.0);
        // sqrt(0.25 + 1) / 5
        assert!((r.relative_l2 - 1.25_f64.sqrt() / 5.0).abs() < 1e-15);
        assert!(!r.within(0.1));
        assert!(r.within(0.3));
    }

    #[test]
    fn signed_zero_is_not_bit_identical() {
        let r = compare_fields(&field(&[0.0]), &field(&[-0.0])).unwrap();
        assert!(!r.bit_identical);
        assert_eq!(r.relative_l2, 0.0);
    }

    #[test]
    fn zero_reference_with_difference_is_infinite() {
        let r = compare_fields(&field(&[0.0, 0.0]), &field(&[0.0, 1e-9])).unwrap();
        assert_eq!(r.relative_l2, f64::INFINITY);
    }

    #[test]
    fn nan_candidate_is_infinitely_wrong() {
        let r = compare_fields(&field(&[1.0, 1.0]), &field(&[1.0, f64::NAN])).unwrap();
        assert_eq!(r.max_abs_error, f64::INFINITY);
        assert_eq!(r.max_error_index, 1);
        assert!(!r.within(1.0));
    }

    #[test]
    fn shape_mismatch_is_an_error() {
        let a = Field3::zeros([2, 2, 1]);
        let b = Field3::zeros([4, 1, 1]);
        assert!(matches!(
            compare_fields(&a, &b),
            Err(FieldError::ShapeMismatch { .. })
        ));
    }
}
