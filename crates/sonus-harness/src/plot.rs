//! Diagnostic PNG plots of a validation run.
//!
//! Plots are written next to the output file and never feed back into the
//! numbers. Only filled rectangles and polylines are drawn, so no font
//! support is needed.

use std::path::{Path, PathBuf};

use plotters::prelude::*;
use sonus_core::Field3;
use tracing::debug;

use crate::error::{HarnessError, WriteError};

const SLICE_TARGET_PX: usize = 512;
const TRACE_SIZE: (u32, u32) = (640, 360);
const TRACE_MARGIN: i32 = 24;

/// `<dir>/<stem>_<suffix>.png` for an output file.
pub fn plot_path(output: &Path, suffix: &str) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    output.with_file_name(format!("{stem}_{suffix}.png"))
}

/// Blue–white–red colour for `v`, symmetric around zero.
///
/// `-scale` maps to blue, `0` to white, `+scale` to red. A zero or
/// non-finite scale gives white everywhere.
pub fn diverging_colour(v: f64, scale: f64) -> RGBColor {
    if !(scale.is_finite() && scale > 0.0) || !v.is_finite() {
        return RGBColor(255, 255, 255);
    }
    let x = ((v / scale + 1.0) / 2.0).clamp(0.0, 1.0);
    let r = (255.0 * (2.0 * x).min(1.0)) as u8;
    let b = (255.0 * (2.0 - 2.0 * x).min(1.0)) as u8;
    let g = (255.0 * (1.0 - 2.0 * (x - 0.5).abs())) as u8;
    RGBColor(r, g, b)
}

fn plot_err(e: impl std::fmt::Display) -> WriteError {
    WriteError::Plot {
        detail: e.to_string(),
    }
}

/// Heat map of the central z-slice of `p`.
///
/// x runs left to right and y bottom to top, one square block per cell.
pub fn plot_pressure_slice(path: &Path, p: &Field3) -> Result<(), WriteError> {
    let (rows, cols, vals) = p.central_slice(2);
    let px = (SLICE_TARGET_PX / rows.max(cols)).max(1);
    let (w, h) = ((rows * px) as u32, (cols * px) as u32);
    let scale = p.max_abs();

    let root = BitMapBackend::new(path, (w, h)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;
    for i in 0..rows {
        for j in 0..cols {
            let colour = diverging_colour(vals[i * cols + j], scale);
            let x0 = (i * px) as i32;
            let y0 = ((cols - 1 - j) * px) as i32;
            let cell = Rectangle::new(
                [(x0, y0), (x0 + px as i32, y0 + px as i32)],
                colour.filled(),
            );
            root.draw(&cell).map_err(plot_err)?;
        }
    }
    root.present().map_err(plot_err)?;
    Ok(())
}

/// Line trace of the per-step maximum absolute pressure.
pub fn plot_max_pressure(path: &Path, trace: &[f64]) -> Result<(), WriteError> {
    let (w, h) = TRACE_SIZE;
    let (w, h) = (w as i32, h as i32);
    let m = TRACE_MARGIN;
    let vmax = trace
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(0.0_f64, f64::max);
    let span = trace.len().saturating_sub(1).max(1) as f64;

    let root = BitMapBackend::new(path, TRACE_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;
    let axes = PathElement::new(vec![(m, m), (m, h - m), (w - m, h - m)], BLACK);
    root.draw(&axes).map_err(plot_err)?;

    let points: Vec<(i32, i32)> = trace
        .iter()
        .enumerate()
        .map(|(s, &v)| {
            let frac = if vmax > 0.0 && v.is_finite() { v / vmax } else { 0.0 };
            let x = m + (s as f64 / span * f64::from(w - 2 * m)) as i32;
            let y = h - m - (frac * f64::from(h - 2 * m)) as i32;
            (x, y)
        })
        .collect();
    if points.len() > 1 {
        root.draw(&PathElement::new(points, RED.stroke_width(2)))
            .map_err(plot_err)?;
    }
    root.present().map_err(plot_err)?;
    Ok(())
}

/// Write every diagnostic plot for a run whose output is at `output`.
///
/// Always plots the final pressure slice; the max-pressure trace is added
/// when the solver collected one. Returns the paths written.
///
/// # Errors
///
/// Returns [`HarnessError::Write`] naming the plot that failed.
pub fn write_plots(
    output: &Path,
    p_final: &Field3,
    trace: Option<&[f64]>,
) -> Result<Vec<PathBuf>, HarnessError> {
    let mut written = Vec::with_capacity(2);

    let slice = plot_path(output, "p_final");
    plot_pressure_slice(&slice, p_final).map_err(|e| HarnessError::write(&slice, e))?;
    debug!(path = %slice.display(), "wrote pressure slice plot");
    written.push(slice);

    if let Some(trace) = trace {
        let path = plot_path(output, "max_pressure");
        plot_max_pressure(&path, trace).map_err(|e| HarnessError::write(&path, e))?;
        debug!(path = %path.display(), "wrote max pressure trace");
        written.push(path);
    }
    Ok(written)
}
