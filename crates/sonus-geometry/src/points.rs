//! Point sets for placing sources and sensors.

use std::f64::consts::PI;

/// `n` points evenly spaced in angle on a circle.
///
/// Angles are `max_angle * m / n` for `m = 0..n` (end point excluded),
/// offset by `angle`. With `cast_int` each coordinate is truncated toward
/// zero so it can be used as a grid index.
pub fn points_on_circle(
    n: usize,
    radius: f64,
    centre: [f64; 2],
    cast_int: bool,
    angle: f64,
    max_angle: f64,
) -> Vec<[f64; 2]> {
    (0..n)
        .map(|m| {
            let theta = max_angle * m as f64 / n as f64 + angle;
            let p = [
                radius * theta.cos() + centre[0],
                radius * theta.sin() + centre[1],
            ];
            if cast_int {
                [p[0].trunc(), p[1].trunc()]
            } else {
                p
            }
        })
        .collect()
}

/// Roughly uniform points on the unit sphere (golden-angle spiral).
pub fn unit_fibonacci_sphere(samples: usize) -> Vec<[f64; 3]> {
    match samples {
        0 => return Vec::new(),
        1 => return vec![[0.0, 1.0, 0.0]],
        _ => {}
    }
    let golden = PI * (3.0 - 5.0_f64.sqrt());
    (0..samples)
        .map(|i| {
            let y = 1.0 - (i as f64 / (samples - 1) as f64) * 2.0;
            let r = (1.0 - y * y).max(0.0).sqrt();
            let theta = golden * i as f64;
            [theta.cos() * r, y, theta.sin() * r]
        })
        .collect()
}

/// [`unit_fibonacci_sphere`] scaled by `radius` and moved to `centre`.
pub fn fibonacci_sphere(n: usize, radius: f64, centre: [f64; 3], cast_int: bool) -> Vec<[f64; 3]> {
    unit_fibonacci_sphere(n)
        .into_iter()
        .map(|p| {
            let mut q = [0.0; 3];
            for a in 0..3 {
                q[a] = p[a] * radius + centre[a];
                if cast_int {
                    q[a] = q[a].trunc();
                }
            }
            q
        })
        .collect()
}
