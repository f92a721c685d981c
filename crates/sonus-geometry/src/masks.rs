//! Binary masks for disc and ball regions.

use sonus_core::Field3;

/// A 2-D mask that is 1 strictly inside the circle and 0 elsewhere.
///
/// Returned as a `[n0, n1, 1]` field so it plugs straight into a 2-D grid.
pub fn circ_mask(n: [usize; 2], radius: f64, centre: [f64; 2]) -> Field3 {
    let mut mask = Field3::zeros([n[0], n[1], 1]);
    for i in 0..n[0] {
        for j in 0..n[1] {
            let dx = i as f64 - centre[0];
            let dy = j as f64 - centre[1];
            if (dx * dx + dy * dy).sqrt() < radius {
                mask.set(i, j, 0, 1.0);
            }
        }
    }
    mask
}

/// A 3-D mask that is 1 strictly inside the sphere and 0 elsewhere.
pub fn sphere_mask(n: [usize; 3], radius: f64, centre: [f64; 3]) -> Field3 {
    let mut mask = Field3::zeros(n);
    for i in 0..n[0] {
        for j in 0..n[1] {
            for k in 0..n[2] {
                let dx = i as f64 - centre[0];
                let dy = j as f64 - centre[1];
                let dz = k as f64 - centre[2];
                if (dx * dx + dy * dy + dz * dz).sqrt() < radius {
                    mask.set(i, j, k, 1.0);
                }
            }
        }
    }
    mask
}
