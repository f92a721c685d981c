//! Power-law absorption and dispersion for the k-space solver.
//!
//! With `α(ω) = α0 ω^y` the pressure–density relation gains two
//! fractional-Laplacian terms:
//!
//! ```text
//! p = c² ( ρ + τ L_{y-2}{ρ0 ∇·u} − η L_{y-1}{ρ} )
//! τ = −2 α0 c^{y−1}
//! η =  2 α0 c^y tan(π y / 2)
//! ```
//!
//! where `L_s{f} = F⁻¹{ |k|^s F{f} }`, `ρ` is the summed density and `α0`
//! is in Np/((rad/s)^y m). The `τ` term absorbs, the `η` term supplies the
//! matching dispersion.

use std::f64::consts::PI;

use sonus_core::{Attenuation, GridSpec, Medium};

use crate::spectral::{wavenumber_magnitude, Spectral3};

/// Precomputed absorption operators for one medium on one grid.
#[derive(Clone, Debug)]
pub struct PowerLawAbsorption {
    tau: Vec<f64>,
    eta: Vec<f64>,
    nabla1: Vec<f64>,
    nabla2: Vec<f64>,
}

/// `|k|^s`, zero at DC where a negative power would be singular.
fn fractional_power(kmag: &[f64], s: f64) -> Vec<f64> {
    kmag.iter()
        .map(|&k| if k == 0.0 { 0.0 } else { k.powf(s) })
        .collect()
}

impl PowerLawAbsorption {
    /// Operators for `medium` on `grid`, or `None` if the medium is
    /// lossless. The medium must already be validated.
    pub fn new(grid: &GridSpec, medium: &Medium) -> Option<Self> {
        let attenuation: &Attenuation = medium.attenuation.as_ref().filter(|a| !a.is_zero())?;
        let y = attenuation.power;
        let n = grid.cell_count();
        let dispersion = (PI * y / 2.0).tan();
        let (tau, eta): (Vec<f64>, Vec<f64>) = (0..n)
            .map(|i| {
                let alpha0 = attenuation.nepers_at(i);
                let c = medium.sound_speed.value_at(i);
                (
                    -2.0 * alpha0 * c.powf(y - 1.0),
                    2.0 * alpha0 * c.powf(y) * dispersion,
                )
            })
            .unzip();
        let kmag = wavenumber_magnitude(grid);
        Some(Self {
            tau,
            eta,
            nabla1: fractional_power(&kmag, y - 2.0),
            nabla2: fractional_power(&kmag, y - 1.0),
        })
    }

    fn laplacian(fft: &Spectral3, field: &[f64], scale: &[f64]) -> Vec<f64> {
        let mut spectrum = fft.forward(field);
        for (s, k) in spectrum.iter_mut().zip(scale) {
            *s *= *k;
        }
        fft.inverse_real(spectrum)
    }

    /// Pressure from summed density `rho` and `ρ0 ∇·u`.
    pub fn pressure(
        &self,
        fft: &Spectral3,
        c2: &[f64],
        rho: &[f64],
        rho0_div_u: &[f64],
    ) -> Vec<f64> {
        let absorb = Self::laplacian(fft, rho0_div_u, &self.nabla1);
        let disperse = Self::laplacian(fft, rho, &self.nabla2);
        (0..rho.len())
            .map(|i| c2[i] * (rho[i] + self.tau[i] * absorb[i] - self.eta[i] * disperse[i]))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> GridSpec {
        GridSpec::new([16, 1, 1], [1e-4; 3]).unwrap()
    }

    #[test]
    fn lossless_media_need_no_operators() {
        let m = Medium::new(1500.0, 1000.0);
        assert!(PowerLawAbsorption::new(&grid(), &m).is_none());
        let m = m.with_attenuation(Attenuation::new(0.0, 1.5));
        assert!(PowerLawAbsorption::new(&grid(), &m).is_none());
    }

    #[test]
    fn dc_terms_are_zero() {
        let m = Medium::new(1500.0, 1000.0).with_attenuation(Attenuation::new(0.5, 1.5));
        let abs = PowerLawAbsorption::new(&grid(), &m).unwrap();
        assert_eq!(abs.nabla1[0], 0.0);
        assert_eq!(abs.nabla2[0], 0.0);
        assert!(abs.nabla1[1..].iter().all(|v| v.is_finite() && *v > 0.0));
        assert!(abs.tau.iter().all(|&t| t < 0.0));
        // tan(3π/4) < 0.
        assert!(abs.eta.iter().all(|&e| e < 0.0));
    }

    #[test]
    fn uniform_density_is_untouched() {
        let g = grid();
        let m = Medium::new(1500.0, 1000.0).with_attenuation(Attenuation::new(0.5, 1.5));
        let abs = PowerLawAbsorption::new(&g, &m).unwrap();
        let fft = Spectral3::new(&g);
        let c2 = vec![1500.0_f64.powi(2); 16];
        let rho = vec![1e-6; 16];
        let p = abs.pressure(&fft, &c2, &rho, &[0.0; 16]);
        for v in p {
            assert!((v - c2[0] * 1e-6).abs() < 1e-12);
        }
    }
}
