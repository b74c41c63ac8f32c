use anyhow::Result;

use super::{N_FACES, SIGMA, ViewFactorMatrix};
use crate::sim::linalg::{NewtonOptions, NewtonReport, newton_solve};

/// Allowed deviation of a view factor row sum from 1.
const ROW_SUM_TOLERANCE: f64 = 1e-3;

/// Six grey, diffuse, isothermal faces exchanging radiation.
#[derive(Debug, Clone, PartialEq)]
pub struct CubeEnclosure {
    pub view_factors: ViewFactorMatrix,
    pub emissivity: [f64; N_FACES],
    /// Face temperatures in K.
    pub temperature_k: [f64; N_FACES],
}

impl CubeEnclosure {
    pub fn new(
        view_factors: ViewFactorMatrix,
        emissivity: [f64; N_FACES],
        temperature_k: [f64; N_FACES],
    ) -> Result<Self> {
        for (i, &eps) in emissivity.iter().enumerate() {
            anyhow::ensure!(
                eps > 0.0 && eps <= 1.0,
                "Emissivity of face {i} must be in (0, 1], got {eps}"
            );
        }
        for (i, &t) in temperature_k.iter().enumerate() {
            anyhow::ensure!(
                t.is_finite() && t > 0.0,
                "Temperature of face {i} must be positive in K, got {t}"
            );
        }
        for (i, row) in view_factors.iter().enumerate() {
            anyhow::ensure!(
                row.iter().all(|f| f.is_finite() && *f >= 0.0),
                "View factors of face {i} must be finite and non-negative"
            );
            let sum: f64 = row.iter().sum();
            anyhow::ensure!(
                (sum - 1.0).abs() <= ROW_SUM_TOLERANCE,
                "View factors of face {i} must sum to 1, got {sum}"
            );
        }
        Ok(Self {
            view_factors,
            emissivity,
            temperature_k,
        })
    }

    /// Emitted flux `eps * sigma * T^4` of each face [W/m²].
    pub fn emissive_power(&self) -> [f64; N_FACES] {
        std::array::from_fn(|i| self.emissivity[i] * SIGMA * self.temperature_k[i].powi(4))
    }

    /// Radiation arriving at each face, `E = F J` [W/m²].
    pub fn incident(&self, radiosity: &[f64]) -> [f64; N_FACES] {
        std::array::from_fn(|i| {
            self.view_factors[i]
                .iter()
                .zip(radiosity)
                .map(|(f, j)| f * j)
                .sum()
        })
    }

    /// `-J + eps sigma T^4 + (1 - eps) F J`, zero at the solution.
    pub fn residual(&self, radiosity: &[f64]) -> Vec<f64> {
        let emitted = self.emissive_power();
        let incident = self.incident(radiosity);
        (0..N_FACES)
            .map(|i| -radiosity[i] + emitted[i] + (1.0 - self.emissivity[i]) * incident[i])
            .collect()
    }

    /// Solves the radiosity balance starting from `initial`.
    pub fn solve(&self, initial: &[f64; N_FACES], options: &NewtonOptions) -> Result<NewtonReport> {
        newton_solve(|j| self.residual(j), initial, options)
    }
}

/// Temperature of a black enclosure emitting `flux` [W/m²], in K.
pub fn radiant_temperature_k(flux: f64) -> f64 {
    (flux / SIGMA).powf(0.25)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::radiosity::cube_view_factors;

    #[test]
    fn test_isothermal_enclosure_is_black() {
        let f = cube_view_factors(0.2, 0.2);
        let t = 300.0;
        let enclosure = CubeEnclosure::new(f, [0.7; N_FACES], [t; N_FACES]).unwrap();
        let report = enclosure
            .solve(&[100.0; N_FACES], &NewtonOptions::default())
            .unwrap();
        let black = SIGMA * t.powi(4);
        for j in &report.x {
            assert!((j - black).abs() < 1e-6, "J = {j}, expected {black}");
        }
        let e = enclosure.incident(&report.x);
        for ei in e {
            assert!((radiant_temperature_k(ei) - t).abs() < 1e-6);
        }
    }

    #[test]
    fn test_black_faces_radiosity_is_emission() {
        let f = cube_view_factors(0.2, 0.2);
        let temps = [250.0, 260.0, 270.0, 280.0, 290.0, 300.0];
        let enclosure = CubeEnclosure::new(f, [1.0; N_FACES], temps).unwrap();
        let report = enclosure
            .solve(&[0.0; N_FACES], &NewtonOptions::default())
            .unwrap();
        for (j, t) in report.x.iter().zip(temps) {
            assert!((j - SIGMA * t.powi(4)).abs() < 1e-6);
        }
    }

    #[test]
    fn test_invalid_enclosure() {
        let f = cube_view_factors(0.2, 0.2);
        assert!(CubeEnclosure::new(f, [0.0; N_FACES], [300.0; N_FACES]).is_err());
        assert!(CubeEnclosure::new(f, [0.9; N_FACES], [-1.0; N_FACES]).is_err());
    }

    #[test]
    fn test_view_factor_rows_must_sum_to_one() {
        let zeros = [[0.0; N_FACES]; N_FACES];
        assert!(CubeEnclosure::new(zeros, [0.9; N_FACES], [300.0; N_FACES]).is_err());
        let short = cube_view_factors(0.19, 0.19);
        assert!(CubeEnclosure::new(short, [0.9; N_FACES], [300.0; N_FACES]).is_err());
    }
}
