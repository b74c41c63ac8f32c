use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Posture of the occupant. Sets the fraction of the body surface that
/// exchanges radiation with the surroundings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyPosition {
    #[default]
    Standing,
    Sitting,
}

impl BodyPosition {
    /// Effective radiation area over DuBois area.
    pub fn radiation_area_ratio(self) -> f64 {
        match self {
            Self::Standing => 0.73,
            Self::Sitting => 0.70,
        }
    }
}

/// Environmental and personal parameters of the two-node model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComfortInputs {
    /// Dry bulb air temperature in °C.
    pub tdb: f64,
    /// Mean radiant temperature in °C.
    pub tr: f64,
    /// Relative air speed in m/s.
    pub v: f64,
    /// Relative humidity in %.
    pub rh: f64,
    /// Metabolic rate in met.
    pub met: f64,
    /// Clothing insulation in clo.
    pub clo: f64,
    /// External work in met.
    pub wme: f64,
    /// DuBois body surface area in m².
    pub body_surface_area: f64,
    /// Atmospheric pressure in Pa.
    pub p_atmospheric: f64,
    pub body_position: BodyPosition,
}

impl ComfortInputs {
    pub fn new(tdb: f64, tr: f64, v: f64, rh: f64, met: f64, clo: f64) -> Self {
        Self {
            tdb,
            tr,
            v,
            rh,
            met,
            clo,
            wme: 0.0,
            body_surface_area: 1.8258,
            p_atmospheric: 101_325.0,
            body_position: BodyPosition::Standing,
        }
    }

    /// Partial vapour pressure of the air in torr.
    pub fn vapor_pressure_torr(&self) -> f64 {
        self.rh * super::p_sat_torr(self.tdb) / 100.0
    }

    pub fn validate(&self) -> Result<()> {
        let values = [
            ("tdb", self.tdb),
            ("tr", self.tr),
            ("v", self.v),
            ("rh", self.rh),
            ("met", self.met),
            ("clo", self.clo),
            ("wme", self.wme),
            ("body_surface_area", self.body_surface_area),
            ("p_atmospheric", self.p_atmospheric),
        ];
        for (name, value) in values {
            anyhow::ensure!(value.is_finite(), "{name} must be finite, got {value}");
        }
        anyhow::ensure!(
            (0.0..=100.0).contains(&self.rh),
            "Relative humidity must be within 0..=100 %, got {}",
            self.rh
        );
        anyhow::ensure!(self.v >= 0.0, "Air speed must be >= 0, got {}", self.v);
        anyhow::ensure!(self.met > 0.0, "Metabolic rate must be > 0, got {}", self.met);
        anyhow::ensure!(self.clo >= 0.0, "Clothing must be >= 0, got {}", self.clo);
        anyhow::ensure!(
            self.body_surface_area > 0.0 && self.p_atmospheric > 0.0,
            "Body surface area and pressure must be positive"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let inputs = ComfortInputs::new(25.0, 25.0, 0.1, 50.0, 1.2, 0.5);
        assert_eq!(inputs.wme, 0.0);
        assert_eq!(inputs.body_position, BodyPosition::Standing);
        assert!(inputs.validate().is_ok());
    }

    #[test]
    fn test_vapor_pressure() {
        let dry = ComfortInputs::new(25.0, 25.0, 0.1, 0.0, 1.2, 0.5);
        let wet = ComfortInputs::new(25.0, 25.0, 0.1, 100.0, 1.2, 0.5);
        assert_eq!(dry.vapor_pressure_torr(), 0.0);
        assert!((wet.vapor_pressure_torr() - super::super::p_sat_torr(25.0)).abs() < 1e-12);
    }

    #[test]
    fn test_radiation_area_ratio() {
        assert!(
            BodyPosition::Sitting.radiation_area_ratio()
                < BodyPosition::Standing.radiation_area_ratio()
        );
    }
}
