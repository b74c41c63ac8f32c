//! Thermal comfort indices.
//!
//! The Standard Effective Temperature (SET) is computed from the Gagge
//! two-node model (ASHRAE 55 Appendix D): a one-hour transient of the skin
//! and core energy balances followed by a search for the temperature of the
//! standard environment that produces the same skin heat loss.

pub mod inputs;
pub mod two_node;

pub use inputs::{BodyPosition, ComfortInputs};
pub use two_node::{TwoNodeResult, two_node};

use anyhow::Result;

/// Saturation vapour pressure of water in torr at temperature `t` (°C).
pub fn p_sat_torr(t: f64) -> f64 {
    (18.6686 - 4030.183 / (t + 235.0)).exp()
}

/// Standard Effective Temperature (°C) rounded to 0.1 °C.
///
/// - `tdb`: dry bulb air temperature (°C)
/// - `tr`: mean radiant temperature (°C)
/// - `v`: relative air speed (m/s)
/// - `rh`: relative humidity (%)
/// - `met`: metabolic rate (met)
/// - `clo`: clothing insulation (clo)
pub fn set_tmp(tdb: f64, tr: f64, v: f64, rh: f64, met: f64, clo: f64) -> Result<f64> {
    let inputs = ComfortInputs::new(tdb, tr, v, rh, met, clo);
    let result = two_node(&inputs)?;
    Ok((result.set * 10.0).round() / 10.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_p_sat_torr() {
        // ~23.8 torr (3.17 kPa) at 25 °C
        let p = p_sat_torr(25.0);
        assert!((p - 23.8).abs() < 0.2, "p_sat(25) = {p:.3} torr");
        assert!(p_sat_torr(30.0) > p);
    }

    #[test]
    fn test_set_neutral_conditions() {
        let set = set_tmp(25.0, 25.0, 0.1, 50.0, 1.2, 0.5).unwrap();
        assert!((23.0..=25.5).contains(&set), "SET = {set}, expected ~24.3");
        assert_eq!(set, (set * 10.0).round() / 10.0);
    }

    #[test]
    fn test_set_increases_with_air_temperature() {
        let mut prev = f64::NEG_INFINITY;
        for tdb in [10.0, 16.0, 22.0, 28.0, 34.0, 40.0] {
            let set = set_tmp(tdb, 25.0, 0.15, 50.0, 1.2, 0.5).unwrap();
            assert!(set > prev, "SET({tdb}) = {set} not above {prev}");
            prev = set;
        }
    }

    #[test]
    fn test_set_increases_with_radiant_temperature() {
        let cold = set_tmp(22.0, 15.0, 0.15, 50.0, 1.2, 0.5).unwrap();
        let warm = set_tmp(22.0, 35.0, 0.15, 50.0, 1.2, 0.5).unwrap();
        assert!(warm > cold + 2.0, "cold={cold}, warm={warm}");
    }

    #[test]
    fn test_air_speed_cools_warm_environment() {
        let still = set_tmp(30.0, 30.0, 0.1, 50.0, 1.2, 0.5).unwrap();
        let windy = set_tmp(30.0, 30.0, 1.0, 50.0, 1.2, 0.5).unwrap();
        assert!(windy < still, "still={still}, windy={windy}");
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        assert!(set_tmp(25.0, 25.0, 0.1, 120.0, 1.2, 0.5).is_err());
        assert!(set_tmp(25.0, 25.0, -0.1, 50.0, 1.2, 0.5).is_err());
        assert!(set_tmp(f64::NAN, 25.0, 0.1, 50.0, 1.2, 0.5).is_err());
        assert!(set_tmp(25.0, 25.0, 0.1, 50.0, 0.0, 0.5).is_err());
    }
}
