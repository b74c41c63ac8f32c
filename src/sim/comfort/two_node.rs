use anyhow::Result;

use super::inputs::ComfortInputs;
use super::p_sat_torr;

/// Stefan–Boltzmann constant as used by the two-node model [W/(m² K⁴)].
const SBC: f64 = 5.6697e-8;
/// W/m² per met.
const MET_FACTOR: f64 = 58.2;
/// Body mass [kg].
const BODY_WEIGHT: f64 = 70.0;
/// Driving coefficients for regulatory sweating, vasodilation, vasoconstriction.
const C_SW: f64 = 170.0;
const C_DIL: f64 = 120.0;
const C_STR: f64 = 0.5;
const TEMP_SKIN_NEUTRAL: f64 = 33.7;
const TEMP_CORE_NEUTRAL: f64 = 36.8;
const SKIN_BLOOD_FLOW_NEUTRAL: f64 = 6.3;
const MAX_SKIN_BLOOD_FLOW: f64 = 90.0;
const MAX_SWEATING: f64 = 500.0;
/// Simulated exposure in one-minute steps.
const EXPOSURE_MINUTES: usize = 60;
const CLOTHING_ITERATION_LIMIT: usize = 150;
const SECANT_ITERATION_LIMIT: usize = 200;

/// Body state at the end of the exposure and the derived indices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TwoNodeResult {
    /// Standard Effective Temperature [°C].
    pub set: f64,
    /// Effective Temperature [°C].
    pub et: f64,
    /// Skin temperature [°C].
    pub t_skin: f64,
    /// Core temperature [°C].
    pub t_core: f64,
    /// Mean body temperature [°C].
    pub t_body: f64,
    /// Skin blood flow [L/(h m²)].
    pub skin_blood_flow: f64,
    /// Skin wettedness [-].
    pub w: f64,
    /// Critical skin wettedness [-].
    pub w_max: f64,
    /// Total evaporative heat loss from the skin [W/m²].
    pub e_skin: f64,
    /// Heat lost by vaporization of regulatory sweat [W/m²].
    pub e_rsw: f64,
    /// Vapour diffusion through the skin [W/m²].
    pub e_diff: f64,
    /// Maximum evaporative capacity [W/m²].
    pub e_max: f64,
    /// Sensible heat loss from the skin [W/m²].
    pub q_sensible: f64,
    /// Total heat loss from the skin [W/m²].
    pub q_skin: f64,
    /// Latent respiratory heat loss [W/m²].
    pub q_res: f64,
    /// Gagge's predicted mean vote.
    pub pmv_gagge: f64,
    /// Thermal discomfort.
    pub disc: f64,
    /// Predicted thermal sensation.
    pub t_sens: f64,
}

/// Runs the Gagge two-node model for a one-hour exposure.
pub fn two_node(inputs: &ComfortInputs) -> Result<TwoNodeResult> {
    inputs.validate()?;

    let tdb = inputs.tdb;
    let tr = inputs.tr;
    let met = inputs.met;
    let clo = inputs.clo;
    let wme = inputs.wme;
    let vapor_pressure = inputs.vapor_pressure_torr();
    let air_speed = inputs.v.max(0.1);
    let area_ratio = inputs.body_position.radiation_area_ratio();

    let mut alfa = 0.1;
    let temp_body_neutral = alfa * TEMP_SKIN_NEUTRAL + (1.0 - alfa) * TEMP_CORE_NEUTRAL;

    let mut t_skin = TEMP_SKIN_NEUTRAL;
    let mut t_core = TEMP_CORE_NEUTRAL;
    let mut m_bl = SKIN_BLOOD_FLOW_NEUTRAL;

    let mut e_skin = 0.1 * met;
    let mut q_sensible = 0.0;
    let mut w = 0.0;
    let mut e_rsw = 0.0;
    let mut e_diff = 0.0;
    let mut e_max = 0.0;
    let mut e_req = 0.0;
    let mut r_ea = 0.0;
    let mut r_ecl = 0.0;

    let pressure_atm = inputs.p_atmospheric / 101_325.0;

    let r_clo = 0.155 * clo;
    let f_a_cl = 1.0 + 0.15 * clo;
    let lr = 2.2 / pressure_atm;
    let rm = (met - wme) * MET_FACTOR;
    let mut m = met * MET_FACTOR;

    let e_comfort = (0.42 * (rm - MET_FACTOR)).max(0.0);

    let i_cl = if clo > 0.0 { 0.45 } else { 1.0 };
    let w_max = if clo > 0.0 {
        0.59 * air_speed.powf(-0.08)
    } else {
        0.38 * air_speed.powf(-0.29)
    };

    let mut h_cc = 3.0 * pressure_atm.powf(0.53);
    let h_fc = 8.600001 * (air_speed * pressure_atm).powf(0.53);
    h_cc = h_cc.max(h_fc);
    if met > 0.85 {
        let h_c_met = 5.66 * (met - 0.85).powf(0.39);
        h_cc = h_cc.max(h_c_met);
    }

    let mut h_r = 4.7;
    let mut h_t = h_r + h_cc;
    let mut r_a = 1.0 / (f_a_cl * h_t);
    let mut t_op = (h_r * tr + h_cc * tdb) / h_t;
    let mut t_body = alfa * t_skin + (1.0 - alfa) * t_core;

    let q_res = 0.0023 * m * (44.0 - vapor_pressure);
    let c_res = 0.0014 * m * (34.0 - tdb);

    for _ in 0..EXPOSURE_MINUTES {
        // Clothing surface temperature
        let mut t_cl = (r_a * t_skin + r_clo * t_op) / (r_a + r_clo);
        let mut converged = false;
        for _ in 0..=CLOTHING_ITERATION_LIMIT {
            // 0.95: clothing emissivity
            h_r = 4.0 * 0.95 * SBC * ((t_cl + tr) / 2.0 + 273.15).powi(3) * area_ratio;
            h_t = h_r + h_cc;
            r_a = 1.0 / (f_a_cl * h_t);
            t_op = (h_r * tr + h_cc * tdb) / h_t;
            let t_cl_new = (r_a * t_skin + r_clo * t_op) / (r_a + r_clo);
            let delta = (t_cl_new - t_cl).abs();
            t_cl = t_cl_new;
            if delta <= 0.01 {
                converged = true;
                break;
            }
        }
        if !converged {
            anyhow::bail!("Clothing temperature iteration did not converge");
        }

        q_sensible = (t_skin - t_op) / (r_a + r_clo);
        // 5.28: average tissue conductance, 1.163: blood heat capacity [Wh/(L K)]
        let hf_cs = (t_core - t_skin) * (5.28 + 1.163 * m_bl);
        let s_core = m - hf_cs - q_res - c_res - wme;
        let s_skin = hf_cs - q_sensible - e_skin;
        let tc_sk = 0.97 * alfa * BODY_WEIGHT;
        let tc_cr = 0.97 * (1.0 - alfa) * BODY_WEIGHT;
        let d_t_sk = s_skin * inputs.body_surface_area / (tc_sk * 60.0);
        let d_t_cr = s_core * inputs.body_surface_area / (tc_cr * 60.0);
        t_skin += d_t_sk;
        t_core += d_t_cr;
        t_body = alfa * t_skin + (1.0 - alfa) * t_core;

        // Thermoregulatory control signals
        let sk_sig = t_skin - TEMP_SKIN_NEUTRAL;
        let warm_sk = sk_sig.max(0.0);
        let cold_sk = (-sk_sig).max(0.0);
        let c_reg_sig = t_core - TEMP_CORE_NEUTRAL;
        let c_warm = c_reg_sig.max(0.0);
        let c_cold = (-c_reg_sig).max(0.0);
        let warm_b = (t_body - temp_body_neutral).max(0.0);

        m_bl = ((SKIN_BLOOD_FLOW_NEUTRAL + C_DIL * c_warm) / (1.0 + C_STR * cold_sk))
            .clamp(0.5, MAX_SKIN_BLOOD_FLOW);

        let m_rsw = (C_SW * warm_b * (warm_sk / 10.7).exp()).min(MAX_SWEATING);
        e_rsw = 0.68 * m_rsw;
        r_ea = 1.0 / (lr * f_a_cl * h_cc);
        r_ecl = r_clo / (lr * i_cl);
        e_req = rm - q_res - c_res - q_sensible;
        e_max = (p_sat_torr(t_skin) - vapor_pressure) / (r_ea + r_ecl);
        let mut p_rsw = e_rsw / e_max;
        w = 0.06 + 0.94 * p_rsw;
        e_diff = w * e_max - e_rsw;
        if w > w_max {
            w = w_max;
            p_rsw = w_max / 0.94;
            e_rsw = p_rsw * e_max;
            e_diff = 0.06 * (1.0 - p_rsw) * e_max;
        }
        if e_max < 0.0 {
            e_diff = 0.0;
            e_rsw = 0.0;
            w = w_max;
        }
        e_skin = e_rsw + e_diff;

        let met_shivering = 19.4 * cold_sk * c_cold;
        m = rm + met_shivering;
        alfa = 0.0417737 + 0.7451833 / (m_bl + 0.585417);
    }

    let q_skin = q_sensible + e_skin;
    let p_s_sk = p_sat_torr(t_skin);

    // Standard environment: still air, 50 % RH, clothing standardized on activity.
    let h_r_s = h_r;
    let mut h_c_s = 3.0 * pressure_atm.powf(0.53);
    if met > 0.85 {
        h_c_s = h_c_s.max(5.66 * (met - 0.85).powf(0.39));
    }
    h_c_s = h_c_s.max(3.0);

    let h_t_s = h_c_s + h_r_s;
    let r_clo_s = 1.52 / ((met - wme / MET_FACTOR) + 0.6944) - 0.1835;
    let r_cl_s = 0.155 * r_clo_s;
    let f_a_cl_s = 1.0 + 0.25 * r_clo_s;
    let f_cl_s = 1.0 / (1.0 + 0.155 * f_a_cl_s * h_t_s * r_clo_s);
    let i_m_s = 0.45;
    let i_cl_s = i_m_s * h_c_s / h_t_s * (1.0 - f_cl_s) / (h_c_s / h_t_s - f_cl_s * i_m_s);
    let r_a_s = 1.0 / (f_a_cl_s * h_t_s);
    let r_ea_s = 1.0 / (lr * f_a_cl_s * h_c_s);
    let r_ecl_s = r_cl_s / (lr * i_cl_s);
    let h_d_s = 1.0 / (r_a_s + r_cl_s);
    let h_e_s = 1.0 / (r_ea_s + r_ecl_s);

    let set = equivalent_temperature(q_skin, t_skin, p_s_sk, w, h_d_s, h_e_s)
        .map_err(|e| e.context("SET iteration failed"))?;

    // Effective temperature: actual clothing and air movement.
    let h_d = 1.0 / (r_a + r_clo);
    let h_e = 1.0 / (r_ea + r_ecl);
    let et = equivalent_temperature(q_skin, t_skin, p_s_sk, w, h_d, h_e)
        .map_err(|e| e.context("ET iteration failed"))?;

    // Thermal sensation and discomfort (Gagge et al. 1986)
    let tbm_l = (0.194 / 58.15) * rm + 36.301;
    let tbm_h = (0.347 / 58.15) * rm + 36.669;
    let t_sens = if t_body < tbm_l {
        0.4685 * (t_body - tbm_l)
    } else if t_body < tbm_h {
        w_max * 4.7 * (t_body - tbm_l) / (tbm_h - tbm_l)
    } else {
        w_max * 4.7 + 0.4685 * (t_body - tbm_h)
    };
    let mut disc = 4.7 * (e_rsw - e_comfort) / (e_max * w_max - e_comfort - e_diff);
    if disc <= 0.0 || !disc.is_finite() {
        disc = t_sens;
    }

    let pmv_gagge = (0.303 * (-0.036 * m).exp() + 0.028) * (e_req - e_comfort - e_diff);

    Ok(TwoNodeResult {
        set,
        et,
        t_skin,
        t_core,
        t_body,
        skin_blood_flow: m_bl,
        w,
        w_max,
        e_skin,
        e_rsw,
        e_diff,
        e_max,
        q_sensible,
        q_skin,
        q_res,
        pmv_gagge,
        disc,
        t_sens,
    })
}

/// Temperature of a reference environment (50 % RH, `t_mrt = t_air`) that
/// yields the same total skin heat loss, solved with a secant iteration.
fn equivalent_temperature(
    q_skin: f64,
    t_skin: f64,
    p_s_sk: f64,
    w: f64,
    h_d: f64,
    h_e: f64,
) -> Result<f64> {
    let residual = |t: f64| q_skin - h_d * (t_skin - t) - w * h_e * (p_s_sk - 0.5 * p_sat_torr(t));

    let delta = 1e-4;
    let mut t_old = ((t_skin - q_skin / h_d) * 100.0).round() / 100.0;
    for _ in 0..SECANT_ITERATION_LIMIT {
        let err_1 = residual(t_old);
        let err_2 = residual(t_old + delta);
        let t_new = t_old - delta * err_1 / (err_2 - err_1);
        anyhow::ensure!(t_new.is_finite(), "Non-finite temperature in secant step");
        let dx = t_new - t_old;
        t_old = t_new;
        if dx.abs() <= 0.01 {
            return Ok(t_new);
        }
    }
    anyhow::bail!("Secant iteration did not converge in {SECANT_ITERATION_LIMIT} steps")
}
