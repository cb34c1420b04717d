//! Carbon-cycle model: response curves, photosynthesis and carbon flow.
//!
//! Everything here is a pure function of its inputs. The response curves
//! are clamped so that downstream normalization never sees out-of-range
//! values.

use crate::constants::{
    ABSORPTION_FRACTION, CO2_HALF_SATURATION, EMISSION_FRACTION, LIGHT_FACTOR_MAX,
    MAX_PHOTOSYNTHESIS_RATE, OXYGEN_YIELD, POLLUTION_EFFICIENCY, STRESS_EFFICIENCY,
    TEMP_OPTIMUM, TEMP_SIGMA,
};
use crate::presets::EnvironmentPreset;

/// Carbon exchanged per time unit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarbonFlow {
    pub absorbed: f64,
    pub emitted: f64,
}

/// `max(lo, min(hi, x))`. Callers guarantee `lo <= hi`.
pub fn clamp(x: f64, lo: f64, hi: f64) -> f64 {
    lo.max(hi.min(x))
}

/// Gaussian response centred on the optimum temperature
pub fn temp_factor(temperature: f64) -> f64 {
    let d = temperature - TEMP_OPTIMUM;
    let f = (-(d * d) / (2.0 * TEMP_SIGMA * TEMP_SIGMA)).exp();
    clamp(f, 0.0, 1.0)
}

/// Michaelis-Menten style saturation in CO2
pub fn co2_factor(co2: f64) -> f64 {
    clamp(co2 / (co2 + CO2_HALF_SATURATION), 0.0, 1.0)
}

/// Linear in light up to 100%, with headroom to 120%
pub fn light_factor(light_percent: f64) -> f64 {
    clamp(light_percent / 100.0, 0.0, LIGHT_FACTOR_MAX)
}

/// Photosynthesis rate per unit biomass, in [0, 2]
pub fn photosynthesis_rate(preset: &EnvironmentPreset) -> f64 {
    let mut rate = temp_factor(preset.temperature)
        * co2_factor(preset.co2)
        * light_factor(preset.light_percent);
    rate *= STRESS_EFFICIENCY.powi(preset.stress_events as i32);
    if preset.pollution_active {
        rate *= POLLUTION_EFFICIENCY;
    }
    clamp(rate, 0.0, MAX_PHOTOSYNTHESIS_RATE)
}

pub fn carbon_flow(rate: f64, biomass: f64) -> CarbonFlow {
    CarbonFlow {
        absorbed: rate * biomass * ABSORPTION_FRACTION,
        emitted: biomass * EMISSION_FRACTION,
    }
}

pub fn oxygen_output(rate: f64, biomass: f64) -> f64 {
    rate * biomass * OXYGEN_YIELD
}

/// Ecosystem health index from 0 (collapse) to 100 (healthy).
///
/// Photosynthesis contributes up to 60 points, biomass up to 30 and low CO2
/// up to 10. Pollution costs 8 points and each stress event 4.
pub fn global_balance(preset: &EnvironmentPreset, biomass: f64) -> u32 {
    let p = photosynthesis_rate(preset);
    let biomass_factor = clamp(biomass / 100.0, 0.0, 1.0);
    let mut index = p * 60.0 + biomass_factor * 30.0 + (1.0 - preset.co2 / 2000.0) * 10.0;
    if preset.pollution_active {
        index -= 8.0;
    }
    index -= preset.stress_events as f64 * 4.0;
    clamp(index, 0.0, 100.0).round() as u32
}
