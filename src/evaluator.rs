//! Scenario evaluation: how much "pressure" a candidate puts on one preset.
//!
//! A candidate's scale factors stretch three normalized carbon-flow ratios.
//! Each ratio saturates at 1.0, so the total pressure lies in [0, 3].

use crate::constants::{AP_NORMALIZER, PS_NORMALIZER, REFERENCE_BIOMASS, SA_NORMALIZER};
use crate::model::{carbon_flow, photosynthesis_rate};
use crate::presets::EnvironmentPreset;
use crate::search::CandidateConfig;

/// Per-scenario pressure split into its three sub-scores
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PressureBreakdown {
    /// Absorption pressure
    pub ap: f64,
    /// Photosynthesis-stress pressure
    pub ps: f64,
    /// Soil/atmosphere pressure
    pub sa: f64,
}

impl PressureBreakdown {
    pub fn total(&self) -> f64 {
        self.ap + self.ps + self.sa
    }
}

pub fn pressure_breakdown(
    preset: &EnvironmentPreset,
    candidate: &CandidateConfig,
) -> PressureBreakdown {
    let rate = photosynthesis_rate(preset);
    let flow = carbon_flow(rate, REFERENCE_BIOMASS);

    PressureBreakdown {
        ap: ((flow.absorbed / AP_NORMALIZER) * candidate.ap_scale).min(1.0),
        ps: ((flow.emitted / PS_NORMALIZER) * candidate.ps_scale).min(1.0),
        sa: ((flow.emitted / SA_NORMALIZER) * candidate.sa_scale).min(1.0),
    }
}

/// Total pressure of `candidate` under `preset`, in [0, 3]
pub fn evaluate_pressure(preset: &EnvironmentPreset, candidate: &CandidateConfig) -> f64 {
    pressure_breakdown(preset, candidate).total()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presets::ScenarioSet;

    fn unit_candidate() -> CandidateConfig {
        CandidateConfig {
            ap_scale: 1.0,
            ps_scale: 1.0,
            sa_scale: 1.0,
            duration_scale: 1.0,
        }
    }

    #[test]
    fn test_present_day_pressure() {
        let breakdown = pressure_breakdown(&EnvironmentPreset::present(), &unit_candidate());
        let absorbed = 420.0 / 1020.0 * 0.8 * 50.0 * 0.9;
        assert!((breakdown.ap - absorbed / 22.0).abs() < 1e-12);
        assert!((breakdown.ps - 2.5 / 28.0).abs() < 1e-12);
        assert!((breakdown.sa - 2.5 / 55.0).abs() < 1e-12);
        assert!((evaluate_pressure(&EnvironmentPreset::present(), &unit_candidate())
            - breakdown.total())
        .abs()
            < 1e-15);
    }

    #[test]
    fn test_sub_scores_saturate() {
        let huge = CandidateConfig {
            ap_scale: 1e9,
            ps_scale: 1e9,
            sa_scale: 1e9,
            duration_scale: 1.0,
        };
        for preset in ScenarioSet::default().iter() {
            let b = pressure_breakdown(preset, &huge);
            assert!(b.ap <= 1.0 && b.ps <= 1.0 && b.sa <= 1.0);
            assert!(evaluate_pressure(preset, &huge) <= 3.0);
        }
    }

    #[test]
    fn test_duration_scale_does_not_affect_pressure() {
        let preset = EnvironmentPreset::recovery();
        let mut candidate = unit_candidate();
        let before = evaluate_pressure(&preset, &candidate);
        candidate.duration_scale = 1.6;
        assert_eq!(evaluate_pressure(&preset, &candidate), before);
    }
}
