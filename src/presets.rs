//! Environmental scenarios that candidates are scored against.
//!
//! The four fixed presets span pre-industrial, present-day, a hot polluted
//! high-CO2 world and a recovery scenario. They are bundled in a
//! [`ScenarioSet`] that is handed to the search explicitly.

use serde::{Deserialize, Serialize};

/// One named climate scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentPreset {
    pub name: String,
    /// Atmospheric CO2 (ppm)
    pub co2: f64,
    /// Air temperature (°C)
    pub temperature: f64,
    /// Available light as a percentage of full sun
    pub light_percent: f64,
    #[serde(default)]
    pub stress_events: u32,
    /// Descriptive only; the model reacts to `stress_events`, not to this flag
    #[serde(default)]
    pub storms: bool,
    #[serde(default)]
    pub pollution_active: bool,
}

impl EnvironmentPreset {
    pub fn new(name: &str, co2: f64, temperature: f64, light_percent: f64) -> Self {
        Self {
            name: name.to_string(),
            co2,
            temperature,
            light_percent,
            stress_events: 0,
            storms: false,
            pollution_active: false,
        }
    }

    pub fn with_storms(mut self) -> Self {
        self.storms = true;
        self
    }

    pub fn with_pollution(mut self) -> Self {
        self.pollution_active = true;
        self
    }

    pub fn with_stress_events(mut self, events: u32) -> Self {
        self.stress_events = events;
        self
    }

    pub fn pre_industrial() -> Self {
        Self::new("pre", 280.0, 14.0, 70.0)
    }

    pub fn present() -> Self {
        Self::new("present", 420.0, 25.0, 80.0)
    }

    pub fn high_emissions() -> Self {
        Self::new("high", 950.0, 36.0, 95.0)
            .with_storms()
            .with_pollution()
    }

    pub fn recovery() -> Self {
        Self::new("recover", 360.0, 22.0, 85.0)
    }
}

/// Ordered, immutable collection of presets used for one search.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioSet {
    presets: Vec<EnvironmentPreset>,
}

impl ScenarioSet {
    /// An empty set is allowed here; the search rejects it before sampling.
    pub fn new(presets: Vec<EnvironmentPreset>) -> Self {
        Self { presets }
    }

    pub fn presets(&self) -> &[EnvironmentPreset] {
        &self.presets
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&EnvironmentPreset> {
        self.presets.iter().find(|p| p.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EnvironmentPreset> {
        self.presets.iter()
    }
}

impl Default for ScenarioSet {
    /// The four standard scenarios, in scoring order: pre, present, high, recover
    fn default() -> Self {
        Self::new(vec![
            EnvironmentPreset::pre_industrial(),
            EnvironmentPreset::present(),
            EnvironmentPreset::high_emissions(),
            EnvironmentPreset::recovery(),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scenarios_order() {
        let set = ScenarioSet::default();
        let names: Vec<&str> = set.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["pre", "present", "high", "recover"]);
    }

    #[test]
    fn test_high_emissions_flags() {
        let high = EnvironmentPreset::high_emissions();
        assert!(high.storms);
        assert!(high.pollution_active);
        assert_eq!(high.stress_events, 0);
        assert!((high.co2 - 950.0).abs() < 1e-12);
    }

    #[test]
    fn test_lookup_by_name() {
        let set = ScenarioSet::default();
        let present = set.get("present").unwrap();
        assert!((present.temperature - 25.0).abs() < 1e-12);
        assert!(set.get("missing").is_none());
    }

    #[test]
    fn test_preset_defaults_when_deserializing() {
        let json = r#"{"name":"x","co2":400,"temperature":20,"lightPercent":50}"#;
        let preset: EnvironmentPreset = serde_json::from_str(json).unwrap();
        assert_eq!(preset.stress_events, 0);
        assert!(!preset.storms);
        assert!(!preset.pollution_active);
    }
}
