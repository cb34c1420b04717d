//! Carbon-Cycle Model Tuner - Library
//!
//! Random search for the pressure scale coefficients of a small
//! carbon-cycle model, scored against a fixed set of climate scenarios.

pub mod constants;
pub mod error;
pub mod evaluator;
pub mod model;
pub mod presets;
pub mod report;
pub mod search;

pub use error::{ConfigError, ReportError};
pub use evaluator::evaluate_pressure;
pub use presets::{EnvironmentPreset, ScenarioSet};
pub use search::{search, CandidateConfig, ScoredCandidate, SearchBounds, SearchConfig};
