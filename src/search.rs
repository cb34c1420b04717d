//! Random search over pressure scale coefficients.
//!
//! Each trial samples a [`CandidateConfig`] uniformly inside [`SearchBounds`],
//! scores it against every scenario and offers it to a bounded [`TopK`] set.
//! Trials are independent; the only state carried between them is the
//! retained top-K and the RNG.

use std::sync::atomic::{AtomicBool, Ordering};

use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_TOP_K, MAX_BOUND_MAGNITUDE, PREVIEW_TRIALS, SAMPLE_DECIMALS, SATURATION_THRESHOLD,
    SATURATION_WEIGHT, TARGET_MEAN_PRESSURE,
};
use crate::error::ConfigError;
use crate::evaluator::evaluate_pressure;
use crate::presets::ScenarioSet;

/// Trials between progress log lines
const PROGRESS_INTERVAL: u64 = 1000;

// =============================================================================
// Bounds
// =============================================================================

/// Closed sampling interval `[low, high]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamRange {
    pub low: f64,
    pub high: f64,
}

impl ParamRange {
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    fn validate(&self, field: &'static str) -> Result<(), ConfigError> {
        if !self.low.is_finite() || !self.high.is_finite() {
            return Err(ConfigError::NonFiniteBound { field });
        }
        if self.low.abs() > MAX_BOUND_MAGNITUDE || self.high.abs() > MAX_BOUND_MAGNITUDE {
            return Err(ConfigError::BoundOutOfRange {
                field,
                limit: MAX_BOUND_MAGNITUDE,
            });
        }
        if self.low > self.high {
            return Err(ConfigError::InvalidBounds {
                field,
                low: self.low,
                high: self.high,
            });
        }
        Ok(())
    }

    /// Uniform sample, rounded to [`SAMPLE_DECIMALS`] places
    fn sample<R: Rng>(&self, rng: &mut R) -> f64 {
        round_to(rng.gen_range(self.low..=self.high), SAMPLE_DECIMALS)
    }
}

impl From<(f64, f64)> for ParamRange {
    fn from((low, high): (f64, f64)) -> Self {
        Self::new(low, high)
    }
}

/// Sampling ranges for every candidate field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchBounds {
    pub ap_scale: ParamRange,
    pub ps_scale: ParamRange,
    pub sa_scale: ParamRange,
    pub duration_scale: ParamRange,
}

impl Default for SearchBounds {
    fn default() -> Self {
        Self {
            ap_scale: ParamRange::new(0.4, 2.0),
            ps_scale: ParamRange::new(0.4, 1.6),
            sa_scale: ParamRange::new(0.4, 1.4),
            duration_scale: ParamRange::new(0.6, 1.6),
        }
    }
}

impl SearchBounds {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.ap_scale.validate("apScale")?;
        self.ps_scale.validate("psScale")?;
        self.sa_scale.validate("saScale")?;
        self.duration_scale.validate("durationScale")?;
        Ok(())
    }
}

fn round_to(x: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (x * factor).round() / factor
}

// =============================================================================
// Candidates
// =============================================================================

/// One set of scaling coefficients under test
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateConfig {
    pub ap_scale: f64,
    pub ps_scale: f64,
    pub sa_scale: f64,
    /// Carried through to the report; the pressure model does not use it
    pub duration_scale: f64,
}

impl CandidateConfig {
    /// Fields are drawn in declaration order so a seed fixes the whole sequence.
    pub fn sample<R: Rng>(bounds: &SearchBounds, rng: &mut R) -> Self {
        Self {
            ap_scale: bounds.ap_scale.sample(rng),
            ps_scale: bounds.ps_scale.sample(rng),
            sa_scale: bounds.sa_scale.sample(rng),
            duration_scale: bounds.duration_scale.sample(rng),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    #[serde(rename = "cfg")]
    pub config: CandidateConfig,
    pub score: f64,
}

// =============================================================================
// Fitness
// =============================================================================

/// Aggregate statistics behind a fitness score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitnessComponents {
    pub mean: f64,
    /// Population standard deviation (divides by N)
    pub std_dev: f64,
    pub mean_penalty: f64,
    pub saturation_penalty: f64,
    pub score: f64,
}

/// Reward spread across scenarios, penalize distance from the target mean
/// and over-saturated configurations.
///
/// `rates` must be non-empty.
pub fn compute_fitness(rates: &[f64]) -> FitnessComponents {
    let n = rates.len() as f64;
    let mean = rates.iter().sum::<f64>() / n;
    let variance = rates.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
    let std_dev = variance.sqrt();

    let mean_penalty = (mean - TARGET_MEAN_PRESSURE).abs();
    let saturation_penalty = (mean - SATURATION_THRESHOLD).max(0.0);
    let score = std_dev - mean_penalty - saturation_penalty * SATURATION_WEIGHT;

    FitnessComponents {
        mean,
        std_dev,
        mean_penalty,
        saturation_penalty,
        score,
    }
}

/// Pressures of `config` under each scenario, in scenario order
pub fn scenario_pressures(config: &CandidateConfig, scenarios: &ScenarioSet) -> Vec<f64> {
    scenarios
        .iter()
        .map(|preset| evaluate_pressure(preset, config))
        .collect()
}

pub fn fitness_components(config: &CandidateConfig, scenarios: &ScenarioSet) -> FitnessComponents {
    compute_fitness(&scenario_pressures(config, scenarios))
}

/// Fitness score of one candidate. Pure: same inputs, same bits.
pub fn score_config(config: &CandidateConfig, scenarios: &ScenarioSet) -> f64 {
    fitness_components(config, scenarios).score
}

// =============================================================================
// Top-K retention
// =============================================================================

/// Best `capacity` candidates seen so far, highest score first.
///
/// Equal scores keep arrival order, so the result matches a stable
/// descending sort of every offered candidate truncated to `capacity`.
#[derive(Debug, Clone)]
pub struct TopK {
    capacity: usize,
    entries: Vec<ScoredCandidate>,
}

impl TopK {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Vec::new(),
        }
    }

    /// Returns true if the candidate was retained
    pub fn offer(&mut self, candidate: ScoredCandidate) -> bool {
        if self.capacity == 0 {
            return false;
        }
        if self.entries.len() == self.capacity {
            if let Some(last) = self.entries.last() {
                if candidate.score <= last.score {
                    return false;
                }
            }
        }

        let pos = self
            .entries
            .partition_point(|e| e.score >= candidate.score);
        self.entries.insert(pos, candidate);
        self.entries.truncate(self.capacity);
        true
    }

    pub fn best(&self) -> Option<&ScoredCandidate> {
        self.entries.first()
    }

    pub fn entries(&self) -> &[ScoredCandidate] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_vec(self) -> Vec<ScoredCandidate> {
        self.entries
    }
}

// =============================================================================
// Searcher
// =============================================================================

/// Parameters for one search run
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    pub trials: usize,
    pub top_k: usize,
    pub bounds: SearchBounds,
    /// None draws a fresh seed; the chosen seed is logged either way
    pub seed: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            trials: PREVIEW_TRIALS,
            top_k: DEFAULT_TOP_K,
            bounds: SearchBounds::default(),
            seed: None,
        }
    }
}

impl SearchConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.trials == 0 {
            return Err(ConfigError::InvalidTrialCount);
        }
        if self.top_k == 0 {
            return Err(ConfigError::InvalidTopK);
        }
        self.bounds.validate()
    }
}

/// Sequential random searcher
pub struct RandomSearcher {
    pub config: SearchConfig,
    pub total_evaluated: u64,
    scenarios: ScenarioSet,
    seed: u64,
    rng: StdRng,
    top: TopK,
}

impl RandomSearcher {
    /// Validates everything up front; no trial runs on bad input.
    pub fn new(config: SearchConfig, scenarios: ScenarioSet) -> Result<Self, ConfigError> {
        config.validate()?;
        if scenarios.is_empty() {
            return Err(ConfigError::EmptyScenarios);
        }

        let seed = match config.seed {
            Some(s) => {
                log::info!("Using deterministic seed: {}", s);
                s
            }
            None => {
                let s = rand::random::<u64>();
                log::info!("No seed given, drew seed {} (pass --seed {} to reproduce)", s, s);
                s
            }
        };

        let top = TopK::new(config.top_k);
        Ok(Self {
            config,
            total_evaluated: 0,
            scenarios,
            seed,
            rng: StdRng::seed_from_u64(seed),
            top,
        })
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn scenarios(&self) -> &ScenarioSet {
        &self.scenarios
    }

    /// Run one trial. A trial is never split; interruption only happens between steps.
    pub fn step(&mut self) -> ScoredCandidate {
        let config = CandidateConfig::sample(&self.config.bounds, &mut self.rng);
        let score = score_config(&config, &self.scenarios);
        let scored = ScoredCandidate { config, score };

        if self.top.offer(scored) {
            log::debug!(
                "trial {}: retained score={:.4} cfg={:?}",
                self.total_evaluated + 1,
                score,
                config
            );
        }
        self.total_evaluated += 1;
        scored
    }

    pub fn remaining(&self) -> u64 {
        (self.config.trials as u64).saturating_sub(self.total_evaluated)
    }

    /// Run until the configured trial count is reached or `interrupt` is set.
    /// Returns the number of trials run by this call.
    pub fn run(&mut self, interrupt: &AtomicBool) -> u64 {
        let start = self.total_evaluated;

        while self.remaining() > 0 {
            if interrupt.load(Ordering::Relaxed) {
                log::warn!(
                    "Interrupted after {} of {} trials",
                    self.total_evaluated,
                    self.config.trials
                );
                break;
            }

            self.step();

            if self.total_evaluated % PROGRESS_INTERVAL == 0 {
                log::info!(
                    "{}/{} trials | best={:.4}",
                    self.total_evaluated,
                    self.config.trials,
                    self.best().map(|b| b.score).unwrap_or(f64::NAN)
                );
            }
        }

        self.total_evaluated - start
    }

    pub fn best(&self) -> Option<&ScoredCandidate> {
        self.top.best()
    }

    pub fn top(&self) -> &[ScoredCandidate] {
        self.top.entries()
    }

    pub fn into_results(self) -> Vec<ScoredCandidate> {
        self.top.into_vec()
    }
}

/// Run a complete search and return the best `top_k` candidates, highest first.
///
/// Fails with [`ConfigError`] before sampling if `trials` or `top_k` is zero,
/// any bound is inverted or non-finite, or `scenarios` is empty.
pub fn search(
    trials: usize,
    bounds: SearchBounds,
    scenarios: &ScenarioSet,
    top_k: usize,
    seed: Option<u64>,
) -> Result<Vec<ScoredCandidate>, ConfigError> {
    let config = SearchConfig {
        trials,
        top_k,
        bounds,
        seed,
    };
    let mut searcher = RandomSearcher::new(config, scenarios.clone())?;
    searcher.run(&AtomicBool::new(false));
    Ok(searcher.into_results())
}
