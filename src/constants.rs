//! Fixed parameters of the carbon-cycle model and the tuning objective.
//! Changing any of these changes every score the tuner produces, so
//! results from different versions are not comparable.

/// Model version for report compatibility.
/// Bump this when a formula or constant below changes.
pub const MODEL_VERSION: &str = "1.0.0";

// =============================================================================
// Response curves
// =============================================================================

/// Temperature at which photosynthesis peaks (°C)
pub const TEMP_OPTIMUM: f64 = 25.0;

/// Width of the Gaussian temperature response (°C)
pub const TEMP_SIGMA: f64 = 10.0;

/// Half-saturation CO2 concentration (ppm)
/// co2_factor(CO2_HALF_SATURATION) == 0.5
pub const CO2_HALF_SATURATION: f64 = 600.0;

/// Light response headroom above 100% (photoinhibition)
pub const LIGHT_FACTOR_MAX: f64 = 1.2;

/// Efficiency multiplier applied once per stress event
pub const STRESS_EFFICIENCY: f64 = 0.85;

/// Efficiency multiplier while pollution is active
pub const POLLUTION_EFFICIENCY: f64 = 0.7;

/// Upper clamp for the photosynthesis rate
pub const MAX_PHOTOSYNTHESIS_RATE: f64 = 2.0;

// =============================================================================
// Carbon flow
// =============================================================================

/// Reference plant biomass used when scoring candidates
pub const REFERENCE_BIOMASS: f64 = 50.0;

/// Fraction of rate × biomass sequestered as carbon
pub const ABSORPTION_FRACTION: f64 = 0.9;

/// Fraction of biomass emitted through respiration and decay
pub const EMISSION_FRACTION: f64 = 0.05;

/// O2 units produced per unit of rate × biomass
pub const OXYGEN_YIELD: f64 = 1.2;

// =============================================================================
// Pressure normalization
// =============================================================================

/// Absorbed carbon that saturates the absorption pressure at scale 1.0
pub const AP_NORMALIZER: f64 = 22.0;

/// Emitted carbon that saturates the photosynthesis-stress pressure at scale 1.0
pub const PS_NORMALIZER: f64 = 28.0;

/// Emitted carbon that saturates the soil/atmosphere pressure at scale 1.0
pub const SA_NORMALIZER: f64 = 55.0;

// =============================================================================
// Fitness objective
// =============================================================================

/// Mean pressure across scenarios the tuner aims for
pub const TARGET_MEAN_PRESSURE: f64 = 0.85;

/// Mean pressure above which the saturation penalty kicks in
pub const SATURATION_THRESHOLD: f64 = 1.25;

/// Weight of the saturation penalty in the fitness score
pub const SATURATION_WEIGHT: f64 = 1.5;

/// Sampled coefficients are rounded to this many decimal places
pub const SAMPLE_DECIMALS: i32 = 3;

// =============================================================================
// Run sizes
// =============================================================================

/// Trial count for a quick preview run
pub const PREVIEW_TRIALS: usize = 8000;

/// Trial count for a full tuning run
pub const FULL_TRIALS: usize = 15000;

/// Number of retained candidates
pub const DEFAULT_TOP_K: usize = 3;

/// Largest accepted magnitude for a sampling bound. Keeps the range width
/// and the 3-decimal rounding step finite.
pub const MAX_BOUND_MAGNITUDE: f64 = 1e9;
