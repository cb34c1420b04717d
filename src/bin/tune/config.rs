//! Configuration loading and CLI argument parsing

use clap::Parser;
use serde::Deserialize;

use ccm_tune::constants::{DEFAULT_TOP_K, FULL_TRIALS, PREVIEW_TRIALS};
use ccm_tune::search::{ParamRange, SearchBounds, SearchConfig};

#[derive(Parser, Debug)]
#[command(name = "tune")]
#[command(about = "Random search for carbon-cycle pressure coefficients")]
pub struct Args {
    /// Path to config file
    #[arg(short = 'c', long, default_value = "config.toml")]
    pub config: String,

    /// Number of trials (overrides config and --full)
    #[arg(short = 't', long)]
    pub trials: Option<usize>,

    /// Use the full trial count instead of the preview count
    #[arg(long)]
    pub full: bool,

    /// Number of configs to keep (overrides config)
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,

    /// RNG seed for a reproducible run (overrides config)
    #[arg(short = 's', long)]
    pub seed: Option<u64>,

    /// Report output path (overrides config)
    #[arg(short = 'o', long)]
    pub output: Option<String>,

    /// Print per-scenario pressures for each retained config
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub search: SearchSection,
    #[serde(default)]
    pub bounds: BoundsConfig,
}

#[derive(Debug, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "default_output")]
    pub output: String,
}

fn default_output() -> String {
    "configs/best_particle_configs.json".to_string()
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchSection {
    #[serde(default = "default_trials")]
    pub trials: usize,
    #[serde(default = "default_full_trials")]
    pub full_trials: usize,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_trials() -> usize {
    PREVIEW_TRIALS
}
fn default_full_trials() -> usize {
    FULL_TRIALS
}
fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

impl Default for SearchSection {
    fn default() -> Self {
        Self {
            trials: default_trials(),
            full_trials: default_full_trials(),
            top_k: default_top_k(),
            seed: None,
        }
    }
}

/// Sampling ranges as `[low, high]` pairs
#[derive(Debug, Deserialize)]
pub struct BoundsConfig {
    #[serde(default = "default_ap")]
    pub ap_scale: (f64, f64),
    #[serde(default = "default_ps")]
    pub ps_scale: (f64, f64),
    #[serde(default = "default_sa")]
    pub sa_scale: (f64, f64),
    #[serde(default = "default_duration")]
    pub duration_scale: (f64, f64),
}

fn default_ap() -> (f64, f64) {
    (0.4, 2.0)
}
fn default_ps() -> (f64, f64) {
    (0.4, 1.6)
}
fn default_sa() -> (f64, f64) {
    (0.4, 1.4)
}
fn default_duration() -> (f64, f64) {
    (0.6, 1.6)
}

impl Default for BoundsConfig {
    fn default() -> Self {
        Self {
            ap_scale: default_ap(),
            ps_scale: default_ps(),
            sa_scale: default_sa(),
            duration_scale: default_duration(),
        }
    }
}

impl From<&BoundsConfig> for SearchBounds {
    fn from(b: &BoundsConfig) -> Self {
        Self {
            ap_scale: ParamRange::from(b.ap_scale),
            ps_scale: ParamRange::from(b.ps_scale),
            sa_scale: ParamRange::from(b.sa_scale),
            duration_scale: ParamRange::from(b.duration_scale),
        }
    }
}

impl Config {
    /// A missing file means defaults. A file that exists but cannot be read
    /// or parsed is an error, so a typo never silently widens the search.
    pub fn load(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::parse(&contents)
                .map_err(|e| format!("failed to parse {}: {}", path, e).into()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No config file at {}, using defaults", path);
                Ok(Config::default())
            }
            Err(e) => Err(format!("failed to read {}: {}", path, e).into()),
        }
    }

    pub fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Merge CLI overrides into a search configuration. Validation happens
    /// when the searcher is built.
    pub fn search_config(&self, args: &Args) -> SearchConfig {
        let trials = args.trials.unwrap_or(if args.full {
            self.search.full_trials
        } else {
            self.search.trials
        });

        SearchConfig {
            trials,
            top_k: args.top_k.unwrap_or(self.search.top_k),
            bounds: SearchBounds::from(&self.bounds),
            seed: args.seed.or(self.search.seed),
        }
    }

    pub fn output_path(&self, args: &Args) -> String {
        args.output.clone().unwrap_or_else(|| self.paths.output.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["tune"];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    #[test]
    fn test_defaults_match_search_defaults() {
        let config = Config::default();
        let sc = config.search_config(&args(&[]));
        assert_eq!(sc.trials, 8000);
        assert_eq!(sc.top_k, 3);
        assert_eq!(sc.bounds, SearchBounds::default());
        assert_eq!(sc.seed, None);
    }

    #[test]
    fn test_full_flag_and_overrides() {
        let config = Config::default();
        assert_eq!(config.search_config(&args(&["--full"])).trials, 15000);

        let sc = config.search_config(&args(&["--full", "-t", "50", "-k", "5", "-s", "9"]));
        assert_eq!(sc.trials, 50);
        assert_eq!(sc.top_k, 5);
        assert_eq!(sc.seed, Some(9));
    }

    #[test]
    fn test_parse_toml() {
        let config = Config::parse(
            r#"
            [paths]
            output = "out/best.json"

            [search]
            trials = 100
            seed = 42

            [bounds]
            ap_scale = [2.0, 0.4]
            "#,
        )
        .unwrap();

        let sc = config.search_config(&args(&[]));
        assert_eq!(sc.trials, 100);
        assert_eq!(sc.seed, Some(42));
        assert_eq!(sc.bounds.ap_scale, ParamRange::new(2.0, 0.4));
        assert_eq!(sc.bounds.ps_scale, ParamRange::new(0.4, 1.6));
        assert!(sc.validate().is_err());
        assert_eq!(config.output_path(&args(&[])), "out/best.json");
        assert_eq!(config.output_path(&args(&["-o", "x.json"])), "x.json");
    }

    #[test]
    fn test_malformed_bounds_rejected() {
        assert!(Config::parse("[bounds]\nap_scale = [2.0]\n").is_err());
        assert!(Config::parse("[bounds]\nps_scale = \"wide\"\n").is_err());
    }

    #[test]
    fn test_load_malformed_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[bounds]\nap_scale = [2.0]\n").unwrap();

        let err = Config::load(path.to_str().unwrap()).unwrap_err();
        assert!(err.to_string().contains("failed to parse"));
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        let config = Config::load(path.to_str().unwrap()).unwrap();
        assert_eq!(config.search_config(&args(&[])).bounds, SearchBounds::default());
    }
}
