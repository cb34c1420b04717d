//! Apply a tuned config
//!
//! Reads the report written by `tune` and either lists its entries or
//! writes one of them as the active configuration.
//!
//! Usage:
//!   apply --list        # show retained configs
//!   apply --index 2     # make the second-best config active

use std::path::Path;

use clap::Parser;
use serde::Deserialize;

use ccm_tune::report::{format_report, format_result_line, write_active_config, TuneReport};

#[derive(Parser, Debug)]
#[command(name = "apply")]
#[command(about = "Select a tuned config from the report and make it active")]
struct Args {
    /// Path to config file
    #[arg(short = 'c', long, default_value = "config.toml")]
    config: String,

    /// List the configs in the report and exit
    #[arg(short = 'l', long)]
    list: bool,

    /// 1-based rank of the config to apply
    #[arg(short = 'i', long, default_value_t = 1)]
    index: usize,

    /// Report path (overrides config)
    #[arg(long)]
    report: Option<String>,

    /// Active config output path (overrides config)
    #[arg(long)]
    active: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct Config {
    #[serde(default)]
    paths: PathsConfig,
}

#[derive(Debug, Deserialize)]
struct PathsConfig {
    #[serde(default = "default_output")]
    output: String,
    #[serde(default = "default_active")]
    active: String,
}

fn default_output() -> String {
    "configs/best_particle_configs.json".to_string()
}
fn default_active() -> String {
    "configs/active_particle_config.json".to_string()
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            active: default_active(),
        }
    }
}

impl Config {
    /// Defaults when the file is missing, an error when it does not parse
    fn load(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents)
                .map_err(|e| format!("failed to parse {}: {}", path, e).into()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No config file at {}, using defaults", path);
                Ok(Config::default())
            }
            Err(e) => Err(format!("failed to read {}: {}", path, e).into()),
        }
    }

    fn report_path(&self, args: &Args) -> String {
        args.report.clone().unwrap_or_else(|| self.paths.output.clone())
    }

    fn active_path(&self, args: &Args) -> String {
        args.active.clone().unwrap_or_else(|| self.paths.active.clone())
    }
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load(&args.config)?;
    let report_path = config.report_path(args);
    let active_path = config.active_path(args);

    let report = TuneReport::load(Path::new(&report_path))
        .map_err(|e| format!("cannot read {}: {}", report_path, e))?;
    log::info!("Loaded report generated at {}", report.generated_at);

    if args.list {
        println!("Top configs:");
        print!("{}", format_report(&report));
        return Ok(());
    }

    let chosen = report.select(args.index)?;
    write_active_config(&chosen.config, Path::new(&active_path))?;
    println!("Wrote selected config to {}", active_path);
    println!("{}", format_result_line(args.index, chosen));

    Ok(())
}
