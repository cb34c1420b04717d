//! Carbon-Cycle Model Tuner
//!
//! Runs a seeded random search over the pressure scale coefficients,
//! writes the best configs to a JSON report and prints a summary.
//! Ctrl+C stops the search after the current trial and still writes
//! the results gathered so far.

mod config;

use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use clap::Parser;

use ccm_tune::constants;
use ccm_tune::presets::ScenarioSet;
use ccm_tune::report::{format_result_line, TuneReport};
use ccm_tune::search::{fitness_components, scenario_pressures, RandomSearcher};

use config::{Args, Config};

fn main() {
    env_logger::init();
    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load(&args.config)?;
    let search_config = config.search_config(&args);
    let output_path = config.output_path(&args);
    let scenarios = ScenarioSet::default();

    // Rejects bad bounds and counts before anything is sampled or written
    let mut searcher = RandomSearcher::new(search_config, scenarios)?;

    print_banner(&searcher);

    let interrupt_flag = Arc::new(AtomicBool::new(false));
    setup_interrupt_handler(interrupt_flag.clone())?;

    println!(
        "Running auto-tune search ({} trials, keeping top {})...",
        searcher.config.trials, searcher.config.top_k
    );
    let start = Instant::now();
    let completed = searcher.run(&interrupt_flag);
    let elapsed = start.elapsed().as_secs_f64();
    log::info!("Completed {} trials in {:.2}s", completed, elapsed);

    if completed < searcher.config.trials as u64 {
        println!(
            "Stopped early after {} of {} trials",
            completed, searcher.config.trials
        );
    }

    let scenarios = searcher.scenarios().clone();
    let report = TuneReport::new(searcher.into_results());
    report.save(Path::new(&output_path))?;

    println!("Wrote top-{} configs to {}", report.top.len(), output_path);
    for (i, entry) in report.top.iter().enumerate() {
        println!("{}", format_result_line(i + 1, entry));
        if args.verbose {
            let fit = fitness_components(&entry.config, &scenarios);
            let pressures = scenario_pressures(&entry.config, &scenarios);
            for (preset, p) in scenarios.iter().zip(pressures) {
                println!("     {:8} pressure={:.4}", preset.name, p);
            }
            println!(
                "     mean={:.4} sd={:.4} mean_penalty={:.4} saturation_penalty={:.4}",
                fit.mean, fit.std_dev, fit.mean_penalty, fit.saturation_penalty
            );
        }
    }

    Ok(())
}

fn print_banner(searcher: &RandomSearcher) {
    println!("═══════════════════════════════════════════════════════════════");
    println!("  CARBON-CYCLE MODEL TUNER (model v{})", constants::MODEL_VERSION);
    println!("  Seed: {}", searcher.seed());
    println!("═══════════════════════════════════════════════════════════════");
    println!();

    let b = &searcher.config.bounds;
    println!("Sampling ranges:");
    println!("  apScale       = [{}, {}]", b.ap_scale.low, b.ap_scale.high);
    println!("  psScale       = [{}, {}]", b.ps_scale.low, b.ps_scale.high);
    println!("  saScale       = [{}, {}]", b.sa_scale.low, b.sa_scale.high);
    println!("  durationScale = [{}, {}]", b.duration_scale.low, b.duration_scale.high);
    println!();

    println!("Scenarios:");
    for p in searcher.scenarios().iter() {
        println!(
            "  {:8} co2={:<4} temp={:<3} light={:<3} storms={} pollution={}",
            p.name, p.co2, p.temperature, p.light_percent, p.storms, p.pollution_active
        );
    }
    println!();
}

fn setup_interrupt_handler(interrupt_flag: Arc<AtomicBool>) -> Result<(), ctrlc::Error> {
    let interrupt_count = Arc::new(AtomicUsize::new(0));

    ctrlc::set_handler(move || {
        let count = interrupt_count.fetch_add(1, Ordering::SeqCst);
        interrupt_flag.store(true, Ordering::SeqCst);
        if count == 0 {
            eprintln!("\nInterrupt received, will stop after current trial...");
        } else {
            eprintln!("\nForce quit.");
            std::process::exit(1);
        }
    })
}
