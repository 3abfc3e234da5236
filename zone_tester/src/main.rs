use anyhow::{Context, bail};
use binsight::core_modules::classifier;
use binsight::core_modules::feature_extractor;
use binsight::pipeline::{Observation, PipelineConfig, compute_zones};
use std::env;
use std::fs;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // --- 1. Argument Parsing & Setup ---
    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        println!("Usage: zone_tester zones <observations_json_path>");
        println!("       zone_tester classify <image_path>");
        return Ok(());
    }

    match args[1].as_str() {
        "zones" => run_zones(&args[2]),
        "classify" => run_classify(&args[2]),
        other => bail!("unknown mode '{other}'"),
    }
}

/// Loads an observation set exported by the persistence layer and prints the
/// zone report the map dashboard would render.
fn run_zones(path: &str) -> anyhow::Result<()> {
    // --- 2. Load Observations ---
    let payload = fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
    let observations: Vec<Observation> =
        serde_json::from_str(&payload).context("parsing observations")?;

    // --- 3. Zone Computation ---
    let config = PipelineConfig::default();
    let report = compute_zones(&observations, &config).context("computing zones")?;

    // --- 4. Report ---
    println!("{}", serde_json::to_string_pretty(&report)?);
    eprintln!(
        "{} observations in, {} zoned; {} critical / {} monitored / {} safe",
        observations.len(),
        report.zones.len(),
        report.summary.critical,
        report.summary.monitored,
        report.summary.safe
    );
    Ok(())
}

/// Runs a single image through extraction and classification, printing what
/// the engine would store for it.
fn run_classify(path: &str) -> anyhow::Result<()> {
    let image_bytes = fs::read(path).with_context(|| format!("reading {path}"))?;

    match feature_extractor::extract_features(&image_bytes) {
        Ok(features) => {
            let label = classifier::classify(Some(&features));
            println!("{}", serde_json::to_string_pretty(&features)?);
            println!("mean color: {}", features.mean_color_hex());
            println!("automatic label: {label:?}");
        }
        Err(error) => {
            println!("extraction failed ({error}); the record would stay unlabeled");
        }
    }
    Ok(())
}
