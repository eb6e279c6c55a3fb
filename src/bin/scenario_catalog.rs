use std::collections::BTreeMap;

use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use simcmp::generate::{CatalogConfig, generate_catalog};
use simcmp::scenario::ScenarioStatus;
use simcmp::types::VariantKind;

/// Emit a seeded random scenario set as JSON on stdout.
#[derive(Debug, Parser)]
#[command(name = "scenario_catalog")]
struct Args {
    /// Number of scenarios to generate.
    #[arg(default_value_t = 24)]
    count: usize,
    #[arg(long, default_value_t = 42)]
    seed: u64,
    /// Probability a scenario is a promotion.
    #[arg(long, default_value_t = 0.5)]
    promo_share: f64,
}

fn main() {
    let args = Args::parse();
    if !(0.0..=1.0).contains(&args.promo_share) {
        eprintln!("error: --promo-share must lie in [0, 1], got {}", args.promo_share);
        std::process::exit(2);
    }

    let config = CatalogConfig { promo_share: args.promo_share, ..CatalogConfig::default() };
    let mut rng = ChaCha20Rng::seed_from_u64(args.seed);
    let scenarios = generate_catalog(args.count, &config, &mut rng);

    println!("{}", serde_json::to_string_pretty(&scenarios).expect("serialisation failed"));

    // Per-kind summary to stderr.
    let mut counts: BTreeMap<VariantKind, usize> = BTreeMap::new();
    let mut revenue: BTreeMap<VariantKind, f64> = BTreeMap::new();
    let mut completed: BTreeMap<VariantKind, usize> = BTreeMap::new();
    for s in &scenarios {
        let k = s.variant();
        *counts.entry(k).or_insert(0) += 1;
        *revenue.entry(k).or_insert(0.0) += s.projected_revenue;
        if s.status == ScenarioStatus::Completed {
            *completed.entry(k).or_insert(0) += 1;
        }
    }

    eprintln!("scenario_catalog: {} scenarios (seed {})", scenarios.len(), args.seed);
    for (k, n) in &counts {
        let mean = revenue[k] / *n as f64;
        let done = completed.get(k).copied().unwrap_or(0);
        eprintln!("  kind={:<6}  scenarios={n:>4}  completed={done:>4}  mean_projected_revenue={mean:>12.2}", k.as_str());
    }
}
