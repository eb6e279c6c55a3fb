use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use simcmp::analysis::{self, ComparisonViolation, RunSummary};
use simcmp::config::{self, ComparisonConfig};
use simcmp::registry::MetricRegistry;
use simcmp::scenario::Scenario;
use simcmp::session::{ComparisonSession, ComparisonView};
use simcmp::types::{MetricCategory, MetricId, VariantKind};

#[derive(Debug, Parser)]
#[command(name = "simcmp", about = "Side-by-side comparison of promotion and price-change scenarios")]
struct Args {
    /// JSON array of scenarios; the staged demo set when omitted.
    #[arg(long)]
    input: Option<PathBuf>,
    /// JSON engine config overriding the canonical defaults.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Scenario ids to compare; the first scenario of each kind when omitted.
    #[arg(long, value_delimiter = ',')]
    select: Vec<String>,
    /// Metric ids to hide.
    #[arg(long, value_delimiter = ',')]
    hide: Vec<MetricId>,
    /// Categories to collapse.
    #[arg(long, value_delimiter = ',')]
    collapse: Vec<MetricCategory>,
    /// Print the comparison view as JSON.
    #[arg(long)]
    json: bool,
    /// Stress mode: check invariants over this many random selections.
    #[arg(long)]
    runs: Option<u64>,
    #[arg(long, default_value_t = 42)]
    seed: u64,
    #[arg(long)]
    quiet: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("simcmp=info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cfg = match &args.config {
        Some(path) => ComparisonConfig::load(path)?,
        None => ComparisonConfig::canonical(),
    };
    let registry = Arc::new(MetricRegistry::canonical());

    if let Some(n) = args.runs {
        let results = analysis::run_stress(args.seed, n, &cfg, &registry);
        let failed = print_stress(&results, args.quiet);
        return Ok(if failed == 0 { ExitCode::SUCCESS } else { ExitCode::FAILURE });
    }

    let scenarios = match &args.input {
        Some(path) => config::load_scenarios(path)?,
        None => config::canonical_scenarios(),
    };
    let selection = choose(&scenarios, &args.select)?;

    let mut session = ComparisonSession::new(Arc::clone(&registry), cfg).select(selection)?;
    for metric in &args.hide {
        session = session.toggle_metric_visibility(*metric)?;
    }
    for category in &args.collapse {
        session = session.toggle_category_expansion(*category)?;
    }

    let Some(view) = session.view() else {
        return Err("comparison did not start".into());
    };
    if args.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else if !args.quiet {
        print_view(&view);
    }
    Ok(ExitCode::SUCCESS)
}

fn choose(scenarios: &[Scenario], ids: &[String]) -> Result<Vec<Scenario>, String> {
    if ids.is_empty() {
        return Ok(VariantKind::ALL
            .iter()
            .filter_map(|k| scenarios.iter().find(|s| s.variant() == *k))
            .cloned()
            .collect());
    }
    ids.iter()
        .map(|id| {
            scenarios
                .iter()
                .find(|s| s.id.as_str() == id)
                .cloned()
                .ok_or_else(|| format!("no scenario with id '{id}'"))
        })
        .collect()
}

fn print_view(view: &ComparisonView) {
    let label_width = 22;
    let cell_width = 26;

    println!("\n=== Scenario comparison ({} scenarios) ===", view.columns.len());
    print!("{:<label_width$}", "");
    for col in &view.columns {
        let name: String = col.scenario.name.chars().take(cell_width - 2).collect();
        print!(" | {name:>cell_width$}");
    }
    println!();
    print!("{:<label_width$}", "Kind");
    for col in &view.columns {
        print!(" | {:>cell_width$}", col.scenario.variant().as_str());
    }
    println!();
    println!("{}", "-".repeat(label_width + view.columns.len() * (cell_width + 3)));

    for group in &view.categorized_metrics {
        let marker = if view.expanded_categories.contains(&group.category) { "▾" } else { "▸" };
        println!("{marker} {}", group.category.label());
        for row in view.rows.iter().filter(|r| r.metric.category == group.category) {
            print!("  {:<w$}", row.metric.label, w = label_width - 2);
            for v in &row.values {
                print!(" | {v:>cell_width$}");
            }
            println!();
        }
    }

    if !view.insights.is_empty() {
        println!("\n=== Insights ===");
        for insight in &view.insights {
            println!("  • {insight}");
        }
    }
}

fn print_stress(results: &[RunSummary], quiet: bool) -> usize {
    let failed: Vec<&RunSummary> = results.iter().filter(|r| !r.violations.is_empty()).collect();
    if quiet {
        return failed.len();
    }

    println!("\n=== Stress runs (N={}) ===", results.len());
    println!("{:>8} | {:>8} | {:>5} | {:>7} | {:>8} | {:>10}", "Seed", "Selected", "Kinds", "Metrics", "Insights", "Violations");
    println!("{}", "-".repeat(62));
    for r in results {
        println!(
            "{:>8} | {:>8} | {:>5} | {:>7} | {:>8} | {:>10}",
            r.seed,
            r.selected,
            r.kinds,
            r.unified_metrics,
            r.insights,
            r.violations.len()
        );
    }

    let inv = |variant: fn(&ComparisonViolation) -> bool| {
        if failed.iter().flat_map(|r| r.violations.iter()).any(variant) { "FAIL" } else { "PASS" }
    };
    println!("\n=== Comparison invariants ===");
    println!("  [1] No duplicate metric ids:           {}", inv(|v| matches!(v, ComparisonViolation::DuplicateMetric { .. })));
    println!("  [2] Unified size = deduplicated union: {}", inv(|v| matches!(v, ComparisonViolation::UnifiedSizeMismatch { .. })));
    println!("  [3] Every column has every cell:       {}", inv(|v| matches!(v, ComparisonViolation::MissingCell { .. })));
    println!("  [4] Every column has every flag:       {}", inv(|v| matches!(v, ComparisonViolation::VisibilityGap { .. })));
    println!("  [5] Category display order:            {}", inv(|v| matches!(v, ComparisonViolation::CategoryOrder { .. })));
    println!("  [6] No empty categories:               {}", inv(|v| matches!(v, ComparisonViolation::EmptyCategory { .. })));
    println!("  [7] Cross-kind cells are placeholders: {}", inv(|v| matches!(v, ComparisonViolation::PlaceholderExpected { .. })));
    println!("  [8] Visibility toggle is involutive:   {}", inv(|v| matches!(v, ComparisonViolation::VisibilityNotInvolutive { .. })));
    println!("  [9] Revenue insight always present:    {}", inv(|v| matches!(v, ComparisonViolation::MissingRevenueInsight { .. })));

    if failed.is_empty() {
        println!("  All comparison invariants: PASS");
    } else {
        println!("\n  {} run(s) with violations:", failed.len());
        for r in &failed {
            for v in &r.violations {
                println!("    seed {}: {v}", r.seed);
            }
        }
    }
    failed.len()
}
