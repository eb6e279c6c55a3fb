use std::collections::HashSet;

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha20Rng;

use crate::comparison::{Comparison, MIN_SELECTION, unified_metrics};
use crate::config::ComparisonConfig;
use crate::generate::{CatalogConfig, generate_catalog};
use crate::registry::MetricRegistry;
use crate::session::ComparisonSession;
use crate::types::{MetricCategory, MetricId, ScenarioId};

/// A structural invariant broken by a built comparison or a session.
#[derive(Debug, Clone, PartialEq)]
pub enum ComparisonViolation {
    /// The unified metric set lists an id more than once.
    DuplicateMetric { metric: MetricId },
    /// Unified set size differs from the deduplicated union of the kinds' registries.
    UnifiedSizeMismatch { expected: usize, actual: usize },
    /// A column lacks a value for a unified metric.
    MissingCell { scenario: ScenarioId, metric: MetricId },
    /// A column lacks a visibility flag for a unified metric.
    VisibilityGap { scenario: ScenarioId, metric: MetricId },
    /// Category groups are out of display order.
    CategoryOrder { detail: String },
    /// A category group with no metrics was emitted.
    EmptyCategory { category: MetricCategory },
    /// A metric the column's kind does not define resolved to a real value.
    PlaceholderExpected { scenario: ScenarioId, metric: MetricId, value: String },
    /// Toggling a metric twice did not restore the columns.
    VisibilityNotInvolutive { metric: MetricId },
    /// A valid selection produced no projected-revenue insight.
    MissingRevenueInsight { scenarios: usize },
}

impl std::fmt::Display for ComparisonViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateMetric { metric } => write!(f, "DuplicateMetric metric={metric}"),
            Self::UnifiedSizeMismatch { expected, actual } => {
                write!(f, "UnifiedSizeMismatch expected={expected} actual={actual}")
            }
            Self::MissingCell { scenario, metric } => {
                write!(f, "MissingCell scenario={scenario} metric={metric}")
            }
            Self::VisibilityGap { scenario, metric } => {
                write!(f, "VisibilityGap scenario={scenario} metric={metric}")
            }
            Self::CategoryOrder { detail } => write!(f, "CategoryOrder: {detail}"),
            Self::EmptyCategory { category } => write!(f, "EmptyCategory category={category}"),
            Self::PlaceholderExpected { scenario, metric, value } => {
                write!(f, "PlaceholderExpected scenario={scenario} metric={metric} value={value:?}")
            }
            Self::VisibilityNotInvolutive { metric } => {
                write!(f, "VisibilityNotInvolutive metric={metric}")
            }
            Self::MissingRevenueInsight { scenarios } => {
                write!(f, "MissingRevenueInsight scenarios={scenarios}")
            }
        }
    }
}

/// Check a built comparison. Returns one item per violation found.
pub fn verify_comparison(
    cmp: &Comparison,
    registry: &MetricRegistry,
    placeholder: &str,
) -> Vec<ComparisonViolation> {
    let mut violations = Vec::new();

    // ── Unified set ───────────────────────────────────────────────────────────
    let mut seen = HashSet::new();
    for d in &cmp.unified_metrics {
        if !seen.insert(d.id) {
            violations.push(ComparisonViolation::DuplicateMetric { metric: d.id });
        }
    }
    let expected: HashSet<MetricId> = cmp
        .scenario_types_present
        .iter()
        .flat_map(|k| registry.metrics_for(*k).iter().map(|d| d.id))
        .collect();
    if expected.len() != cmp.unified_metrics.len() {
        violations.push(ComparisonViolation::UnifiedSizeMismatch {
            expected: expected.len(),
            actual: cmp.unified_metrics.len(),
        });
    }

    // ── Category groups ───────────────────────────────────────────────────────
    for pair in cmp.categorized_metrics.windows(2) {
        if pair[0].category >= pair[1].category {
            violations.push(ComparisonViolation::CategoryOrder {
                detail: format!("{} listed before {}", pair[0].category, pair[1].category),
            });
        }
    }
    for g in &cmp.categorized_metrics {
        if g.metrics.is_empty() {
            violations.push(ComparisonViolation::EmptyCategory { category: g.category });
        }
    }

    // ── Columns ───────────────────────────────────────────────────────────────
    for col in &cmp.columns {
        let kind = col.scenario.variant();
        for d in &cmp.unified_metrics {
            match col.value(d.id) {
                None => violations.push(ComparisonViolation::MissingCell {
                    scenario: col.scenario_id().clone(),
                    metric: d.id,
                }),
                Some(v) if !registry.defines(kind, d.id) && v != placeholder => {
                    violations.push(ComparisonViolation::PlaceholderExpected {
                        scenario: col.scenario_id().clone(),
                        metric: d.id,
                        value: v.to_string(),
                    });
                }
                Some(_) => {}
            }
            if !col.visibility.contains_key(&d.id) {
                violations.push(ComparisonViolation::VisibilityGap {
                    scenario: col.scenario_id().clone(),
                    metric: d.id,
                });
            }
        }
    }

    violations
}

/// Outcome of one randomised stress run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub seed: u64,
    pub selected: usize,
    pub kinds: usize,
    pub unified_metrics: usize,
    pub insights: usize,
    pub violations: Vec<ComparisonViolation>,
}

/// Build one random catalog from `seed`, select 2..=max scenarios through a
/// session, and check every invariant along the way.
pub fn stress_run(seed: u64, config: &ComparisonConfig, registry: &MetricRegistry) -> RunSummary {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let catalog_size = config.max_selection.max(MIN_SELECTION) * 3;
    let mut catalog = generate_catalog(catalog_size, &CatalogConfig::default(), &mut rng);
    catalog.shuffle(&mut rng);
    let take = rng.random_range(MIN_SELECTION..=config.max_selection.max(MIN_SELECTION));
    catalog.truncate(take);

    let session = ComparisonSession::new(std::sync::Arc::new(registry.clone()), config.clone());
    let mut violations = Vec::new();
    let session = match session.select(catalog) {
        Ok(s) => s,
        Err(e) => {
            tracing::warn!(seed, error = %e, "stress selection rejected");
            return RunSummary { seed, selected: take, kinds: 0, unified_metrics: 0, insights: 0, violations };
        }
    };
    let Some(cmp) = session.comparison() else {
        return RunSummary { seed, selected: take, kinds: 0, unified_metrics: 0, insights: 0, violations };
    };

    violations.extend(verify_comparison(cmp, registry, &config.format.placeholder));

    let kinds = cmp.scenario_types_present.clone();
    if unified_metrics(&kinds, registry) != cmp.unified_metrics {
        violations.push(ComparisonViolation::UnifiedSizeMismatch {
            expected: unified_metrics(&kinds, registry).len(),
            actual: cmp.unified_metrics.len(),
        });
    }

    if let Some(d) = cmp.unified_metrics.get(rng.random_range(0..cmp.unified_metrics.len().max(1))) {
        let twice = session
            .toggle_metric_visibility(d.id)
            .and_then(|s| s.toggle_metric_visibility(d.id));
        if twice.map(|s| s.columns() != session.columns()).unwrap_or(true) {
            violations.push(ComparisonViolation::VisibilityNotInvolutive { metric: d.id });
        }
    }

    let insights = session.insights();
    if !insights.iter().any(|i| i.contains("projected revenue")) {
        violations.push(ComparisonViolation::MissingRevenueInsight { scenarios: take });
    }

    RunSummary {
        seed,
        selected: take,
        kinds: kinds.len(),
        unified_metrics: cmp.unified_metrics.len(),
        insights: insights.len(),
        violations,
    }
}

/// Run `runs` stress runs in parallel, seeds counting up from `start_seed`
/// and wrapping at `u64::MAX`.
/// Results come back in seed order.
pub fn run_stress(
    start_seed: u64,
    runs: u64,
    config: &ComparisonConfig,
    registry: &MetricRegistry,
) -> Vec<RunSummary> {
    use rayon::prelude::*;

    (0..runs)
        .into_par_iter()
        .map(|i| stress_run(start_seed.wrapping_add(i), config, registry))
        .collect()
}
