//! Derived natural-language statements about a selection.
//!
//! Insights are recomputed on every read and never stored. Each rule adds at
//! most one sentence:
//!
//! 1. leader on each configured ranking metric that every present kind
//!    defines;
//! 2. leader on the kind's headline metric, only when every selected
//!    scenario is of the same kind;
//! 3. kind with the higher mean projected revenue, when several kinds are
//!    present and their means differ.
//!
//! Ties always go to the scenario (or kind) that comes first in selection
//! order.

use crate::comparison::{MIN_SELECTION, kinds_present};
use crate::registry::MetricDefinition;
use crate::resolve::Resolver;
use crate::scenario::Scenario;
use crate::types::{MetricId, ValueType, VariantKind};

/// Scenario that ranks best on `metric`, with its value.
///
/// Uses the metric's `higher_is_better` sense. Scenarios without a numeric
/// value are skipped. `None` for unrankable metrics or when no scenario has
/// a value.
pub fn best_by<'s>(
    scenarios: &'s [Scenario],
    metric: MetricId,
    resolver: &Resolver<'_>,
) -> Option<(&'s Scenario, f64)> {
    let def = resolver.registry().definition(metric)?;
    let higher = def.higher_is_better?;
    let mut best: Option<(&Scenario, f64)> = None;
    for s in scenarios {
        let Some(v) = resolver.numeric(s, metric) else { continue };
        let better = match best {
            None => true,
            Some((_, b)) if higher => v > b,
            Some((_, b)) => v < b,
        };
        if better {
            best = Some((s, v));
        }
    }
    best
}

fn ranking_sentence(def: &MetricDefinition, name: &str, value: &str) -> String {
    match def.id {
        MetricId::ProjectedRevenue => {
            format!("{name} generates the highest projected revenue of {value}")
        }
        MetricId::ProjectedUnits => {
            format!("{name} projects the highest unit volume at {value} units")
        }
        _ => {
            let extreme = if def.higher_is_better == Some(false) { "lowest" } else { "highest" };
            format!("{name} has the {extreme} {} at {value}", def.label.to_lowercase())
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn mean_projected_revenue(selected: &[Scenario], kind: VariantKind) -> Option<f64> {
    let values: Vec<f64> = selected
        .iter()
        .filter(|s| s.variant() == kind)
        .map(|s| s.projected_revenue)
        .filter(|v| v.is_finite())
        .collect();
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Ordered insight sentences for `selected`. Empty below two scenarios.
pub fn derive_insights(
    selected: &[Scenario],
    resolver: &Resolver<'_>,
    ranking_metrics: &[MetricId],
) -> Vec<String> {
    if selected.len() < MIN_SELECTION {
        return Vec::new();
    }
    let registry = resolver.registry();
    let format = resolver.format();
    let mut insights = Vec::new();
    let kinds = kinds_present(selected);

    // ── Cross-kind leaders ────────────────────────────────────────────────────
    for &metric in ranking_metrics {
        // Only metrics every present kind defines are ranked across kinds.
        if !kinds.iter().all(|k| registry.defines(*k, metric)) {
            continue;
        }
        let Some(def) = registry.definition(metric) else { continue };
        if let Some((s, v)) = best_by(selected, metric, resolver) {
            insights.push(ranking_sentence(def, &s.name, &format.number(v, def.value_type)));
        }
    }

    // ── Same-kind headline ────────────────────────────────────────────────────
    if let [kind] = kinds.as_slice() {
        if let Some(metric) = registry.headline_for(*kind) {
            if let (Some(def), Some((s, v))) =
                (registry.definition(metric), best_by(selected, metric, resolver))
            {
                insights.push(format!(
                    "{} delivers the best {} among {} scenarios at {}",
                    s.name,
                    def.label,
                    kind.display_name(),
                    format.number(v, def.value_type)
                ));
            }
        }
    }

    // ── Kind averages ─────────────────────────────────────────────────────────
    if kinds.len() >= 2 {
        let mut averages: Vec<(VariantKind, f64)> = kinds
            .iter()
            .filter_map(|k| mean_projected_revenue(selected, *k).map(|m| (*k, m)))
            .collect();
        // Stable sort keeps selection order among equal means.
        averages.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        if let [(top, top_mean), (next, next_mean), ..] = averages.as_slice()
            && top_mean > next_mean
        {
            insights.push(format!(
                "{} scenarios show a higher average projected revenue ({}) than {} scenarios ({})",
                capitalize(top.display_name()),
                format.number(*top_mean, ValueType::Currency),
                next.display_name(),
                format.number(*next_mean, ValueType::Currency),
            ));
        }
    }

    tracing::debug!(count = insights.len(), "derived insights");
    insights
}
