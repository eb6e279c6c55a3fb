use std::collections::HashSet;
use std::sync::Arc;

use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use simcmp::comparison::{self, Comparison};
use simcmp::config::{ComparisonConfig, canonical_scenarios};
use simcmp::error::ComparisonError;
use simcmp::format::{DEFAULT_PLACEHOLDER, ValueFormat};
use simcmp::generate::{CatalogConfig, generate_catalog};
use simcmp::registry::MetricRegistry;
use simcmp::resolve::Resolver;
use simcmp::scenario::Scenario;
use simcmp::session::ComparisonSession;
use simcmp::types::{MetricId, ValueType, VariantKind};

fn selection(seed: u64, n: usize) -> Vec<Scenario> {
    let mut catalog = generate_catalog(12, &CatalogConfig::default(), &mut ChaCha20Rng::seed_from_u64(seed));
    catalog.truncate(n);
    catalog
}

fn build(selected: &[Scenario]) -> Comparison {
    let registry = MetricRegistry::canonical();
    let format = ValueFormat::default();
    comparison::build(selected, &Resolver::new(&registry, &format), &[]).unwrap()
}

fn strip_currency(s: &str) -> f64 {
    let (sign, rest) = match s.strip_prefix('-') {
        Some(rest) => (-1.0, rest),
        None => (1.0, s),
    };
    let amount: f64 = rest.trim_start_matches('$').replace(',', "").parse().unwrap();
    sign * amount
}

fn strip_percent(s: &str) -> f64 {
    s.trim_end_matches('%').parse().unwrap()
}

fn canonical(ids: &[&str]) -> Vec<Scenario> {
    let all = canonical_scenarios();
    ids.iter()
        .map(|id| all.iter().find(|s| s.id.as_str() == *id).unwrap().clone())
        .collect()
}

#[test]
fn mixed_canonical_selection_has_seventeen_metrics() {
    let cmp = build(&canonical(&["promo-spring-bogo", "price-cola-increase"]));
    assert_eq!(cmp.unified_metrics.len(), 17);
    assert_eq!(cmp.scenario_types_present, vec![VariantKind::Promo, VariantKind::Price]);
}

#[test]
fn currency_and_percentage_cells_parse_back() {
    let cmp = build(&canonical(&["promo-spring-bogo", "price-cola-increase"]));
    assert_eq!(cmp.columns[0].value(MetricId::ProjectedRevenue), Some("$285,000"));
    assert_eq!(cmp.columns[1].value(MetricId::ProfitMargin), Some("32.5%"));
    assert_eq!(strip_currency("$285,000"), 285_000.0);
}

#[test]
fn hidden_metric_survives_back_and_reselect() {
    let picks = canonical(&["promo-spring-bogo", "promo-summer-display"]);
    let session = ComparisonSession::default()
        .select(picks.clone())
        .unwrap()
        .toggle_metric_visibility(MetricId::Roi)
        .unwrap();
    let again = session.back().select(picks).unwrap();
    assert!(!again.comparison().unwrap().is_visible(MetricId::Roi));

    let fresh = session.reset().select(canonical(&["promo-spring-bogo", "promo-summer-display"])).unwrap();
    assert!(fresh.comparison().unwrap().is_visible(MetricId::Roi));
}

#[test]
fn selection_above_limit_is_rejected() {
    let session = ComparisonSession::new(Arc::new(MetricRegistry::canonical()), ComparisonConfig::canonical());
    let err = session.select(canonical_scenarios()).unwrap_err();
    assert_eq!(err, ComparisonError::SelectionLimitExceeded { selected: 6, max: 4 });
}

proptest! {
    #[test]
    fn prop_build_is_deterministic(seed in any::<u64>(), n in 2usize..=4) {
        let selected = selection(seed, n);
        prop_assert_eq!(build(&selected), build(&selected));
    }

    #[test]
    fn prop_unified_set_is_deduplicated_union(seed in any::<u64>(), n in 2usize..=4) {
        let cmp = build(&selection(seed, n));
        let ids: HashSet<MetricId> = cmp.unified_metrics.iter().map(|d| d.id).collect();
        prop_assert_eq!(ids.len(), cmp.unified_metrics.len());

        let expected = match cmp.scenario_types_present.as_slice() {
            [VariantKind::Promo] => 12,
            [VariantKind::Price] => 11,
            _ => 17,
        };
        prop_assert_eq!(cmp.unified_metrics.len(), expected);
    }

    #[test]
    fn prop_every_column_is_complete(seed in any::<u64>(), n in 2usize..=4) {
        let cmp = build(&selection(seed, n));
        prop_assert_eq!(cmp.columns.len(), n);
        for col in &cmp.columns {
            for d in &cmp.unified_metrics {
                prop_assert!(col.value(d.id).is_some(), "{} lacks {}", col.scenario.id, d.id);
                prop_assert!(col.visibility.contains_key(&d.id), "{} lacks flag {}", col.scenario.id, d.id);
            }
        }
    }

    #[test]
    fn prop_cross_kind_cells_are_placeholders(seed in any::<u64>(), n in 2usize..=4) {
        let registry = MetricRegistry::canonical();
        let cmp = build(&selection(seed, n));
        for col in &cmp.columns {
            for d in &cmp.unified_metrics {
                if !registry.defines(col.scenario.variant(), d.id) {
                    prop_assert_eq!(col.value(d.id), Some(DEFAULT_PLACEHOLDER));
                }
            }
        }
    }

    #[test]
    fn prop_projected_revenue_round_trips(seed in any::<u64>(), n in 2usize..=4) {
        let cmp = build(&selection(seed, n));
        for col in &cmp.columns {
            let cell = col.value(MetricId::ProjectedRevenue).unwrap();
            prop_assert_eq!(strip_currency(cell), col.scenario.projected_revenue);
        }
    }

    #[test]
    fn prop_currency_and_percentage_cells_round_trip(seed in any::<u64>(), n in 2usize..=4) {
        let registry = MetricRegistry::canonical();
        let format = ValueFormat::default();
        let resolver = Resolver::new(&registry, &format);
        let cmp = build(&selection(seed, n));
        for col in &cmp.columns {
            for d in &cmp.unified_metrics {
                let Some(raw) = resolver.numeric(&col.scenario, d.id) else { continue };
                let cell = col.value(d.id).unwrap();
                let (parsed, tolerance) = match d.value_type {
                    ValueType::Currency => (strip_currency(cell), 0.005),
                    ValueType::Percentage => (strip_percent(cell), 0.05),
                    _ => continue,
                };
                prop_assert!(
                    (parsed - raw).abs() <= tolerance + 1e-9 * raw.abs(),
                    "{} {}: cell {} vs {}", col.scenario.id, d.id, cell, raw
                );
            }
        }
    }

    #[test]
    fn prop_visibility_toggle_is_involutive(seed in any::<u64>(), n in 2usize..=4, pick in any::<prop::sample::Index>()) {
        let session = ComparisonSession::default().select(selection(seed, n)).unwrap();
        let metrics = &session.comparison().unwrap().unified_metrics;
        let metric = metrics[pick.index(metrics.len())].id;

        let once = session.toggle_metric_visibility(metric).unwrap();
        prop_assert!(!once.comparison().unwrap().is_visible(metric));
        prop_assert!(once.columns().iter().all(|c| !c.is_visible(metric)));

        let twice = once.toggle_metric_visibility(metric).unwrap();
        prop_assert_eq!(twice.columns(), session.columns());
    }

    #[test]
    fn prop_fewer_than_two_is_rejected(seed in any::<u64>(), n in 0usize..2) {
        let err = ComparisonSession::default().select(selection(seed, n)).unwrap_err();
        prop_assert_eq!(err, ComparisonError::InsufficientSelection { selected: n });
    }

    #[test]
    fn prop_revenue_insight_always_present(seed in any::<u64>(), n in 2usize..=4) {
        let session = ComparisonSession::default().select(selection(seed, n)).unwrap();
        let insights = session.insights();
        prop_assert!(insights.iter().any(|i| i.contains("highest projected revenue")), "{insights:?}");
    }
}
