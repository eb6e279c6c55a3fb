use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::Serialize;

use crate::error::ComparisonError;
use crate::registry::{MetricDefinition, MetricRegistry};
use crate::resolve::Resolver;
use crate::scenario::Scenario;
use crate::types::{MetricCategory, MetricId, ScenarioId, VariantKind};

/// Minimum number of scenarios a comparison needs.
pub const MIN_SELECTION: usize = 2;

/// The per-scenario slice of a comparison: one visibility flag and one
/// formatted value for every metric in the unified set.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonColumn {
    pub scenario: Scenario,
    pub visibility: BTreeMap<MetricId, bool>,
    pub values: BTreeMap<MetricId, String>,
}

impl ComparisonColumn {
    pub fn scenario_id(&self) -> &ScenarioId {
        &self.scenario.id
    }

    pub fn is_visible(&self, metric: MetricId) -> bool {
        self.visibility.get(&metric).copied().unwrap_or(false)
    }

    pub fn value(&self, metric: MetricId) -> Option<&str> {
        self.values.get(&metric).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryGroup {
    pub category: MetricCategory,
    pub metrics: Vec<MetricDefinition>,
}

/// The derived side-by-side model for one selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comparison {
    /// Distinct kinds in order of first appearance in the selection.
    pub scenario_types_present: Vec<VariantKind>,
    pub unified_metrics: Vec<MetricDefinition>,
    pub categorized_metrics: Vec<CategoryGroup>,
    pub columns: Vec<ComparisonColumn>,
}

impl Comparison {
    pub fn scenarios(&self) -> impl Iterator<Item = &Scenario> {
        self.columns.iter().map(|c| &c.scenario)
    }

    pub fn metric(&self, id: MetricId) -> Option<&MetricDefinition> {
        self.unified_metrics.iter().find(|d| d.id == id)
    }

    /// Visibility is comparison-wide; a metric counts as shown only if every
    /// column shows it.
    pub fn is_visible(&self, metric: MetricId) -> bool {
        !self.columns.is_empty() && self.columns.iter().all(|c| c.is_visible(metric))
    }

    pub fn hidden_metrics(&self) -> BTreeSet<MetricId> {
        hidden_in(&self.columns)
    }
}

/// Distinct kinds in order of first appearance.
pub fn kinds_present(selected: &[Scenario]) -> Vec<VariantKind> {
    let mut kinds = Vec::new();
    for s in selected {
        let k = s.variant();
        if !kinds.contains(&k) {
            kinds.push(k);
        }
    }
    kinds
}

/// Union of the kinds' registries, deduplicated by id. The first definition
/// seen wins, walking kinds in the given order and each kind's metrics in
/// registry order.
pub fn unified_metrics(kinds: &[VariantKind], registry: &MetricRegistry) -> Vec<MetricDefinition> {
    let mut seen: HashSet<MetricId> = HashSet::new();
    kinds
        .iter()
        .flat_map(|k| registry.metrics_for(*k).iter())
        .filter(|d| seen.insert(d.id))
        .copied()
        .collect()
}

/// Group by category in display order, dropping empty categories.
pub fn categorize(metrics: &[MetricDefinition]) -> Vec<CategoryGroup> {
    MetricCategory::DISPLAY_ORDER
        .into_iter()
        .map(|category| CategoryGroup {
            category,
            metrics: metrics.iter().filter(|d| d.category == category).copied().collect(),
        })
        .filter(|g| !g.metrics.is_empty())
        .collect()
}

fn hidden_in(columns: &[ComparisonColumn]) -> BTreeSet<MetricId> {
    columns
        .iter()
        .flat_map(|c| c.visibility.iter())
        .filter(|(_, visible)| !**visible)
        .map(|(m, _)| *m)
        .collect()
}

/// Build the comparison for `selected`.
///
/// `prior` is the column set of an earlier build; any metric hidden there
/// stays hidden, so rebuilding the same selection keeps user customisation.
/// Every column gets a value for every unified metric, with the placeholder
/// where the scenario's kind does not define it.
pub fn build(
    selected: &[Scenario],
    resolver: &Resolver<'_>,
    prior: &[ComparisonColumn],
) -> Result<Comparison, ComparisonError> {
    if selected.len() < MIN_SELECTION {
        return Err(ComparisonError::InsufficientSelection { selected: selected.len() });
    }

    let scenario_types_present = kinds_present(selected);
    let unified = unified_metrics(&scenario_types_present, resolver.registry());
    let categorized_metrics = categorize(&unified);
    let hidden = hidden_in(prior);

    let columns = selected
        .iter()
        .map(|scenario| ComparisonColumn {
            scenario: scenario.clone(),
            visibility: unified.iter().map(|d| (d.id, !hidden.contains(&d.id))).collect(),
            values: unified.iter().map(|d| (d.id, resolver.resolve_with(scenario, d))).collect(),
        })
        .collect();

    tracing::debug!(
        scenarios = selected.len(),
        kinds = scenario_types_present.len(),
        metrics = unified.len(),
        hidden = hidden.len(),
        "built comparison"
    );

    Ok(Comparison {
        scenario_types_present,
        unified_metrics: unified,
        categorized_metrics,
        columns,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::canonical_scenarios;
    use crate::format::{DEFAULT_PLACEHOLDER, ValueFormat};

    fn pick(ids: &[&str]) -> Vec<Scenario> {
        let all = canonical_scenarios();
        ids.iter()
            .map(|id| all.iter().find(|s| s.id.as_str() == *id).unwrap().clone())
            .collect()
    }

    fn mixed() -> Vec<Scenario> {
        pick(&["promo-spring-bogo", "price-cola-increase"])
    }

    #[test]
    fn fewer_than_two_is_rejected() {
        let reg = MetricRegistry::canonical();
        let fmt = ValueFormat::default();
        let r = Resolver::new(&reg, &fmt);
        assert_eq!(build(&[], &r, &[]), Err(ComparisonError::InsufficientSelection { selected: 0 }));
        let one = pick(&["promo-spring-bogo"]);
        assert_eq!(build(&one, &r, &[]), Err(ComparisonError::InsufficientSelection { selected: 1 }));
    }

    #[test]
    fn mixed_selection_unifies_seventeen_metrics() {
        let reg = MetricRegistry::canonical();
        let fmt = ValueFormat::default();
        let r = Resolver::new(&reg, &fmt);
        let cmp = build(&mixed(), &r, &[]).unwrap();
        assert_eq!(cmp.scenario_types_present, vec![VariantKind::Promo, VariantKind::Price]);
        assert_eq!(cmp.unified_metrics.len(), 17);
        let ids: HashSet<MetricId> = cmp.unified_metrics.iter().map(|d| d.id).collect();
        assert_eq!(ids.len(), 17, "unified set must not repeat an id");
    }

    #[test]
    fn same_kind_selection_uses_only_that_registry() {
        let reg = MetricRegistry::canonical();
        let fmt = ValueFormat::default();
        let r = Resolver::new(&reg, &fmt);
        let cmp = build(&pick(&["price-cola-increase", "price-chips-rollback"]), &r, &[]).unwrap();
        assert_eq!(cmp.scenario_types_present, vec![VariantKind::Price]);
        assert_eq!(cmp.unified_metrics, reg.metrics_for(VariantKind::Price));
    }

    #[test]
    fn unified_order_follows_first_kind_seen() {
        let reg = MetricRegistry::canonical();
        let fmt = ValueFormat::default();
        let r = Resolver::new(&reg, &fmt);
        let cmp = build(&pick(&["price-cola-increase", "promo-spring-bogo"]), &r, &[]).unwrap();
        assert_eq!(cmp.scenario_types_present, vec![VariantKind::Price, VariantKind::Promo]);
        let first_price_only = cmp.unified_metrics.iter().position(|d| d.id == MetricId::CurrentPrice).unwrap();
        let first_promo_only = cmp.unified_metrics.iter().position(|d| d.id == MetricId::Roi).unwrap();
        assert!(first_price_only < first_promo_only);
    }

    #[test]
    fn categories_in_display_order_without_empties() {
        let reg = MetricRegistry::canonical();
        let fmt = ValueFormat::default();
        let r = Resolver::new(&reg, &fmt);
        let cmp = build(&mixed(), &r, &[]).unwrap();
        let order: Vec<MetricCategory> = cmp.categorized_metrics.iter().map(|g| g.category).collect();
        assert_eq!(order, MetricCategory::DISPLAY_ORDER.to_vec());
        let total: usize = cmp.categorized_metrics.iter().map(|g| g.metrics.len()).sum();
        assert_eq!(total, cmp.unified_metrics.len());

        let only_ops = [MetricDefinition::new(
            MetricId::Status,
            "Status",
            crate::types::ValueType::Text,
            MetricCategory::Operational,
            None,
        )];
        let groups = categorize(&only_ops);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].category, MetricCategory::Operational);
    }

    #[test]
    fn every_column_has_every_cell() {
        let reg = MetricRegistry::canonical();
        let fmt = ValueFormat::default();
        let r = Resolver::new(&reg, &fmt);
        let cmp = build(&canonical_scenarios(), &r, &[]).unwrap();
        for col in &cmp.columns {
            for d in &cmp.unified_metrics {
                assert!(col.value(d.id).is_some(), "{} missing {}", col.scenario_id(), d.id);
                assert!(col.is_visible(d.id));
            }
        }
    }

    #[test]
    fn cross_kind_cells_are_placeholders() {
        let reg = MetricRegistry::canonical();
        let fmt = ValueFormat::default();
        let r = Resolver::new(&reg, &fmt);
        let cmp = build(&mixed(), &r, &[]).unwrap();
        let promo = &cmp.columns[0];
        let price = &cmp.columns[1];
        assert_eq!(promo.value(MetricId::Elasticity), Some(DEFAULT_PLACEHOLDER));
        assert_eq!(price.value(MetricId::Roi), Some(DEFAULT_PLACEHOLDER));
        assert_eq!(promo.value(MetricId::ProjectedRevenue), Some("$285,000"));
        assert_eq!(price.value(MetricId::ProjectedRevenue), Some("$235,000"));
    }

    #[test]
    fn rebuild_keeps_hidden_metrics() {
        let reg = MetricRegistry::canonical();
        let fmt = ValueFormat::default();
        let r = Resolver::new(&reg, &fmt);
        let mut first = build(&mixed(), &r, &[]).unwrap();
        for col in &mut first.columns {
            col.visibility.insert(MetricId::Roi, false);
        }
        let second = build(&mixed(), &r, &first.columns).unwrap();
        assert_eq!(second, first, "rebuilding the same selection must be idempotent");
        assert!(!second.is_visible(MetricId::Roi));
        assert!(second.is_visible(MetricId::ProjectedRevenue));
        assert_eq!(second.hidden_metrics(), BTreeSet::from([MetricId::Roi]));
    }

    #[test]
    fn build_is_deterministic() {
        let reg = MetricRegistry::canonical();
        let fmt = ValueFormat::default();
        let r = Resolver::new(&reg, &fmt);
        let a = build(&canonical_scenarios(), &r, &[]).unwrap();
        let b = build(&canonical_scenarios(), &r, &[]).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn builder_has_no_upper_bound() {
        let reg = MetricRegistry::canonical();
        let fmt = ValueFormat::default();
        let r = Resolver::new(&reg, &fmt);
        let mut many = canonical_scenarios();
        many.extend(canonical_scenarios());
        let cmp = build(&many, &r, &[]).unwrap();
        assert_eq!(cmp.columns.len(), 12);
    }
}
