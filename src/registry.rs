use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::error::RegistryInconsistency;
use crate::types::{MetricCategory, MetricId, ValueType, VariantKind};

/// A displayable, typed, categorised quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricDefinition {
    pub id: MetricId,
    pub label: &'static str,
    pub value_type: ValueType,
    pub category: MetricCategory,
    /// `None` when the metric is not rankable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub higher_is_better: Option<bool>,
}

impl MetricDefinition {
    pub const fn new(
        id: MetricId,
        label: &'static str,
        value_type: ValueType,
        category: MetricCategory,
        higher_is_better: Option<bool>,
    ) -> Self {
        MetricDefinition { id, label, value_type, category, higher_is_better }
    }

    pub fn is_rankable(&self) -> bool {
        self.higher_is_better.is_some() && self.value_type.is_numeric()
    }
}

/// One kind's ordered metric list plus the metric its same-kind insight
/// ranks on.
#[derive(Debug, Clone)]
pub struct KindMetrics {
    pub kind: VariantKind,
    pub metrics: Vec<MetricDefinition>,
    pub headline: Option<MetricId>,
}

/// Per-kind metric lists, checked once at construction.
#[derive(Debug, Clone)]
pub struct MetricRegistry {
    kinds: BTreeMap<VariantKind, KindMetrics>,
}

impl MetricRegistry {
    /// Validate and assemble a registry.
    ///
    /// Every kind must be registered, ids must be unique within a kind, a
    /// shared id must agree on value type and category across kinds, and a
    /// headline metric must be a rankable member of its own kind.
    pub fn new(entries: Vec<KindMetrics>) -> Result<Self, RegistryInconsistency> {
        let mut seen: HashMap<MetricId, (VariantKind, MetricDefinition)> = HashMap::new();
        let mut kinds = BTreeMap::new();

        for entry in entries {
            let mut own: HashMap<MetricId, MetricDefinition> = HashMap::new();
            for def in &entry.metrics {
                if own.insert(def.id, *def).is_some() {
                    return Err(RegistryInconsistency::DuplicateWithinKind {
                        kind: entry.kind,
                        metric: def.id,
                    });
                }
                match seen.get(&def.id) {
                    Some((first_kind, first))
                        if first.value_type != def.value_type || first.category != def.category =>
                    {
                        return Err(RegistryInconsistency::SharedDefinitionMismatch {
                            metric: def.id,
                            first_kind: *first_kind,
                            first_type: first.value_type,
                            first_category: first.category,
                            second_kind: entry.kind,
                            second_type: def.value_type,
                            second_category: def.category,
                        });
                    }
                    Some(_) => {}
                    None => {
                        seen.insert(def.id, (entry.kind, *def));
                    }
                }
            }
            if let Some(headline) = entry.headline {
                if !own.get(&headline).is_some_and(MetricDefinition::is_rankable) {
                    return Err(RegistryInconsistency::HeadlineNotRankable {
                        kind: entry.kind,
                        metric: headline,
                    });
                }
            }
            kinds.insert(entry.kind, entry);
        }

        if let Some(missing) = VariantKind::ALL.into_iter().find(|k| !kinds.contains_key(k)) {
            return Err(RegistryInconsistency::MissingKind(missing));
        }

        Ok(MetricRegistry { kinds })
    }

    /// The registry for the two observed scenario kinds.
    pub fn canonical() -> Self {
        use MetricCategory::{Financial, Operational, Performance};
        use ValueType::{Count, Currency, Percentage, Ratio, Text};

        let shared = [
            MetricDefinition::new(MetricId::ProjectedRevenue, "Projected Revenue", Currency, Performance, Some(true)),
            MetricDefinition::new(MetricId::ActualRevenue, "Actual Revenue", Currency, Performance, Some(true)),
            MetricDefinition::new(MetricId::ProjectedUnits, "Projected Units", Count, Performance, Some(true)),
            MetricDefinition::new(MetricId::ActualUnits, "Actual Units", Count, Performance, Some(true)),
            MetricDefinition::new(MetricId::Status, "Status", Text, Operational, None),
            MetricDefinition::new(MetricId::Retailer, "Retailer", Text, Operational, None),
        ];

        let mut promo = shared.to_vec();
        promo.extend([
            MetricDefinition::new(MetricId::Roi, "ROI", Ratio, Financial, Some(true)),
            MetricDefinition::new(MetricId::Lift, "Volume Lift", Percentage, Performance, Some(true)),
            MetricDefinition::new(MetricId::Discount, "Discount", Percentage, Operational, None),
            MetricDefinition::new(MetricId::Duration, "Duration (days)", Count, Operational, None),
            MetricDefinition::new(MetricId::PromoSpend, "Promo Spend", Currency, Financial, Some(false)),
            MetricDefinition::new(MetricId::IncrementalRevenue, "Incremental Revenue", Currency, Financial, Some(true)),
        ]);

        let mut price = shared.to_vec();
        price.extend([
            MetricDefinition::new(MetricId::CurrentPrice, "Current Price", Currency, Financial, None),
            MetricDefinition::new(MetricId::NewPrice, "New Price", Currency, Financial, None),
            MetricDefinition::new(MetricId::PriceChange, "Price Change", Percentage, Financial, None),
            MetricDefinition::new(MetricId::Elasticity, "Price Elasticity", Ratio, Performance, None),
            MetricDefinition::new(MetricId::ProfitMargin, "Profit Margin", Percentage, Financial, Some(true)),
        ]);

        MetricRegistry::new(vec![
            KindMetrics { kind: VariantKind::Promo, metrics: promo, headline: Some(MetricId::Roi) },
            KindMetrics { kind: VariantKind::Price, metrics: price, headline: Some(MetricId::ProfitMargin) },
        ])
        .expect("canonical metric registry is consistent")
    }

    /// Ordered metric definitions for one kind.
    pub fn metrics_for(&self, kind: VariantKind) -> &[MetricDefinition] {
        self.kinds.get(&kind).map(|k| k.metrics.as_slice()).unwrap_or(&[])
    }

    pub fn headline_for(&self, kind: VariantKind) -> Option<MetricId> {
        self.kinds.get(&kind).and_then(|k| k.headline)
    }

    pub fn defines(&self, kind: VariantKind, metric: MetricId) -> bool {
        self.metrics_for(kind).iter().any(|d| d.id == metric)
    }

    /// First definition of `metric` in kind declaration order.
    pub fn definition(&self, metric: MetricId) -> Option<&MetricDefinition> {
        self.kinds.values().flat_map(|k| k.metrics.iter()).find(|d| d.id == metric)
    }
}
