//! Value Resolver: variant kind first, then metric id.
//!
//! Each kind has its own extraction function with an exhaustive match over
//! [`MetricId`], so a new metric or kind fails to compile until every
//! extractor has decided what it means for that kind.

use crate::format::ValueFormat;
use crate::registry::{MetricDefinition, MetricRegistry};
use crate::scenario::{PriceDetails, PromoDetails, Scenario, ScenarioKind};
use crate::types::{MetricId, ValueType};

/// A metric's unformatted value on one scenario.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricValue {
    Number(f64),
    Text(String),
    /// The kind defines the metric but this scenario has no value for it
    /// (e.g. actual revenue before completion).
    Absent,
    /// The scenario's kind does not define the metric.
    NotApplicable,
}

impl MetricValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            MetricValue::Number(v) if v.is_finite() => Some(*v),
            _ => None,
        }
    }
}

/// Fields every kind carries.
fn shared_value(s: &Scenario, metric: MetricId) -> MetricValue {
    match metric {
        MetricId::ProjectedRevenue => MetricValue::Number(s.projected_revenue),
        MetricId::ActualRevenue => s.actual_revenue.map_or(MetricValue::Absent, MetricValue::Number),
        MetricId::ProjectedUnits => MetricValue::Number(s.projected_units as f64),
        MetricId::ActualUnits => s.actual_units.map_or(MetricValue::Absent, |u| MetricValue::Number(u as f64)),
        MetricId::Status => MetricValue::Text(s.status.label().to_string()),
        MetricId::Retailer => MetricValue::Text(s.retailer.clone()),
        _ => MetricValue::NotApplicable,
    }
}

fn promo_value(s: &Scenario, p: &PromoDetails, metric: MetricId) -> MetricValue {
    match metric {
        MetricId::Roi => MetricValue::Number(p.roi),
        MetricId::Lift => MetricValue::Number(p.lift_percent),
        MetricId::Discount => MetricValue::Number(p.discount_percent),
        MetricId::Duration => p.duration_days().map_or(MetricValue::Absent, |d| MetricValue::Number(d as f64)),
        MetricId::PromoSpend => MetricValue::Number(p.promo_spend),
        MetricId::IncrementalRevenue => MetricValue::Number(p.incremental_revenue),
        MetricId::ProjectedRevenue
        | MetricId::ActualRevenue
        | MetricId::ProjectedUnits
        | MetricId::ActualUnits
        | MetricId::Status
        | MetricId::Retailer => shared_value(s, metric),
        MetricId::CurrentPrice
        | MetricId::NewPrice
        | MetricId::PriceChange
        | MetricId::Elasticity
        | MetricId::ProfitMargin => MetricValue::NotApplicable,
    }
}

fn price_value(s: &Scenario, p: &PriceDetails, metric: MetricId) -> MetricValue {
    match metric {
        MetricId::CurrentPrice => MetricValue::Number(p.current_price),
        MetricId::NewPrice => MetricValue::Number(p.new_price),
        MetricId::PriceChange => MetricValue::Number(p.price_change_percent()),
        MetricId::Elasticity => MetricValue::Number(p.elasticity),
        MetricId::ProfitMargin => MetricValue::Number(p.profit_margin),
        MetricId::ProjectedRevenue
        | MetricId::ActualRevenue
        | MetricId::ProjectedUnits
        | MetricId::ActualUnits
        | MetricId::Status
        | MetricId::Retailer => shared_value(s, metric),
        MetricId::Roi
        | MetricId::Lift
        | MetricId::Discount
        | MetricId::Duration
        | MetricId::PromoSpend
        | MetricId::IncrementalRevenue => MetricValue::NotApplicable,
    }
}

/// Raw value of `metric` on `scenario`, ignoring the registry.
pub fn resolve_value(scenario: &Scenario, metric: MetricId) -> MetricValue {
    match &scenario.kind {
        ScenarioKind::Promo(p) => promo_value(scenario, p, metric),
        ScenarioKind::Price(p) => price_value(scenario, p, metric),
    }
}

/// Resolves metrics against scenarios through a registry and a display format.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    registry: &'a MetricRegistry,
    format: &'a ValueFormat,
}

impl<'a> Resolver<'a> {
    pub fn new(registry: &'a MetricRegistry, format: &'a ValueFormat) -> Self {
        Resolver { registry, format }
    }

    pub fn registry(&self) -> &'a MetricRegistry {
        self.registry
    }

    pub fn format(&self) -> &'a ValueFormat {
        self.format
    }

    /// Value of `metric` on `scenario`, `NotApplicable` whenever the
    /// scenario's kind does not register the metric.
    pub fn value(&self, scenario: &Scenario, metric: MetricId) -> MetricValue {
        if !self.registry.defines(scenario.variant(), metric) {
            return MetricValue::NotApplicable;
        }
        resolve_value(scenario, metric)
    }

    /// Formatted display string. Never fails: inapplicable metrics, absent
    /// optional fields and non-finite numbers all render as the placeholder.
    pub fn resolve(&self, scenario: &Scenario, metric: MetricId) -> String {
        match self.registry.definition(metric) {
            Some(def) => self.resolve_with(scenario, def),
            None => self.format.placeholder(),
        }
    }

    pub fn resolve_with(&self, scenario: &Scenario, def: &MetricDefinition) -> String {
        match self.value(scenario, def.id) {
            MetricValue::Number(v) => self.format.number(v, def.value_type),
            MetricValue::Text(t) => t,
            MetricValue::Absent => self.format.placeholder(),
            MetricValue::NotApplicable => {
                tracing::trace!(
                    scenario = %scenario.id,
                    kind = %scenario.variant(),
                    metric = %def.id,
                    "metric not defined for kind, using placeholder"
                );
                self.format.placeholder()
            }
        }
    }

    /// Numeric value for ranking; `None` for text, missing or inapplicable.
    pub fn numeric(&self, scenario: &Scenario, metric: MetricId) -> Option<f64> {
        let def = self.registry.definition(metric)?;
        if def.value_type == ValueType::Text {
            return None;
        }
        self.value(scenario, metric).as_number()
    }
}
