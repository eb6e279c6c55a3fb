use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::{ScenarioId, VariantKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScenarioStatus {
    Draft,
    Active,
    Completed,
    Archived,
}

impl ScenarioStatus {
    pub fn label(self) -> &'static str {
        match self {
            ScenarioStatus::Draft => "Draft",
            ScenarioStatus::Active => "Active",
            ScenarioStatus::Completed => "Completed",
            ScenarioStatus::Archived => "Archived",
        }
    }
}

impl fmt::Display for ScenarioStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Promotion mechanic. Informational only; no metric ranks on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PromoMechanic {
    PercentOff,
    Bogo,
    Display,
    Feature,
}

/// Fields carried only by promotional-event scenarios.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromoDetails {
    pub mechanic: PromoMechanic,
    /// Shelf discount in percent (25.0 = 25%).
    pub discount_percent: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub promo_spend: f64,
    /// Return per unit of spend (2.4 = 2.4x).
    pub roi: f64,
    /// Volume uplift over baseline in percent.
    pub lift_percent: f64,
    pub incremental_revenue: f64,
}

impl PromoDetails {
    /// Promotion length in days, counting both the first and last day.
    /// `None` when the end precedes the start.
    pub fn duration_days(&self) -> Option<u64> {
        let days = (self.end_date - self.start_date).num_days();
        (days >= 0).then(|| days as u64 + 1)
    }
}

/// Fields carried only by price-change scenarios.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceDetails {
    pub current_price: f64,
    pub new_price: f64,
    pub effective_date: NaiveDate,
    /// Price elasticity of demand (typically negative).
    pub elasticity: f64,
    /// Projected margin after the change, in percent.
    pub profit_margin: f64,
}

impl PriceDetails {
    /// Relative change from current to new price, in percent.
    pub fn price_change_percent(&self) -> f64 {
        (self.new_price - self.current_price) / self.current_price * 100.0
    }
}

/// Variant-specific payload. The `variantKind` tag in serialized form selects
/// exactly one field set, so a scenario can never mix two.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "variantKind", rename_all = "camelCase")]
pub enum ScenarioKind {
    Promo(PromoDetails),
    Price(PriceDetails),
}

impl ScenarioKind {
    pub fn variant(&self) -> VariantKind {
        match self {
            ScenarioKind::Promo(_) => VariantKind::Promo,
            ScenarioKind::Price(_) => VariantKind::Price,
        }
    }
}

/// One simulated business case as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub id: ScenarioId,
    pub name: String,
    pub brand: String,
    pub retailer: String,
    pub product: String,
    pub status: ScenarioStatus,
    pub projected_revenue: f64,
    pub projected_units: u64,
    /// Only known once the scenario has run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_revenue: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_units: Option<u64>,
    pub created_date: NaiveDate,
    #[serde(flatten)]
    pub kind: ScenarioKind,
}

impl Scenario {
    pub fn variant(&self) -> VariantKind {
        self.kind.variant()
    }
}
