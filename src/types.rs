use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScenarioId(pub String);

impl ScenarioId {
    pub fn new(id: impl Into<String>) -> Self {
        ScenarioId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The closed set of scenario kinds. Declaration order is the order kinds
/// are reported in when several are present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VariantKind {
    Promo,
    Price,
}

impl VariantKind {
    pub const ALL: [VariantKind; 2] = [VariantKind::Promo, VariantKind::Price];

    pub fn as_str(self) -> &'static str {
        match self {
            VariantKind::Promo => "promo",
            VariantKind::Price => "price",
        }
    }

    /// Noun used in generated sentences ("promotion scenarios").
    pub fn display_name(self) -> &'static str {
        match self {
            VariantKind::Promo => "promotion",
            VariantKind::Price => "price change",
        }
    }
}

impl fmt::Display for VariantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every metric any variant kind can expose. A metric that denotes the same
/// concept on several kinds is one variant here, which is what makes
/// cross-kind deduplication a plain equality check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MetricId {
    // Shared
    ProjectedRevenue,
    ActualRevenue,
    ProjectedUnits,
    ActualUnits,
    Status,
    Retailer,
    // Promo
    Roi,
    Lift,
    Discount,
    Duration,
    PromoSpend,
    IncrementalRevenue,
    // Price
    CurrentPrice,
    NewPrice,
    PriceChange,
    Elasticity,
    ProfitMargin,
}

impl MetricId {
    pub const ALL: [MetricId; 17] = [
        MetricId::ProjectedRevenue,
        MetricId::ActualRevenue,
        MetricId::ProjectedUnits,
        MetricId::ActualUnits,
        MetricId::Status,
        MetricId::Retailer,
        MetricId::Roi,
        MetricId::Lift,
        MetricId::Discount,
        MetricId::Duration,
        MetricId::PromoSpend,
        MetricId::IncrementalRevenue,
        MetricId::CurrentPrice,
        MetricId::NewPrice,
        MetricId::PriceChange,
        MetricId::Elasticity,
        MetricId::ProfitMargin,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MetricId::ProjectedRevenue => "projectedRevenue",
            MetricId::ActualRevenue => "actualRevenue",
            MetricId::ProjectedUnits => "projectedUnits",
            MetricId::ActualUnits => "actualUnits",
            MetricId::Status => "status",
            MetricId::Retailer => "retailer",
            MetricId::Roi => "roi",
            MetricId::Lift => "lift",
            MetricId::Discount => "discount",
            MetricId::Duration => "duration",
            MetricId::PromoSpend => "promoSpend",
            MetricId::IncrementalRevenue => "incrementalRevenue",
            MetricId::CurrentPrice => "currentPrice",
            MetricId::NewPrice => "newPrice",
            MetricId::PriceChange => "priceChange",
            MetricId::Elasticity => "elasticity",
            MetricId::ProfitMargin => "profitMargin",
        }
    }
}

impl fmt::Display for MetricId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MetricId::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| format!("unknown metric id '{s}'"))
    }
}

/// Semantic value type; selects the formatting rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValueType {
    Currency,
    Percentage,
    Count,
    Text,
    Ratio,
}

impl ValueType {
    /// Whether values of this type may be ranked against each other.
    pub fn is_numeric(self) -> bool {
        !matches!(self, ValueType::Text)
    }
}

/// Display categories. Declaration order is the fixed display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MetricCategory {
    Performance,
    Financial,
    Operational,
}

impl MetricCategory {
    pub const DISPLAY_ORDER: [MetricCategory; 3] = [
        MetricCategory::Performance,
        MetricCategory::Financial,
        MetricCategory::Operational,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MetricCategory::Performance => "performance",
            MetricCategory::Financial => "financial",
            MetricCategory::Operational => "operational",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MetricCategory::Performance => "Performance",
            MetricCategory::Financial => "Financial",
            MetricCategory::Operational => "Operational",
        }
    }
}

impl fmt::Display for MetricCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MetricCategory::DISPLAY_ORDER
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown category '{s}'"))
    }
}
