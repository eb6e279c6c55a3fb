use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;

use crate::error::ConfigError;
use crate::format::ValueFormat;
use crate::scenario::{
    PriceDetails, PromoDetails, PromoMechanic, Scenario, ScenarioKind, ScenarioStatus,
};
use crate::types::{MetricId, ScenarioId};

/// Engine settings. Everything has a default so a config file only needs
/// the fields it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ComparisonConfig {
    /// Upper bound on a selection, enforced by the session only.
    pub max_selection: usize,
    #[serde(flatten)]
    pub format: ValueFormat,
    /// Metrics ranked across every selected scenario regardless of kind, in
    /// the order their insights are emitted.
    pub ranking_metrics: Vec<MetricId>,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self::canonical()
    }
}

impl ComparisonConfig {
    pub fn canonical() -> Self {
        ComparisonConfig {
            max_selection: 4,
            format: ValueFormat::default(),
            ranking_metrics: vec![MetricId::ProjectedRevenue, MetricId::ProjectedUnits],
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        read_json(path.as_ref())
    }
}

/// Read a JSON array of scenarios.
pub fn load_scenarios(path: impl AsRef<Path>) -> Result<Vec<Scenario>, ConfigError> {
    read_json(path.as_ref())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| ConfigError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

/// Staged scenario set used when no input file is given.
pub fn canonical_scenarios() -> Vec<Scenario> {
    vec![
        // ── Promotions ────────────────────────────────────────────────────────
        Scenario {
            id: ScenarioId::new("promo-spring-bogo"),
            name: "Spring BOGO Event".to_string(),
            brand: "Fizzco".to_string(),
            retailer: "MegaMart".to_string(),
            product: "Cola 12pk".to_string(),
            status: ScenarioStatus::Completed,
            projected_revenue: 285_000.0,
            projected_units: 48_000,
            actual_revenue: Some(301_450.0),
            actual_units: Some(50_210),
            created_date: date(2024, 1, 15),
            kind: ScenarioKind::Promo(PromoDetails {
                mechanic: PromoMechanic::Bogo,
                discount_percent: 50.0,
                start_date: date(2024, 3, 1),
                end_date: date(2024, 3, 14),
                promo_spend: 62_000.0,
                roi: 2.4,
                lift_percent: 34.5,
                incremental_revenue: 74_500.0,
            }),
        },
        Scenario {
            id: ScenarioId::new("promo-summer-display"),
            name: "Summer End-Cap Display".to_string(),
            brand: "Fizzco".to_string(),
            retailer: "ValueFoods".to_string(),
            product: "Lemon Soda 6pk".to_string(),
            status: ScenarioStatus::Active,
            projected_revenue: 142_500.0,
            projected_units: 31_000,
            actual_revenue: None,
            actual_units: None,
            created_date: date(2024, 4, 2),
            kind: ScenarioKind::Promo(PromoDetails {
                mechanic: PromoMechanic::Display,
                discount_percent: 10.0,
                start_date: date(2024, 6, 1),
                end_date: date(2024, 6, 28),
                promo_spend: 18_500.0,
                roi: 3.1,
                lift_percent: 21.0,
                incremental_revenue: 38_200.0,
            }),
        },
        Scenario {
            id: ScenarioId::new("promo-holiday-feature"),
            name: "Holiday Circular Feature".to_string(),
            brand: "Crunchy Co".to_string(),
            retailer: "MegaMart".to_string(),
            product: "Kettle Chips 200g".to_string(),
            status: ScenarioStatus::Draft,
            projected_revenue: 198_000.0,
            projected_units: 66_000,
            actual_revenue: None,
            actual_units: None,
            created_date: date(2024, 8, 20),
            kind: ScenarioKind::Promo(PromoDetails {
                mechanic: PromoMechanic::Feature,
                discount_percent: 25.0,
                start_date: date(2024, 12, 1),
                end_date: date(2024, 12, 24),
                promo_spend: 45_000.0,
                roi: 1.8,
                lift_percent: 27.5,
                incremental_revenue: 52_750.0,
            }),
        },
        // ── Price changes ─────────────────────────────────────────────────────
        Scenario {
            id: ScenarioId::new("price-cola-increase"),
            name: "Cola List Price Increase".to_string(),
            brand: "Fizzco".to_string(),
            retailer: "MegaMart".to_string(),
            product: "Cola 12pk".to_string(),
            status: ScenarioStatus::Active,
            projected_revenue: 235_000.0,
            projected_units: 39_500,
            actual_revenue: None,
            actual_units: None,
            created_date: date(2024, 2, 10),
            kind: ScenarioKind::Price(PriceDetails {
                current_price: 5.49,
                new_price: 5.99,
                effective_date: date(2024, 4, 1),
                elasticity: -1.2,
                profit_margin: 32.5,
            }),
        },
        Scenario {
            id: ScenarioId::new("price-chips-rollback"),
            name: "Chips Everyday Low Price".to_string(),
            brand: "Crunchy Co".to_string(),
            retailer: "ValueFoods".to_string(),
            product: "Kettle Chips 200g".to_string(),
            status: ScenarioStatus::Completed,
            projected_revenue: 176_250.0,
            projected_units: 61_200,
            actual_revenue: Some(169_900.75),
            actual_units: Some(58_940),
            created_date: date(2024, 3, 5),
            kind: ScenarioKind::Price(PriceDetails {
                current_price: 3.29,
                new_price: 2.99,
                effective_date: date(2024, 5, 1),
                elasticity: -1.8,
                profit_margin: 24.0,
            }),
        },
        Scenario {
            id: ScenarioId::new("price-soda-premium"),
            name: "Lemon Soda Premium Tier".to_string(),
            brand: "Fizzco".to_string(),
            retailer: "CornerShop".to_string(),
            product: "Lemon Soda 6pk".to_string(),
            status: ScenarioStatus::Draft,
            projected_revenue: 121_800.0,
            projected_units: 22_400,
            actual_revenue: None,
            actual_units: None,
            created_date: date(2024, 7, 12),
            kind: ScenarioKind::Price(PriceDetails {
                current_price: 4.49,
                new_price: 4.99,
                effective_date: date(2024, 9, 1),
                elasticity: -0.7,
                profit_margin: 38.0,
            }),
        },
    ]
}
