use chrono::{Days, NaiveDate};
use rand::Rng;
use rand_distr::{Distribution, LogNormal};

use crate::scenario::{
    PriceDetails, PromoDetails, PromoMechanic, Scenario, ScenarioKind, ScenarioStatus,
};
use crate::types::ScenarioId;

const BRANDS: [&str; 4] = ["Fizzco", "Crunchy Co", "Daybreak", "Northfield"];
const RETAILERS: [&str; 4] = ["MegaMart", "ValueFoods", "CornerShop", "FreshWay"];
const PRODUCTS: [&str; 5] = ["Cola 12pk", "Lemon Soda 6pk", "Kettle Chips 200g", "Granola 500g", "Oat Milk 1L"];
const MECHANICS: [PromoMechanic; 4] =
    [PromoMechanic::PercentOff, PromoMechanic::Bogo, PromoMechanic::Display, PromoMechanic::Feature];

/// Shape of a generated scenario catalog.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Probability a generated scenario is a promotion rather than a price change.
    pub promo_share: f64,
    /// ln-space parameters of projected revenue.
    /// E[revenue] = exp(mu + sigma²/2).
    pub revenue_mu: f64,
    pub revenue_sigma: f64,
    /// Probability a scenario has completed and carries actuals.
    pub completed_share: f64,
    pub base_date: NaiveDate,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        CatalogConfig {
            promo_share: 0.5,
            revenue_mu: 12.0, // ~ $160k median
            revenue_sigma: 0.5,
            completed_share: 0.3,
            base_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
        }
    }
}

fn pick<'a, T>(items: &'a [T], rng: &mut impl Rng) -> &'a T {
    &items[rng.random_range(0..items.len())]
}

fn round_cents(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn round_tenths(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Generate `n` scenarios with ids `gen-0000`, `gen-0001`, …
pub fn generate_catalog(n: usize, config: &CatalogConfig, rng: &mut impl Rng) -> Vec<Scenario> {
    let revenue = LogNormal::new(config.revenue_mu, config.revenue_sigma).expect("invalid LogNormal params");

    (0..n)
        .map(|i| {
            let projected_revenue = revenue.sample(rng).round();
            let unit_price: f64 = rng.random_range(2.0..8.0);
            let projected_units = (projected_revenue / unit_price).round() as u64;
            let completed = rng.random_bool(config.completed_share);
            let (status, actual_revenue, actual_units) = if completed {
                let realised: f64 = rng.random_range(0.85..1.15);
                (
                    ScenarioStatus::Completed,
                    Some(round_cents(projected_revenue * realised)),
                    Some((projected_units as f64 * realised).round() as u64),
                )
            } else {
                let status = *pick(&[ScenarioStatus::Draft, ScenarioStatus::Active, ScenarioStatus::Archived], rng);
                (status, None, None)
            };
            let created_date = config
                .base_date
                .checked_add_days(Days::new(rng.random_range(0..180)))
                .unwrap_or(config.base_date);

            let kind = if rng.random_bool(config.promo_share) {
                let start_date = created_date
                    .checked_add_days(Days::new(rng.random_range(14..90)))
                    .unwrap_or(created_date);
                let end_date = start_date
                    .checked_add_days(Days::new(rng.random_range(6..42)))
                    .unwrap_or(start_date);
                let promo_spend = round_cents(projected_revenue * rng.random_range(0.05..0.25));
                let roi = round_tenths(rng.random_range(0.6..4.0));
                ScenarioKind::Promo(PromoDetails {
                    mechanic: *pick(&MECHANICS, rng),
                    discount_percent: (rng.random_range(1..=10) * 5) as f64,
                    start_date,
                    end_date,
                    promo_spend,
                    roi,
                    lift_percent: round_tenths(rng.random_range(2.0..45.0)),
                    incremental_revenue: round_cents(promo_spend * roi),
                })
            } else {
                let current_price = round_cents(unit_price);
                let change: f64 = rng.random_range(-0.15..0.15);
                ScenarioKind::Price(PriceDetails {
                    current_price,
                    new_price: round_cents(current_price * (1.0 + change)),
                    effective_date: created_date
                        .checked_add_days(Days::new(rng.random_range(14..60)))
                        .unwrap_or(created_date),
                    elasticity: round_tenths(rng.random_range(-2.5..-0.3)),
                    profit_margin: round_tenths(rng.random_range(12.0..45.0)),
                })
            };

            Scenario {
                id: ScenarioId(format!("gen-{i:04}")),
                name: format!("{} {} #{i}", pick(&PRODUCTS, rng), if matches!(kind, ScenarioKind::Promo(_)) { "Promo" } else { "Reprice" }),
                brand: pick(&BRANDS, rng).to_string(),
                retailer: pick(&RETAILERS, rng).to_string(),
                product: pick(&PRODUCTS, rng).to_string(),
                status,
                projected_revenue,
                projected_units,
                actual_revenue,
                actual_units,
                created_date,
                kind,
            }
        })
        .collect()
}
