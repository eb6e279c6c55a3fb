use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use simcmp::generate::{CatalogConfig, generate_catalog};
use simcmp::scenario::Scenario;
use simcmp::types::VariantKind;

pub struct Workload {
    pub catalog: usize,
    pub promo_share: f64,
}

pub const MIXED: Workload = Workload { catalog: 64, promo_share: 0.5 };

pub const PROMO_ONLY: Workload = Workload { catalog: 64, promo_share: 1.0 };

pub fn make_catalog(workload: &Workload, seed: u64) -> Vec<Scenario> {
    let config = CatalogConfig { promo_share: workload.promo_share, ..CatalogConfig::default() };
    generate_catalog(workload.catalog, &config, &mut ChaCha20Rng::seed_from_u64(seed))
}

/// First `n` scenarios, alternating kinds when both are available.
pub fn make_selection(catalog: &[Scenario], n: usize) -> Vec<Scenario> {
    let mut promos = catalog.iter().filter(|s| s.variant() == VariantKind::Promo);
    let mut prices = catalog.iter().filter(|s| s.variant() == VariantKind::Price);
    let mut out = Vec::with_capacity(n);
    while out.len() < n {
        let next = if out.len() % 2 == 0 {
            promos.next().or_else(|| prices.next())
        } else {
            prices.next().or_else(|| promos.next())
        };
        match next {
            Some(s) => out.push(s.clone()),
            None => break,
        }
    }
    out
}
