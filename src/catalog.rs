use std::collections::HashSet;

use chrono::NaiveDate;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::config::{SynthConfig, CATEGORIES};
use crate::error::SynthError;
use crate::{faker, round_to};

/// How far back `date_added` may go from the reference date.
const CATALOG_HISTORY_DAYS: u64 = 365;

#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub product_id: String,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub location: String,
    pub tag_id: String,
    pub date_added: NaiveDate,
}

/// Builds the fixed product population for one run.
pub struct CatalogGenerator<'a> {
    config: &'a SynthConfig,
    locations: Vec<String>,
    reference_date: NaiveDate,
}

impl<'a> CatalogGenerator<'a> {
    pub fn new(config: &'a SynthConfig, reference_date: NaiveDate) -> Result<Self, SynthError> {
        config.validate()?;
        Ok(Self {
            config,
            locations: config.location_labels(),
            reference_date,
        })
    }

    /// Generate exactly `num_products` products with unique ids and tags.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<Product> {
        let n = self.config.num_products;
        let width = product_id_width(n);
        let price = self.config.price_range;
        let mut seen_tags: HashSet<String> = HashSet::with_capacity(n);
        let mut products = Vec::with_capacity(n);

        for i in 0..n {
            let name = faker::product_name(rng);
            let category = CATEGORIES
                .choose(rng)
                .map(|c| c.to_string())
                .unwrap_or_default();
            let price = round_to(rng.gen_range(price.min..=price.max), 2);
            let location = self
                .locations
                .choose(rng)
                .cloned()
                .unwrap_or_default();

            let mut tag_id = faker::tag_id(rng);
            while !seen_tags.insert(tag_id.clone()) {
                debug!(tag_id = %tag_id, "tag id collision, redrawing");
                tag_id = faker::tag_id(rng);
            }

            products.push(Product {
                product_id: format!("PROD_{i:0width$}"),
                name,
                category,
                price,
                location,
                tag_id,
                date_added: faker::date_between(rng, self.reference_date, CATALOG_HISTORY_DAYS),
            });
        }

        products
    }
}

/// Zero-pad to four digits, or wider when the population needs it.
fn product_id_width(n: usize) -> usize {
    let largest = n.saturating_sub(1);
    largest.to_string().len().max(4)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{HourWindow, ValueRange};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn reference() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn generate(config: &SynthConfig, seed: u64) -> Vec<Product> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        CatalogGenerator::new(config, reference())
            .unwrap()
            .generate(&mut rng)
    }

    #[test]
    fn produces_requested_population_with_unique_ids() {
        let config = SynthConfig {
            num_products: 500,
            ..Default::default()
        };
        let products = generate(&config, 1);
        assert_eq!(products.len(), 500);

        let ids: HashSet<&str> = products.iter().map(|p| p.product_id.as_str()).collect();
        let tags: HashSet<&str> = products.iter().map(|p| p.tag_id.as_str()).collect();
        assert_eq!(ids.len(), 500);
        assert_eq!(tags.len(), 500);
    }

    #[test]
    fn ids_are_sequential_and_gap_free() {
        let config = SynthConfig {
            num_products: 12,
            ..Default::default()
        };
        let a = generate(&config, 1);
        let b = generate(&config, 2);
        let expected: Vec<String> = (0..12).map(|i| format!("PROD_{i:04}")).collect();
        let ids_a: Vec<String> = a.iter().map(|p| p.product_id.clone()).collect();
        let ids_b: Vec<String> = b.iter().map(|p| p.product_id.clone()).collect();
        assert_eq!(ids_a, expected);
        assert_eq!(ids_b, expected);
    }

    #[test]
    fn id_width_grows_past_four_digits() {
        assert_eq!(product_id_width(1), 4);
        assert_eq!(product_id_width(10_000), 4);
        assert_eq!(product_id_width(10_001), 5);
    }

    #[test]
    fn prices_in_range_with_cent_precision() {
        let config = SynthConfig {
            num_products: 300,
            ..Default::default()
        };
        for p in generate(&config, 5) {
            assert!(config.price_range.contains(p.price), "price {}", p.price);
            let cents = p.price * 100.0;
            assert!((cents - cents.round()).abs() < 1e-6, "price {}", p.price);
        }
    }

    #[test]
    fn categorical_fields_come_from_fixed_sets() {
        let config = SynthConfig {
            num_products: 200,
            num_locations: 3,
            ..Default::default()
        };
        let zones = config.location_labels();
        let oldest = reference() - chrono::Duration::days(365);
        for p in generate(&config, 9) {
            assert!(CATEGORIES.contains(&p.category.as_str()));
            assert!(zones.contains(&p.location));
            assert!(p.date_added >= oldest && p.date_added <= reference());
        }
    }

    #[test]
    fn same_seed_reproduces_catalog() {
        let config = SynthConfig {
            num_products: 20,
            ..Default::default()
        };
        assert_eq!(generate(&config, 77), generate(&config, 77));
    }

    #[test]
    fn inverted_ranges_fail_fast() {
        for config in [
            SynthConfig {
                price_range: ValueRange::new(500.0, 10.0),
                ..Default::default()
            },
            SynthConfig {
                business_hours: HourWindow { start: 22, end: 6 },
                ..Default::default()
            },
        ] {
            assert!(matches!(
                CatalogGenerator::new(&config, reference()),
                Err(SynthError::Config(_))
            ));
        }
    }

    #[test]
    fn zero_population_fails_fast() {
        let config = SynthConfig {
            num_products: 0,
            ..Default::default()
        };
        assert!(matches!(
            CatalogGenerator::new(&config, reference()),
            Err(SynthError::Config(_))
        ));
    }
}
