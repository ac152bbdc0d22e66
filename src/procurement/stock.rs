//! Synthetic stock levels for parts referenced by maintenance

use rand::seq::IndexedRandom;
use rand::Rng;
use serde::Serialize;

/// Stocking characteristics of a part category
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StockProfile {
    pub category: &'static str,
    pub minimum_stock: i64,
    pub reorder_point: i64,
    pub cost_range: (f64, f64),
}

const fn profile(
    category: &'static str,
    minimum_stock: i64,
    reorder_point: i64,
    low: f64,
    high: f64,
) -> StockProfile {
    StockProfile {
        category,
        minimum_stock,
        reorder_point,
        cost_range: (low, high),
    }
}

/// Profiles in match order; the first category that prefixes a part number wins
pub const STOCK_PROFILES: [StockProfile; 32] = [
    profile("BEAR", 1, 3, 15.0, 150.0),
    profile("SEAL", 1, 3, 5.0, 45.0),
    profile("GREASE", 2, 4, 8.0, 25.0),
    profile("OIL", 2, 4, 12.0, 35.0),
    profile("FILTER", 1, 3, 20.0, 80.0),
    profile("GASKET", 1, 3, 3.0, 18.0),
    profile("MOTOR", 0, 2, 200.0, 800.0),
    profile("BELT", 1, 3, 25.0, 75.0),
    profile("PUMP", 0, 2, 150.0, 500.0),
    profile("VALVE", 1, 3, 80.0, 300.0),
    profile("GEAR", 0, 2, 120.0, 400.0),
    profile("HEAT", 1, 3, 45.0, 180.0),
    profile("TUBE", 1, 3, 30.0, 120.0),
    profile("FAN", 0, 2, 90.0, 250.0),
    profile("TOWER", 0, 2, 500.0, 1500.0),
    profile("NOZZLE", 1, 3, 15.0, 60.0),
    profile("DRIFT", 1, 3, 25.0, 80.0),
    profile("FIN", 1, 3, 8.0, 35.0),
    profile("IMPELLER", 0, 2, 120.0, 450.0),
    profile("SHAFT", 0, 2, 200.0, 600.0),
    profile("CHAIN", 1, 3, 40.0, 120.0),
    profile("SPROCKET", 1, 3, 35.0, 95.0),
    profile("ACTUATOR", 0, 2, 250.0, 800.0),
    profile("POSITIONER", 0, 2, 180.0, 500.0),
    profile("ELEMENT", 1, 3, 15.0, 65.0),
    profile("HOUSING", 1, 3, 45.0, 150.0),
    profile("SWITCH", 1, 3, 25.0, 80.0),
    profile("RELAY", 1, 3, 18.0, 55.0),
    profile("FUSE", 2, 4, 5.0, 25.0),
    profile("LUBRICANT", 1, 3, 12.0, 40.0),
    profile("PINION", 0, 2, 95.0, 280.0),
    profile("RACK", 0, 2, 120.0, 350.0),
];

pub const SUPPLIERS: [&str; 10] = [
    "Industrial Supply Co.",
    "Maintenance Parts Inc.",
    "Quality Bearings Ltd.",
    "Tech Components Corp.",
    "Reliable Parts Supply",
    "Precision Engineering",
    "Global Industrial",
    "Maintenance Solutions",
    "Parts Warehouse",
    "Industrial Equipment Co.",
];

pub const GENERIC_DESCRIPTION: &str = "General maintenance component";

/// Share of profiled parts generated below their reorder point
const BELOW_REORDER_PROBABILITY: f64 = 0.9;

/// A stock row ready to be inserted
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockEntry {
    pub part_number: String,
    pub part_description: String,
    pub current_stock: i64,
    pub minimum_stock: i64,
    pub reorder_point: i64,
    pub unit_cost: f64,
    pub supplier: String,
}

/// Profile for a part number, `None` for generic parts
pub fn profile_for(part_number: &str) -> Option<&'static StockProfile> {
    STOCK_PROFILES
        .iter()
        .find(|p| part_number.starts_with(p.category))
}

/// Synthesize a stock entry for one part number
pub fn synthesize<R: Rng + ?Sized>(part_number: &str, rng: &mut R) -> StockEntry {
    let supplier = SUPPLIERS
        .choose(rng)
        .copied()
        .unwrap_or(SUPPLIERS[0])
        .to_string();

    match profile_for(part_number) {
        Some(profile) => {
            let current_stock = if rng.random_bool(BELOW_REORDER_PROBABILITY) {
                rng.random_range(0..profile.reorder_point)
            } else {
                rng.random_range(profile.reorder_point..=profile.reorder_point * 3)
            };
            let (low, high) = profile.cost_range;

            StockEntry {
                part_number: part_number.to_string(),
                part_description: format!("{} component for maintenance", title_case(profile.category)),
                current_stock,
                minimum_stock: profile.minimum_stock,
                reorder_point: profile.reorder_point,
                unit_cost: round_cents(rng.random_range(low..=high)),
                supplier,
            }
        }
        None => StockEntry {
            part_number: part_number.to_string(),
            part_description: GENERIC_DESCRIPTION.to_string(),
            current_stock: rng.random_range(5..=50),
            minimum_stock: 5,
            reorder_point: 15,
            unit_cost: round_cents(rng.random_range(10.0..=100.0)),
            supplier,
        },
    }
}

pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn title_case(category: &str) -> String {
    let lower = category.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_profile_prefix_order() {
        assert_eq!(profile_for("BEARING-003-04").unwrap().category, "BEAR");
        assert_eq!(profile_for("OIL-FILTER-001-03").unwrap().category, "OIL");
        assert_eq!(profile_for("GEAR-007-01").unwrap().category, "GEAR");
        assert_eq!(profile_for("FINAL-001-01").unwrap().category, "FIN");
        assert!(profile_for("PULLEY-002-03").is_none());
        assert!(profile_for("bear-001-01").is_none());
    }

    #[test]
    fn test_profiled_entry_within_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let entry = synthesize("MOTOR-002-01", &mut rng);
            assert_eq!(entry.minimum_stock, 0);
            assert_eq!(entry.reorder_point, 2);
            assert!((0..=6).contains(&entry.current_stock));
            assert!((200.0..=800.0).contains(&entry.unit_cost));
            assert_eq!(entry.part_description, "Motor component for maintenance");
            assert!(SUPPLIERS.contains(&entry.supplier.as_str()));
        }
    }

    #[test]
    fn test_most_profiled_parts_start_below_reorder_point() {
        let mut rng = StdRng::seed_from_u64(42);
        let below = (0..1000)
            .map(|_| synthesize("SEAL-001-02", &mut rng))
            .filter(|e| e.current_stock < e.reorder_point)
            .count();
        assert!(below > 800, "only {} of 1000 below reorder point", below);
    }

    #[test]
    fn test_generic_entry() {
        let mut rng = StdRng::seed_from_u64(1);
        let entry = synthesize("COUPLING-002-04", &mut rng);
        assert_eq!(entry.part_description, GENERIC_DESCRIPTION);
        assert_eq!(entry.minimum_stock, 5);
        assert_eq!(entry.reorder_point, 15);
        assert!((5..=50).contains(&entry.current_stock));
        assert!((10.0..=100.0).contains(&entry.unit_cost));
    }

    #[test]
    fn test_cost_has_two_decimals() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..100 {
            let entry = synthesize("GASKET-005-04", &mut rng);
            let cents = entry.unit_cost * 100.0;
            assert!((cents - cents.round()).abs() < 1e-6);
        }
    }

    #[test]
    fn test_same_seed_same_entries() {
        let a: Vec<_> = {
            let mut rng = StdRng::seed_from_u64(99);
            ["BEAR-001-01", "PULLEY-002-03"]
                .iter()
                .map(|p| synthesize(p, &mut rng))
                .collect()
        };
        let b: Vec<_> = {
            let mut rng = StdRng::seed_from_u64(99);
            ["BEAR-001-01", "PULLEY-002-03"]
                .iter()
                .map(|p| synthesize(p, &mut rng))
                .collect()
        };
        assert_eq!(a, b);
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("LUBRICANT"), "Lubricant");
        assert_eq!(title_case(""), "");
    }
}
