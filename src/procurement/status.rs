//! Stock status classification shared by the reconciliation view and reports

/// Status of a stocked part against its thresholds and maintenance demand
///
/// Variants are ordered by severity, most severe first.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockStatus {
    Reorder,
    LowStock,
    InsufficientForMaintenance,
    Sufficient,
}

impl StockStatus {
    pub const ALL: [StockStatus; 4] = [
        StockStatus::Reorder,
        StockStatus::LowStock,
        StockStatus::InsufficientForMaintenance,
        StockStatus::Sufficient,
    ];

    /// Classify a part, first matching rule wins
    ///
    /// REORDER is checked before LOW_STOCK, so a part under its reorder point
    /// reports REORDER even when the minimum stock is the higher threshold.
    /// `procurement_stock_vs_maintenance` encodes the same rule in SQL.
    pub fn classify(current: i64, minimum: i64, reorder_point: i64, need: i64) -> Self {
        if current < reorder_point {
            StockStatus::Reorder
        } else if current < minimum {
            StockStatus::LowStock
        } else if current < need {
            StockStatus::InsufficientForMaintenance
        } else {
            StockStatus::Sufficient
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StockStatus::Reorder => "REORDER",
            StockStatus::LowStock => "LOW_STOCK",
            StockStatus::InsufficientForMaintenance => "INSUFFICIENT_FOR_MAINTENANCE",
            StockStatus::Sufficient => "SUFFICIENT",
        }
    }

    pub fn needs_attention(&self) -> bool {
        !matches!(self, StockStatus::Sufficient)
    }
}

impl std::fmt::Display for StockStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StockStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().replace('-', "_").as_str() {
            "REORDER" => Ok(StockStatus::Reorder),
            "LOW_STOCK" | "LOW" => Ok(StockStatus::LowStock),
            "INSUFFICIENT_FOR_MAINTENANCE" | "INSUFFICIENT" => {
                Ok(StockStatus::InsufficientForMaintenance)
            }
            "SUFFICIENT" => Ok(StockStatus::Sufficient),
            _ => Err(format!("Unknown stock status: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grease_example_is_sufficient() {
        assert_eq!(StockStatus::classify(10, 2, 5, 3), StockStatus::Sufficient);
    }

    #[test]
    fn test_reorder_wins_over_everything() {
        // above minimum and above demand, still below the reorder point
        assert_eq!(StockStatus::classify(4, 2, 5, 1), StockStatus::Reorder);
        // minimum higher than reorder point
        assert_eq!(StockStatus::classify(3, 10, 5, 0), StockStatus::Reorder);
    }

    #[test]
    fn test_low_stock_only_at_or_above_reorder_point() {
        assert_eq!(StockStatus::classify(6, 10, 5, 0), StockStatus::LowStock);
        assert_eq!(StockStatus::classify(5, 10, 5, 20), StockStatus::LowStock);
    }

    #[test]
    fn test_insufficient_for_maintenance() {
        assert_eq!(
            StockStatus::classify(6, 2, 5, 7),
            StockStatus::InsufficientForMaintenance
        );
        assert_eq!(StockStatus::classify(7, 2, 5, 7), StockStatus::Sufficient);
    }

    #[test]
    fn test_parse_and_display() {
        for status in StockStatus::ALL {
            assert_eq!(status.to_string().parse::<StockStatus>(), Ok(status));
        }
        assert_eq!("low-stock".parse(), Ok(StockStatus::LowStock));
        assert_eq!("insufficient".parse(), Ok(StockStatus::InsufficientForMaintenance));
        assert!("plenty".parse::<StockStatus>().is_err());
    }

    #[test]
    fn test_severity_order() {
        let mut statuses = vec![
            StockStatus::Sufficient,
            StockStatus::InsufficientForMaintenance,
            StockStatus::Reorder,
            StockStatus::LowStock,
        ];
        statuses.sort();
        assert_eq!(statuses, StockStatus::ALL.to_vec());
    }

    #[test]
    fn test_serde_names_match_sql() {
        let json = serde_json::to_string(&StockStatus::InsufficientForMaintenance).unwrap();
        assert_eq!(json, "\"INSUFFICIENT_FOR_MAINTENANCE\"");
        let json = serde_json::to_string(&StockStatus::LowStock).unwrap();
        assert_eq!(json, "\"LOW_STOCK\"");
    }
}
