//! Row and report types read from the store

use serde::Serialize;

use crate::procurement::StockStatus;

/// A row of `maintenance_service_manual`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceManual {
    pub unique_id: u32,
    pub service_description: String,
    /// Full markdown manual, if stored
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_manual: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_hash: Option<String>,
}

impl ServiceManual {
    /// Equipment type, the part of the description before the first " - "
    pub fn equipment_type(&self) -> &str {
        equipment_type_of(&self.service_description)
    }
}

/// A row of `maintenance_service_parts`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServicePart {
    pub equipment_id: u32,
    pub part: String,
    pub quantity: i64,
}

impl ServicePart {
    pub fn new(equipment_id: u32, part: impl Into<String>, quantity: i64) -> Self {
        Self {
            equipment_id,
            part: part.into(),
            quantity,
        }
    }
}

/// A row of `procurement_parts_stock`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockItem {
    pub part_number: String,
    pub part_description: Option<String>,
    pub current_stock: i64,
    pub minimum_stock: i64,
    pub reorder_point: i64,
    pub unit_cost: f64,
    pub supplier: Option<String>,
    pub last_updated: String,
}

impl StockItem {
    pub fn description(&self) -> &str {
        self.part_description.as_deref().unwrap_or("")
    }
}

/// A row of the `procurement_stock_vs_maintenance` view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconciliationRow {
    pub part_number: String,
    pub part_description: Option<String>,
    pub current_stock: i64,
    pub minimum_stock: i64,
    pub reorder_point: i64,
    pub unit_cost: f64,
    pub supplier: Option<String>,
    pub total_maintenance_need: i64,
    pub stock_after_maintenance: i64,
    pub stock_status: StockStatus,
}

/// Filter for reconciliation reads
#[derive(Debug, Clone, Default)]
pub struct ReconcileFilter {
    pub status: Option<StockStatus>,
    /// Part-number pattern, SQL LIKE syntax with `*` accepted as `%`
    pub pattern: Option<String>,
}

/// Equipment listing row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EquipmentSummary {
    pub unique_id: u32,
    pub service_description: String,
    pub parts_count: i64,
    pub total_quantity: i64,
}

impl EquipmentSummary {
    pub fn equipment_type(&self) -> &str {
        equipment_type_of(&self.service_description)
    }
}

/// Stock level overview
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StockSummary {
    pub total_parts: i64,
    /// current > reorder point
    pub in_stock: i64,
    /// minimum < current <= reorder point
    pub low_stock: i64,
    /// current <= minimum
    pub out_of_stock: i64,
    pub inventory_value: f64,
    /// Lowest items at or below their reorder point
    pub lowest: Vec<StockItem>,
}

/// Which maintenance parts a cost analysis covers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CostScope {
    Equipment(u32),
    Pattern(String),
}

/// Maintenance demand for one part with its price, if stocked
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostLine {
    pub part: String,
    pub quantity: i64,
    pub unit_cost: Option<f64>,
    pub supplier: Option<String>,
}

impl CostLine {
    pub fn line_cost(&self) -> Option<f64> {
        self.unit_cost.map(|c| c * self.quantity as f64)
    }
}

/// Rows inserted by a load
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadStats {
    pub cleared_manuals: usize,
    pub cleared_parts: usize,
    pub manuals: usize,
    pub parts: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    /// Delete existing manuals and parts before inserting
    pub clear_existing: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            clear_existing: true,
        }
    }
}

/// Outcome of refreshing stored manual text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContentUpdateStats {
    pub updated: usize,
    pub unchanged: usize,
    /// Ids with a manual on disk but no row in the store
    pub missing: Vec<u32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PopulateOptions {
    /// Delete all stock rows first
    pub replace: bool,
}

/// Outcome of a stock population run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PopulateStats {
    pub distinct_parts: usize,
    pub inserted: usize,
    pub existing: usize,
    pub skipped_blank: usize,
    pub cleared: usize,
}

/// A column as reported by `PRAGMA table_info`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnInfo {
    pub name: String,
    pub decl_type: String,
    pub not_null: bool,
    pub primary_key: bool,
}

/// A table or view with its columns and row count
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelationInfo {
    pub name: String,
    pub kind: String,
    pub columns: Vec<ColumnInfo>,
    pub rows: i64,
}

fn equipment_type_of(description: &str) -> &str {
    description
        .split_once(" - ")
        .map_or(description, |(kind, _)| kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equipment_type_from_description() {
        let manual = ServiceManual {
            unique_id: 1,
            service_description: "Turbine Engine - Comprehensive maintenance service".to_string(),
            service_manual: None,
            content_hash: None,
        };
        assert_eq!(manual.equipment_type(), "Turbine Engine");
        assert_eq!(equipment_type_of("bare"), "bare");
    }

    #[test]
    fn test_cost_line() {
        let line = CostLine {
            part: "BEAR-001-01".to_string(),
            quantity: 3,
            unit_cost: Some(12.5),
            supplier: None,
        };
        assert_eq!(line.line_cost(), Some(37.5));
        let unpriced = CostLine {
            unit_cost: None,
            ..line
        };
        assert_eq!(unpriced.line_cost(), None);
    }
}
