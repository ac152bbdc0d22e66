//! Stock availability checks and procurement order planning

use serde::Serialize;

use super::request::RequestLine;
use crate::core::store::StockItem;

/// Units ordered above the shortfall when restocking below the reorder point
pub const REORDER_BUFFER: i64 = 2;

pub const NOT_IN_SYSTEM: &str = "Not in procurement system";

/// Availability of a requested part
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Availability {
    InStock,
    LowStock,
    OutOfStock,
    NotFound,
}

impl Availability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Availability::InStock => "IN_STOCK",
            Availability::LowStock => "LOW_STOCK",
            Availability::OutOfStock => "OUT_OF_STOCK",
            Availability::NotFound => "NOT_FOUND",
        }
    }
}

impl std::fmt::Display for Availability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of checking one request line against stock
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockCheck {
    pub part_number: String,
    pub description: String,
    pub needed: i64,
    pub current_stock: i64,
    pub status: Availability,
    pub unit_cost: Option<f64>,
    pub supplier: Option<String>,
}

impl StockCheck {
    pub fn needs_order(&self) -> bool {
        self.status != Availability::InStock
    }
}

/// Check a request line against the part's stock row, if any
pub fn check_line(line: &RequestLine, stock: Option<&StockItem>) -> StockCheck {
    match stock {
        Some(item) => {
            let status = if item.current_stock >= line.quantity {
                Availability::InStock
            } else if item.current_stock >= item.reorder_point {
                Availability::LowStock
            } else {
                Availability::OutOfStock
            };
            StockCheck {
                part_number: item.part_number.clone(),
                description: item.description().to_string(),
                needed: line.quantity,
                current_stock: item.current_stock,
                status,
                unit_cost: Some(item.unit_cost),
                supplier: item.supplier.clone(),
            }
        }
        None => StockCheck {
            part_number: line.part_number.clone(),
            description: NOT_IN_SYSTEM.to_string(),
            needed: line.quantity,
            current_stock: 0,
            status: Availability::NotFound,
            unit_cost: None,
            supplier: None,
        },
    }
}

/// One line of a procurement order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderLine {
    pub part_number: String,
    pub description: String,
    pub needed: i64,
    pub current_stock: i64,
    pub order_quantity: i64,
    pub unit_cost: Option<f64>,
    pub supplier: Option<String>,
}

impl OrderLine {
    /// Cost of the line, `None` when the part has no price
    pub fn line_cost(&self) -> Option<f64> {
        self.unit_cost.map(|c| c * self.order_quantity as f64)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProcurementOrder {
    pub lines: Vec<OrderLine>,
}

impl ProcurementOrder {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total of all priced lines
    pub fn total_cost(&self) -> f64 {
        self.lines.iter().filter_map(OrderLine::line_cost).sum()
    }

    pub fn unpriced_lines(&self) -> usize {
        self.lines.iter().filter(|l| l.unit_cost.is_none()).count()
    }
}

/// Plan an order covering every request line that stock cannot satisfy
///
/// Stocked parts order the shortfall, topped up past the reorder point when
/// stock is already below it. Unknown parts order the need plus the buffer.
pub fn plan_order<'a, I>(requests: I) -> ProcurementOrder
where
    I: IntoIterator<Item = (&'a RequestLine, Option<&'a StockItem>)>,
{
    let mut lines = Vec::new();

    for (line, stock) in requests {
        match stock {
            Some(item) if item.current_stock < line.quantity => {
                let mut order_quantity = line.quantity.saturating_sub(item.current_stock);
                if item.current_stock < item.reorder_point {
                    order_quantity = order_quantity.max(
                        item.reorder_point
                            .saturating_sub(item.current_stock)
                            .saturating_add(REORDER_BUFFER),
                    );
                }
                lines.push(OrderLine {
                    part_number: item.part_number.clone(),
                    description: item.description().to_string(),
                    needed: line.quantity,
                    current_stock: item.current_stock,
                    order_quantity,
                    unit_cost: Some(item.unit_cost),
                    supplier: item.supplier.clone(),
                });
            }
            Some(_) => {}
            None => lines.push(OrderLine {
                part_number: line.part_number.clone(),
                description: NOT_IN_SYSTEM.to_string(),
                needed: line.quantity,
                current_stock: 0,
                order_quantity: line.quantity.saturating_add(REORDER_BUFFER),
                unit_cost: None,
                supplier: None,
            }),
        }
    }

    ProcurementOrder { lines }
}

/// Quantity suggested for a part in the reorder report
pub fn suggested_reorder_quantity(current: i64, reorder_point: i64, need: i64) -> i64 {
    reorder_point
        .saturating_sub(current)
        .saturating_add(REORDER_BUFFER)
        .max(need.saturating_sub(current))
}
